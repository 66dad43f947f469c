//! Dashboard aggregates computed from account and booking snapshots

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::model::{Account, Booking, Role};
use crate::status::CanonicalStatus;

/// Platform-wide counters and revenue figures shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_tutors: u64,
    pub total_students: u64,
    pub total_bookings: u64,
    pub completed_bookings: u64,
    pub cancelled_bookings: u64,
    pub total_revenue: f64,
    /// Revenue per calendar month (January first), across all years.
    pub monthly_revenue: [f64; 12],
}

impl DashboardStats {
    /// Recompute every aggregate from full snapshots.
    ///
    /// Revenue counts bookings whose canonical status is completed; the
    /// monthly series additionally requires an end date and buckets by
    /// its month regardless of year.
    pub fn compute(accounts: &[Account], bookings: &[Booking]) -> Self {
        let mut stats = Self {
            total_users: accounts.len() as u64,
            total_bookings: bookings.len() as u64,
            ..Self::default()
        };

        for account in accounts {
            match account.role {
                Role::Tutor => stats.total_tutors += 1,
                Role::Student => stats.total_students += 1,
                Role::Admin => {}
            }
        }

        for booking in bookings {
            match booking.canonical_status() {
                CanonicalStatus::Completed => {
                    stats.completed_bookings += 1;
                    if let Some(price) = booking.price {
                        stats.total_revenue += price;
                    }
                    if let Some(end_at) = booking.end_at {
                        stats.monthly_revenue[end_at.month0() as usize] +=
                            booking.price.unwrap_or(0.0);
                    }
                }
                CanonicalStatus::Cancelled => stats.cancelled_bookings += 1,
                CanonicalStatus::Active => {}
            }
        }

        stats
    }
}
