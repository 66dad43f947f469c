//! Booking list endpoint

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tutorhub_core::filter::DateRange;
use tutorhub_core::model::Booking;
use tutorhub_core::status::CanonicalStatus;

use crate::auth::require_admin;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

fn parse_date(value: &str) -> Result<NaiveDate, AdminError> {
    value
        .parse()
        .map_err(|_| AdminError::Validation(format!("Invalid date: {value}")))
}

/// GET /api/admin/bookings?status=active|completed|cancelled&from=&to=
///
/// `from`/`to` are inclusive dates (YYYY-MM-DD) matched against each
/// booking's start time.
pub async fn list_bookings<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<BookingsResponse>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;

    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match CanonicalStatus::from_str(raw) {
            Some(status) => Some(status),
            // Unknown status names match nothing
            None => {
                return Ok(Json(BookingsResponse {
                    bookings: Vec::new(),
                }))
            }
        },
    };

    let mut bookings = state.store.list_bookings(status)?;

    let from = query.from.as_deref().filter(|s| !s.is_empty());
    let to = query.to.as_deref().filter(|s| !s.is_empty());
    if from.is_some() || to.is_some() {
        let range = DateRange::new(
            from.map(parse_date).transpose()?,
            to.map(parse_date).transpose()?,
        );
        bookings.retain(|b| range.contains(b.start_at));
    }

    Ok(Json(BookingsResponse { bookings }))
}
