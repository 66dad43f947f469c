//! TutorHub Core Library
//!
//! Shared domain types for the tutoring marketplace admin stack:
//! - Accounts, tutor applications and bookings as persisted
//! - Canonical booking status derived from free-text status fields
//! - HS256 admin session tokens
//! - Dashboard aggregates computed from data snapshots

pub mod status;
pub mod model;
pub mod filter;
pub mod token;
pub mod stats;
pub mod error;

pub use status::CanonicalStatus;
pub use model::{Account, AdminProfile, ApplicationStatus, Booking, Role, TutorApplication};
pub use filter::DateRange;
pub use token::{AdminClaims, TokenSigner, TOKEN_TTL_DAYS};
pub use stats::DashboardStats;
pub use error::Error;

/// Result type for tutorhub-core operations
pub type Result<T> = std::result::Result<T, Error>;
