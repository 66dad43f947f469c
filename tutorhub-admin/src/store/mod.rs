//! Storage abstractions for the admin service

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use tutorhub_core::model::{Account, ApplicationStatus, Booking, Role, TutorApplication};
use tutorhub_core::status::CanonicalStatus;

use crate::error::AdminError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AdminError>;

/// Maximum number of rows any list operation returns
pub const LIST_LIMIT: usize = 100;

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub hashed_password: Option<String>,
}

/// Input for filing a tutor application
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub uid: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub experience: Option<String>,
}

/// Input for recording a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub student_id: Option<String>,
    pub tutor_id: Option<String>,
    pub start_at: DateTime<Utc>,
    pub hours: Option<f64>,
    pub mode: Option<String>,
    pub package_type: Option<String>,
    pub completed_sessions: Option<u32>,
    pub total_sessions: Option<u32>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub end_at: Option<DateTime<Utc>>,
}

/// Trait for account storage
pub trait AccountStore: Send + Sync {
    /// Create an account, assigning its uid and creation time
    fn create_account(&self, new: NewAccount) -> StoreResult<Account>;

    /// Get an account by uid
    fn get_account(&self, uid: &str) -> StoreResult<Option<Account>>;

    /// Find an admin account by exact email (non-admin matches are ignored)
    fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// List accounts ordered by uid, optionally filtered by role,
    /// capped at [`LIST_LIMIT`]
    fn list_accounts(&self, role: Option<Role>) -> StoreResult<Vec<Account>>;

    /// Set an account's blocked flag; unknown uids are a no-op
    fn set_blocked(&self, uid: &str, blocked: bool) -> StoreResult<()>;

    /// Full account snapshot for aggregation (uncapped)
    fn accounts_snapshot(&self) -> StoreResult<Vec<Account>>;
}

/// Trait for tutor application storage
pub trait ApplicationStore: Send + Sync {
    /// File a new application, assigning its id and submission time
    fn create_application(&self, new: NewApplication) -> StoreResult<TutorApplication>;

    /// Get an application by id
    fn get_application(&self, id: &str) -> StoreResult<Option<TutorApplication>>;

    /// List applications newest first, optionally filtered by status,
    /// capped at [`LIST_LIMIT`]
    fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<TutorApplication>>;

    /// Record a review decision and, on approval, promote the linked
    /// account to a verified tutor
    ///
    /// The promotion and the status update are atomic: if the linked
    /// account does not exist, the application is left untouched.
    fn review_application(
        &self,
        id: &str,
        decision: ApplicationStatus,
        reviewer_uid: &str,
    ) -> StoreResult<TutorApplication>;
}

/// Trait for booking storage
pub trait BookingStore: Send + Sync {
    /// Record a booking, assigning its id and creation time
    fn create_booking(&self, new: NewBooking) -> StoreResult<Booking>;

    /// List bookings newest first, optionally filtered by canonical
    /// status, capped at [`LIST_LIMIT`]
    fn list_bookings(&self, status: Option<CanonicalStatus>) -> StoreResult<Vec<Booking>>;

    /// Full booking snapshot for aggregation (uncapped)
    fn bookings_snapshot(&self) -> StoreResult<Vec<Booking>>;
}

/// Trait for token revocation marks
pub trait RevocationStore: Send + Sync {
    /// Revoke all tokens issued to `uid` at or before `at`
    ///
    /// Later marks win; an earlier timestamp never narrows an existing
    /// revocation.
    fn revoke_tokens(&self, uid: &str, at: DateTime<Utc>) -> StoreResult<()>;

    /// Get the revocation cutoff for `uid`, if any
    fn revoked_at(&self, uid: &str) -> StoreResult<Option<DateTime<Utc>>>;
}

/// Everything the admin API needs from storage
pub trait MarketStore: AccountStore + ApplicationStore + BookingStore + RevocationStore {}

impl<T: AccountStore + ApplicationStore + BookingStore + RevocationStore> MarketStore for T {}
