//! In-memory storage implementation

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tutorhub_core::model::{Account, ApplicationStatus, Booking, Role, TutorApplication};
use tutorhub_core::status::CanonicalStatus;

use super::{
    AccountStore, ApplicationStore, BookingStore, NewAccount, NewApplication, NewBooking,
    RevocationStore, StoreResult, LIST_LIMIT,
};
use crate::error::AdminError;

/// In-memory market store
///
/// Accounts are keyed by uid in a BTreeMap so listings come out in
/// stable uid order.
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, Account>>,
    applications: RwLock<HashMap<String, TutorApplication>>,
    bookings: RwLock<HashMap<String, Booking>>,
    revocations: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            applications: RwLock::new(HashMap::new()),
            bookings: RwLock::new(HashMap::new()),
            revocations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryStore {
    fn create_account(&self, new: NewAccount) -> StoreResult<Account> {
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: new.email,
            display_name: new.display_name,
            role: new.role,
            hashed_password: new.hashed_password,
            is_blocked: false,
            is_tutor_verified: false,
            created_at: Utc::now(),
        };
        self.accounts
            .write()
            .unwrap()
            .insert(account.uid.clone(), account.clone());
        Ok(account)
    }

    fn get_account(&self, uid: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(uid).cloned())
    }

    fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.role == Role::Admin && a.email == email)
            .cloned())
    }

    fn list_accounts(&self, role: Option<Role>) -> StoreResult<Vec<Account>> {
        let accounts = self.accounts.read().unwrap();
        let mut out: Vec<Account> = accounts
            .values()
            .filter(|a| role.map_or(true, |r| a.role == r))
            .cloned()
            .collect();
        out.truncate(LIST_LIMIT);
        Ok(out)
    }

    fn set_blocked(&self, uid: &str, blocked: bool) -> StoreResult<()> {
        let mut accounts = self.accounts.write().unwrap();
        if let Some(account) = accounts.get_mut(uid) {
            account.is_blocked = blocked;
        }
        Ok(())
    }

    fn accounts_snapshot(&self) -> StoreResult<Vec<Account>> {
        Ok(self.accounts.read().unwrap().values().cloned().collect())
    }
}

impl ApplicationStore for MemoryStore {
    fn create_application(&self, new: NewApplication) -> StoreResult<TutorApplication> {
        let application = TutorApplication {
            id: Uuid::new_v4().to_string(),
            uid: new.uid,
            full_name: new.full_name,
            email: new.email,
            subject: new.subject,
            experience: new.experience,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
        };
        self.applications
            .write()
            .unwrap()
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn get_application(&self, id: &str) -> StoreResult<Option<TutorApplication>> {
        Ok(self.applications.read().unwrap().get(id).cloned())
    }

    fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<TutorApplication>> {
        let applications = self.applications.read().unwrap();
        let mut out: Vec<TutorApplication> = applications
            .values()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        out.truncate(LIST_LIMIT);
        Ok(out)
    }

    fn review_application(
        &self,
        id: &str,
        decision: ApplicationStatus,
        reviewer_uid: &str,
    ) -> StoreResult<TutorApplication> {
        // Both maps stay locked for the whole review so the account
        // promotion and the status update land together.
        let mut accounts = self.accounts.write().unwrap();
        let mut applications = self.applications.write().unwrap();

        let application = applications
            .get_mut(id)
            .ok_or(AdminError::ApplicationNotFound)?;

        if decision == ApplicationStatus::Approved {
            if let Some(uid) = &application.uid {
                let account = accounts.get_mut(uid).ok_or(AdminError::AccountNotFound)?;
                account.role = Role::Tutor;
                account.is_tutor_verified = true;
            }
        }

        application.status = decision;
        application.reviewed_at = Some(Utc::now());
        application.reviewed_by = Some(reviewer_uid.to_string());

        Ok(application.clone())
    }
}

impl BookingStore for MemoryStore {
    fn create_booking(&self, new: NewBooking) -> StoreResult<Booking> {
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            student_id: new.student_id,
            tutor_id: new.tutor_id,
            start_at: new.start_at,
            hours: new.hours,
            mode: new.mode,
            package_type: new.package_type,
            completed_sessions: new.completed_sessions,
            total_sessions: new.total_sessions,
            price: new.price,
            status: new.status,
            created_at: Utc::now(),
            end_at: new.end_at,
        };
        self.bookings
            .write()
            .unwrap()
            .insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn list_bookings(&self, status: Option<CanonicalStatus>) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().unwrap();
        let mut out: Vec<Booking> = bookings
            .values()
            .filter(|b| status.map_or(true, |s| b.canonical_status() == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out.truncate(LIST_LIMIT);
        Ok(out)
    }

    fn bookings_snapshot(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.read().unwrap().values().cloned().collect())
    }
}

impl RevocationStore for MemoryStore {
    fn revoke_tokens(&self, uid: &str, at: DateTime<Utc>) -> StoreResult<()> {
        let mut revocations = self.revocations.write().unwrap();
        let entry = revocations.entry(uid.to_string()).or_insert(at);
        if at > *entry {
            *entry = at;
        }
        Ok(())
    }

    fn revoked_at(&self, uid: &str) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.revocations.read().unwrap().get(uid).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_account(email: &str, role: Role) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            display_name: None,
            role,
            hashed_password: None,
        }
    }

    fn new_application(uid: Option<&str>) -> NewApplication {
        NewApplication {
            uid: uid.map(str::to_string),
            full_name: Some("Test Applicant".to_string()),
            email: Some("applicant@example.com".to_string()),
            subject: Some("Math".to_string()),
            experience: None,
        }
    }

    #[test]
    fn test_find_admin_by_email_ignores_non_admins() {
        let store = MemoryStore::new();
        store
            .create_account(new_account("shared@example.com", Role::Student))
            .unwrap();

        assert!(store
            .find_admin_by_email("shared@example.com")
            .unwrap()
            .is_none());

        store
            .create_account(new_account("shared@example.com", Role::Admin))
            .unwrap();
        let found = store.find_admin_by_email("shared@example.com").unwrap();
        assert_eq!(found.unwrap().role, Role::Admin);
    }

    #[test]
    fn test_approval_promotes_linked_account() {
        let store = MemoryStore::new();
        let account = store
            .create_account(new_account("bob@example.com", Role::Student))
            .unwrap();
        let application = store
            .create_application(new_application(Some(&account.uid)))
            .unwrap();

        let reviewed = store
            .review_application(&application.id, ApplicationStatus::Approved, "admin-1")
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("admin-1"));
        assert!(reviewed.reviewed_at.is_some());

        let promoted = store.get_account(&account.uid).unwrap().unwrap();
        assert_eq!(promoted.role, Role::Tutor);
        assert!(promoted.is_tutor_verified);
    }

    #[test]
    fn test_approval_with_missing_account_leaves_application_pending() {
        let store = MemoryStore::new();
        let application = store
            .create_application(new_application(Some("ghost-uid")))
            .unwrap();

        let err = store
            .review_application(&application.id, ApplicationStatus::Approved, "admin-1")
            .unwrap_err();
        assert!(matches!(err, AdminError::AccountNotFound));

        let unchanged = store.get_application(&application.id).unwrap().unwrap();
        assert_eq!(unchanged.status, ApplicationStatus::Pending);
        assert!(unchanged.reviewed_at.is_none());
    }

    #[test]
    fn test_rejection_does_not_touch_account() {
        let store = MemoryStore::new();
        let account = store
            .create_account(new_account("carol@example.com", Role::Student))
            .unwrap();
        let application = store
            .create_application(new_application(Some(&account.uid)))
            .unwrap();

        store
            .review_application(&application.id, ApplicationStatus::Rejected, "admin-1")
            .unwrap();

        let untouched = store.get_account(&account.uid).unwrap().unwrap();
        assert_eq!(untouched.role, Role::Student);
        assert!(!untouched.is_tutor_verified);
    }

    #[test]
    fn test_revocation_keeps_latest_cutoff() {
        let store = MemoryStore::new();
        let earlier = Utc::now();
        let later = earlier + Duration::seconds(30);

        store.revoke_tokens("u1", later).unwrap();
        store.revoke_tokens("u1", earlier).unwrap();

        assert_eq!(store.revoked_at("u1").unwrap(), Some(later));
    }

    #[test]
    fn test_set_blocked_unknown_uid_is_noop() {
        let store = MemoryStore::new();
        store.set_blocked("missing", true).unwrap();
        assert!(store.get_account("missing").unwrap().is_none());
    }
}
