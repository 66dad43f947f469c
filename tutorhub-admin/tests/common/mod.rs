//! Common test utilities for admin API integration tests

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use tutorhub_admin::crypto::hash_password;
use tutorhub_admin::routes;
use tutorhub_admin::store::{
    AccountStore, ApplicationStore, BookingStore, MemoryStore, NewAccount, NewApplication,
    NewBooking,
};
use tutorhub_admin::AppState;
use tutorhub_core::model::{Account, Booking, Role, TutorApplication};
use tutorhub_core::token::TokenSigner;

pub const TEST_SECRET: &str = "test-secret-not-for-production";

/// Create a test server over a fresh in-memory store
pub fn create_test_server() -> (TestServer, Arc<AppState<MemoryStore>>) {
    let signer = TokenSigner::new(TEST_SECRET, 7);
    let state =
        Arc::new(AppState::new(MemoryStore::default(), signer).expect("Failed to create state"));

    let app = routes::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, state)
}

/// Seed an admin account with a bcrypt password
pub fn seed_admin(state: &AppState<MemoryStore>, email: &str, password: &str) -> Account {
    let hashed = hash_password(password).expect("Failed to hash password");
    state
        .store
        .create_account(NewAccount {
            email: email.to_string(),
            display_name: Some("Test Admin".to_string()),
            role: Role::Admin,
            hashed_password: Some(hashed),
        })
        .expect("Failed to seed admin")
}

/// Seed an admin account and mint a valid bearer token for it
///
/// Skips the bcrypt round, for tests that need a session but do not
/// exercise login itself.
pub fn seed_admin_with_token(state: &AppState<MemoryStore>) -> (Account, String) {
    let admin = state
        .store
        .create_account(NewAccount {
            email: "admin@tutorhub.test".to_string(),
            display_name: Some("Test Admin".to_string()),
            role: Role::Admin,
            hashed_password: None,
        })
        .expect("Failed to seed admin");
    let token = state.signer.sign(&admin).expect("Failed to sign token");

    (admin, token)
}

/// Log in through the API and return the bearer token
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/admin/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("No token in login response")
        .to_string()
}

/// Seed a student account
pub fn seed_student(state: &AppState<MemoryStore>, email: &str) -> Account {
    state
        .store
        .create_account(NewAccount {
            email: email.to_string(),
            display_name: None,
            role: Role::Student,
            hashed_password: None,
        })
        .expect("Failed to seed student")
}

/// Seed a tutor application, optionally linked to an account
pub fn seed_application(state: &AppState<MemoryStore>, uid: Option<&str>) -> TutorApplication {
    state
        .store
        .create_application(NewApplication {
            uid: uid.map(|s| s.to_string()),
            full_name: Some("Pat Candidate".to_string()),
            email: Some("pat@tutorhub.test".to_string()),
            subject: Some("Mathematics".to_string()),
            experience: Some("5 years of tutoring".to_string()),
        })
        .expect("Failed to seed application")
}

/// Seed a booking with the given raw status, session time and price
pub fn seed_booking(
    state: &AppState<MemoryStore>,
    status: Option<&str>,
    start_at: DateTime<Utc>,
    price: Option<f64>,
) -> Booking {
    state
        .store
        .create_booking(NewBooking {
            student_id: None,
            tutor_id: None,
            start_at,
            hours: Some(1.0),
            mode: Some("online".to_string()),
            package_type: None,
            completed_sessions: None,
            total_sessions: None,
            price,
            status: status.map(|s| s.to_string()),
            end_at: None,
        })
        .expect("Failed to seed booking")
}

/// Shorthand for a UTC timestamp at `hour`:00 on the given day
pub fn date(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}
