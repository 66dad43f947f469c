//! Tests for tutor application listing and review

mod common;

use common::{create_test_server, seed_application, seed_admin_with_token, seed_student};
use serde_json::{json, Value};
use tutorhub_admin::store::{AccountStore, ApplicationStore};
use tutorhub_core::model::{ApplicationStatus, Role};

/// Test: applications come back newest first
#[tokio::test]
async fn test_list_applications_newest_first() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    let first = seed_application(&state, None);
    let second = seed_application(&state, None);
    let third = seed_application(&state, None);

    let response = server
        .get("/api/admin/tutor-applications")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let ids: Vec<&str> = body["applications"]
        .as_array()
        .expect("applications should be an array")
        .iter()
        .map(|a| a["id"].as_str().expect("id should be a string"))
        .collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);
}

/// Test: the status filter narrows the listing
#[tokio::test]
async fn test_list_applications_filters_by_status() {
    let (server, state) = create_test_server();
    let (admin, token) = seed_admin_with_token(&state);
    seed_application(&state, None);
    let reviewed = seed_application(&state, None);
    state
        .store
        .review_application(&reviewed.id, ApplicationStatus::Approved, &admin.uid)
        .expect("Failed to review application");

    let response = server
        .get("/api/admin/tutor-applications")
        .add_query_param("status", "approved")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let applications = body["applications"]
        .as_array()
        .expect("applications should be an array");
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["id"], reviewed.id);
    assert_eq!(applications[0]["status"], "approved");

    // An empty status parameter lists everything
    let response = server
        .get("/api/admin/tutor-applications")
        .add_query_param("status", "")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["applications"].as_array().map(|a| a.len()), Some(2));
}

/// Test: an unknown status matches nothing
#[tokio::test]
async fn test_list_applications_unknown_status() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    seed_application(&state, None);

    let response = server
        .get("/api/admin/tutor-applications")
        .add_query_param("status", "reviewing")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["applications"].as_array().map(|a| a.len()), Some(0));
}

/// Test: approval updates the application and promotes the applicant
#[tokio::test]
async fn test_review_approves_and_promotes() {
    let (server, state) = create_test_server();
    let (admin, token) = seed_admin_with_token(&state);
    let student = seed_student(&state, "applicant@x.com");
    let application = seed_application(&state, Some(&student.uid));

    let response = server
        .patch(&format!(
            "/api/admin/tutor-applications/{}/status",
            application.id
        ))
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Application status updated: approved");

    let account = state
        .store
        .get_account(&student.uid)
        .unwrap()
        .expect("Account should exist");
    assert_eq!(account.role, Role::Tutor);
    assert!(account.is_tutor_verified);

    let reviewed = state
        .store
        .get_application(&application.id)
        .unwrap()
        .expect("Application should exist");
    assert_eq!(reviewed.status, ApplicationStatus::Approved);
    assert_eq!(reviewed.reviewed_by.as_deref(), Some(admin.uid.as_str()));
    assert!(reviewed.reviewed_at.is_some());
}

/// Test: rejection records the decision without touching the account
#[tokio::test]
async fn test_review_rejection_leaves_account() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    let student = seed_student(&state, "applicant@x.com");
    let application = seed_application(&state, Some(&student.uid));

    let response = server
        .patch(&format!(
            "/api/admin/tutor-applications/{}/status",
            application.id
        ))
        .authorization_bearer(&token)
        .json(&json!({ "status": "rejected" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Application status updated: rejected");

    let account = state
        .store
        .get_account(&student.uid)
        .unwrap()
        .expect("Account should exist");
    assert_eq!(account.role, Role::Student);
    assert!(!account.is_tutor_verified);

    let reviewed = state
        .store
        .get_application(&application.id)
        .unwrap()
        .expect("Application should exist");
    assert_eq!(reviewed.status, ApplicationStatus::Rejected);
}

/// Test: approval of an application with no linked account still records
#[tokio::test]
async fn test_review_unlinked_application() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    let application = seed_application(&state, None);

    let response = server
        .patch(&format!(
            "/api/admin/tutor-applications/{}/status",
            application.id
        ))
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let reviewed = state
        .store
        .get_application(&application.id)
        .unwrap()
        .expect("Application should exist");
    assert_eq!(reviewed.status, ApplicationStatus::Approved);
}

/// Test: only approved and rejected are accepted as decisions
#[tokio::test]
async fn test_review_invalid_status() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    let application = seed_application(&state, None);

    for body in [json!({ "status": "pending" }), json!({ "status": "maybe" }), json!({})] {
        let response = server
            .patch(&format!(
                "/api/admin/tutor-applications/{}/status",
                application.id
            ))
            .authorization_bearer(&token)
            .json(&body)
            .await;

        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid status");
    }
}

/// Test: the decision is validated before the application is looked up
#[tokio::test]
async fn test_review_validates_before_lookup() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);

    let response = server
        .patch("/api/admin/tutor-applications/no-such-id/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "maybe" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid status");
}

/// Test: reviewing an unknown application fails
#[tokio::test]
async fn test_review_unknown_application() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);

    let response = server
        .patch("/api/admin/tutor-applications/no-such-id/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "Application not found");
}

/// Test: approval fails atomically when the linked account is gone
#[tokio::test]
async fn test_review_ghost_account() {
    let (server, state) = create_test_server();
    let (_admin, token) = seed_admin_with_token(&state);
    let application = seed_application(&state, Some("ghost-uid"));

    let response = server
        .patch(&format!(
            "/api/admin/tutor-applications/{}/status",
            application.id
        ))
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "Linked account not found");

    // The application is untouched
    let unchanged = state
        .store
        .get_application(&application.id)
        .unwrap()
        .expect("Application should exist");
    assert_eq!(unchanged.status, ApplicationStatus::Pending);
    assert!(unchanged.reviewed_at.is_none());
    assert!(unchanged.reviewed_by.is_none());
}

/// Test: review requires a session
#[tokio::test]
async fn test_review_requires_auth() {
    let (server, state) = create_test_server();
    let application = seed_application(&state, None);

    let response = server
        .patch(&format!(
            "/api/admin/tutor-applications/{}/status",
            application.id
        ))
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), 401);
}
