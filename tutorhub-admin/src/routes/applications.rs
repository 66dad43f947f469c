//! Tutor application review endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorhub_core::model::{ApplicationStatus, TutorApplication};

use crate::auth::require_admin;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

#[derive(Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<TutorApplication>,
}

/// GET /api/admin/tutor-applications?status=pending|approved|rejected
pub async fn list_applications<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<ApplicationsResponse>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;

    let applications = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => state.store.list_applications(None)?,
        Some(status) => match ApplicationStatus::from_str(status) {
            Some(status) => state.store.list_applications(Some(status))?,
            None => Vec::new(),
        },
    };

    Ok(Json(ApplicationsResponse { applications }))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub message: String,
}

/// PATCH /api/admin/tutor-applications/:id/status
///
/// Only `approved` and `rejected` are accepted; anything else fails
/// before any write happens.
pub async fn review_application<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<ReviewRequest>>,
) -> Result<Json<ReviewResponse>, AdminError>
where
    S: MarketStore,
{
    let admin = require_admin(&state, &headers)?;

    let decision = body
        .and_then(|Json(req)| req.status)
        .and_then(|s| ApplicationStatus::from_str(&s))
        .filter(|s| *s != ApplicationStatus::Pending)
        .ok_or(AdminError::InvalidReviewStatus)?;

    state.store.review_application(&id, decision, &admin.uid)?;
    state.refresh_stats()?;

    tracing::info!(application = %id, decision = decision.as_str(), "Application reviewed");

    Ok(Json(ReviewResponse {
        message: format!("Application status updated: {}", decision.as_str()),
    }))
}
