//! Admin login and logout

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use tutorhub_core::model::AdminProfile;

use crate::auth::require_admin;
use crate::crypto::verify_password;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminProfile,
}

/// POST /api/admin/login
pub async fn login<S>(
    State(state): State<Arc<AppState<S>>>,
    body: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AdminError>
where
    S: MarketStore,
{
    let Json(req) = body.ok_or(AdminError::MissingCredentials)?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AdminError::MissingCredentials);
    }

    // Whether the email is unknown or the password is wrong, the
    // caller sees the same response
    let admin = state
        .store
        .find_admin_by_email(&email)?
        .ok_or(AdminError::InvalidCredentials)?;

    let hash = admin
        .hashed_password
        .as_deref()
        .ok_or(AdminError::PasswordNotConfigured)?;

    let valid =
        verify_password(&password, hash).map_err(|e| AdminError::Internal(e.to_string()))?;
    if !valid {
        return Err(AdminError::InvalidCredentials);
    }

    let token = state
        .signer
        .sign(&admin)
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    tracing::info!(uid = %admin.uid, "Admin logged in");

    Ok(Json(LoginResponse {
        message: "Admin login successful".to_string(),
        token,
        admin: admin.profile(),
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// POST /api/admin/logout
///
/// Revokes every token issued to the admin so far. Tokens signed after
/// this moment work again, so a fresh login is unaffected.
pub async fn logout<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AdminError>
where
    S: MarketStore,
{
    let admin = require_admin(&state, &headers)?;
    state.store.revoke_tokens(&admin.uid, Utc::now())?;

    tracing::info!(uid = %admin.uid, "Admin logged out");

    Ok(Json(LogoutResponse {
        message: "Logged out".to_string(),
    }))
}
