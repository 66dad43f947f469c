//! Current admin profile

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use tutorhub_core::model::AdminProfile;

use crate::auth::require_admin;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

/// GET /api/admin/me
pub async fn me<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<AdminProfile>, AdminError>
where
    S: MarketStore,
{
    let admin = require_admin(&state, &headers)?;
    Ok(Json(admin.profile()))
}
