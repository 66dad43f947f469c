//! User administration endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use tutorhub_core::model::{Account, Role};

use crate::auth::require_admin;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<Account>,
}

/// GET /api/admin/users?role=student|tutor|admin
pub async fn list_users<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UsersResponse>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;

    let users = match query.role.as_deref().filter(|s| !s.is_empty()) {
        None => state.store.list_accounts(None)?,
        Some(role) => match Role::from_str(role) {
            Some(role) => state.store.list_accounts(Some(role))?,
            // Unknown role names match nothing
            None => Vec::new(),
        },
    };

    Ok(Json(UsersResponse { users }))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    #[serde(default)]
    pub is_blocked: bool,
}

#[derive(Serialize)]
pub struct BlockResponse {
    pub message: String,
}

/// PATCH /api/admin/users/:uid/block
///
/// An absent body or flag clears the block, mirroring how a bare
/// toggle request reads.
pub async fn set_block_status<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    body: Option<Json<BlockRequest>>,
) -> Result<Json<BlockResponse>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;

    let req = body.map(|Json(req)| req).unwrap_or_default();
    state.store.set_blocked(&uid, req.is_blocked)?;
    state.refresh_stats()?;

    Ok(Json(BlockResponse {
        message: "Account block status updated".to_string(),
    }))
}
