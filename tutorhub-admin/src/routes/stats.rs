//! Dashboard aggregates, as a snapshot and as a live stream

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::stream::{unfold, Stream};

use tutorhub_core::stats::DashboardStats;

use crate::auth::require_admin;
use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

/// GET /api/admin/stats
pub async fn get_stats<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;
    let stats = state.refresh_stats()?;
    Ok(Json(stats))
}

/// GET /api/admin/stats/live
///
/// Server-sent events: one frame with the current aggregates right
/// away, then one per change.
pub async fn stats_live<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AdminError>
where
    S: MarketStore,
{
    require_admin(&state, &headers)?;

    state.refresh_stats()?;
    let rx = state.subscribe_stats();

    let stream = unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let stats = rx.borrow_and_update().clone();
        let event = Event::default().json_data(&stats);
        Some((event, (rx, false)))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
