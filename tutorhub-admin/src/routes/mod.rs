//! HTTP routes for the admin API

mod applications;
mod bookings;
mod login;
mod profile;
mod stats;
mod users;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::store::MarketStore;

/// Create the router with all routes
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: MarketStore + 'static,
{
    Router::new()
        .route("/api/admin/login", post(login::login))
        .route("/api/admin/logout", post(login::logout))
        .route("/api/admin/me", get(profile::me))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/:uid/block", patch(users::set_block_status))
        .route(
            "/api/admin/tutor-applications",
            get(applications::list_applications),
        )
        .route(
            "/api/admin/tutor-applications/:id/status",
            patch(applications::review_application),
        )
        .route("/api/admin/bookings", get(bookings::list_bookings))
        .route("/api/admin/stats", get(stats::get_stats))
        .route("/api/admin/stats/live", get(stats::stats_live))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
