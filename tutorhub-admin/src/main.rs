//! TutorHub Admin Backend
//!
//! The back office service for the tutoring marketplace: admin
//! authentication, user and tutor-application management, booking
//! oversight and live dashboard statistics.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorhub_admin::crypto::hash_password;
use tutorhub_admin::routes;
use tutorhub_admin::store::{MemoryStore, NewAccount, SqliteStore};
use tutorhub_admin::{AppState, Config, MarketStore};
use tutorhub_core::model::Role;
use tutorhub_core::token::TokenSigner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutorhub_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Loaded configuration");

    match config.db_path.clone() {
        Some(path) => {
            tracing::info!(db = %path, "Using SQLite storage");
            serve(SqliteStore::open(&path)?, config).await
        }
        None => {
            tracing::info!("Using in-memory storage");
            serve(MemoryStore::default(), config).await
        }
    }
}

async fn serve<S: MarketStore + 'static>(store: S, config: Config) -> Result<()> {
    if let Some(bootstrap) = &config.bootstrap_admin {
        ensure_admin(&store, &bootstrap.email, &bootstrap.password)?;
    }

    // Create app state
    let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl_days);
    let state = Arc::new(AppState::new(store, signer)?);

    // Create router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Admin API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the configured admin account unless one already exists
fn ensure_admin<S: MarketStore>(store: &S, email: &str, password: &str) -> Result<()> {
    if store.find_admin_by_email(email)?.is_some() {
        tracing::debug!(email = %email, "Bootstrap admin already exists");
        return Ok(());
    }

    let hashed = hash_password(password)?;
    let account = store.create_account(NewAccount {
        email: email.to_string(),
        display_name: Some("Admin".to_string()),
        role: Role::Admin,
        hashed_password: Some(hashed),
    })?;
    tracing::info!(uid = %account.uid, email = %email, "Created bootstrap admin");

    Ok(())
}
