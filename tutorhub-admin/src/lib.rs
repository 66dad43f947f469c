//! TutorHub Admin Backend
//!
//! The back office service for the tutoring marketplace: admin
//! authentication, user and tutor-application management, booking
//! oversight and live dashboard statistics.

pub mod auth;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use client::{AdminClient, ClientError, StoredSession};
pub use config::Config;
pub use error::AdminError;
pub use state::AppState;
pub use store::{MarketStore, MemoryStore, SqliteStore};
