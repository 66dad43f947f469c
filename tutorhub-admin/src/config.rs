//! Admin service configuration
//!
//! All settings come from the environment. The token signing secret
//! has no default and must be provided.

use anyhow::Context;

use tutorhub_core::token::TOKEN_TTL_DAYS;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Secret used to sign admin session tokens
    pub jwt_secret: String,

    /// Token lifetime in days
    pub token_ttl_days: i64,

    /// SQLite database path; in-memory storage when unset
    pub db_path: Option<String>,

    /// Admin account created at startup if missing
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(s) => s.parse().context("PORT must be a number")?,
            Err(_) => 3000,
        };

        let jwt_secret =
            std::env::var("ADMIN_JWT_SECRET").context("ADMIN_JWT_SECRET must be set")?;

        let token_ttl_days = match std::env::var("ADMIN_TOKEN_TTL_DAYS") {
            Ok(s) => s.parse().context("ADMIN_TOKEN_TTL_DAYS must be a number")?,
            Err(_) => TOKEN_TTL_DAYS,
        };

        let db_path = std::env::var("ADMIN_DB_PATH").ok();

        let bootstrap_admin = match (
            std::env::var("ADMIN_BOOTSTRAP_EMAIL"),
            std::env::var("ADMIN_BOOTSTRAP_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            (Err(_), Err(_)) => None,
            _ => anyhow::bail!(
                "ADMIN_BOOTSTRAP_EMAIL and ADMIN_BOOTSTRAP_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            port,
            jwt_secret,
            token_ttl_days,
            db_path,
            bootstrap_admin,
        })
    }
}
