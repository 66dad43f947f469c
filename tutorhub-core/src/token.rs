//! Admin session tokens
//!
//! Tokens are HS256 JWTs carrying the admin's uid, email, and role.
//! The signing secret is supplied by the caller and never stored in
//! this crate.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::model::{Account, Role};
use crate::{Error, Result};

/// Default token lifetime in days
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried in an admin session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject account id
    pub uid: String,

    /// Email at time of issue
    pub email: String,

    /// Role at time of issue
    pub role: Role,

    /// Issued at time (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AdminClaims {
    /// Check if the token has passed its expiration time
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs and verifies admin session tokens with a shared secret
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer from a shared secret and a token lifetime in days
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for an account
    pub fn sign(&self, account: &Account) -> Result<String> {
        let now = Utc::now();
        let claims = AdminClaims {
            uid: account.uid.clone(),
            email: account.email.clone(),
            role: account.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token's signature and expiration, returning its claims
    pub fn verify(&self, token: &str) -> Result<AdminClaims> {
        match jsonwebtoken::decode::<AdminClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(Error::TokenExpired),
                _ => Err(Error::InvalidToken),
            },
        }
    }
}

/// Read a token's claims without verifying the signature
///
/// Useful for inspecting expiry client-side; never trust the result
/// for authorization.
pub fn peek(token: &str) -> Result<AdminClaims> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let payload = token.split('.').nth(1).ok_or(Error::InvalidToken)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims: AdminClaims = serde_json::from_slice(&bytes)?;

    Ok(claims)
}
