//! Bearer token authentication for admin routes

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use tutorhub_core::model::{Account, Role};

use crate::error::AdminError;
use crate::state::AppState;
use crate::store::MarketStore;

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AdminError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AdminError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AdminError::MalformedAuthorization)?;

    // Expected format: "Bearer <token>"
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        return Err(AdminError::MalformedAuthorization);
    }

    Ok(parts[1])
}

/// Verify the request's bearer token and load the admin it belongs to
///
/// Rejects expired tokens, tokens issued at or before the uid's
/// revocation cutoff, and tokens whose subject is not an admin.
pub fn require_admin<S: MarketStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<Account, AdminError> {
    let token = bearer_token(headers)?;
    let claims = state
        .signer
        .verify(token)
        .map_err(|_| AdminError::InvalidToken)?;

    if let Some(cutoff) = state.store.revoked_at(&claims.uid)? {
        if claims.iat <= cutoff.timestamp() {
            return Err(AdminError::TokenRevoked);
        }
    }

    if claims.role != Role::Admin {
        return Err(AdminError::NotAdmin);
    }

    state
        .store
        .get_account(&claims.uid)?
        .ok_or(AdminError::AdminNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AdminError::MissingAuthorization)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with("Token abc123");
        assert!(matches!(
            bearer_token(&headers),
            Err(AdminError::MalformedAuthorization)
        ));
    }

    #[test]
    fn test_missing_token_part() {
        assert!(matches!(
            bearer_token(&headers_with("Bearer")),
            Err(AdminError::MalformedAuthorization)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AdminError::MalformedAuthorization)
        ));
    }

    #[test]
    fn test_extra_parts_rejected() {
        let headers = headers_with("Bearer abc 123");
        assert!(matches!(
            bearer_token(&headers),
            Err(AdminError::MalformedAuthorization)
        ));
    }

    #[test]
    fn test_well_formed_header() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }
}
