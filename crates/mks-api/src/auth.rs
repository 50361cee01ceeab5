//! # Authentication
//!
//! Bearer-token authentication for the API surface. The session/identity
//! system itself is an external collaborator — this layer only checks the
//! presented credential and exposes the caller as a [`CallerIdentity`]
//! capability that handlers receive as an extractor.
//!
//! When no token is configured ([`AuthConfig::token`] is `None`) the API
//! runs unauthenticated, which is the development and test mode. Health
//! probes and the OpenAPI document are mounted outside the authenticated
//! surface either way.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// A secret credential that never appears in debug output.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Constant-time equality against a presented credential.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString(<redacted>)")
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Static bearer token; `None` disables authentication.
    pub token: Option<SecretString>,
}

/// The authenticated caller, extracted per-request.
///
/// `user_id` (from the `x-user-id` header, supplied by the session frontend)
/// is stamped onto photo records as `created_by` when present.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: Option<Uuid>,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        if let Some(expected) = &state.config.auth_token {
            let presented = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    AppError::Unauthorized("missing bearer token".to_string())
                })?;

            if !expected.matches(presented) {
                return Err(AppError::Unauthorized("invalid bearer token".to_string()));
            }
        }

        let user_id = match parts.headers.get("x-user-id") {
            Some(value) => {
                let raw = value.to_str().map_err(|_| {
                    AppError::Unauthorized("malformed x-user-id header".to_string())
                })?;
                Some(Uuid::parse_str(raw).map_err(|_| {
                    AppError::Unauthorized("malformed x-user-id header".to_string())
                })?)
            }
            None => None,
        };

        Ok(CallerIdentity { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_string_matches_itself() {
        let secret = SecretString::new("makerspace-token");
        assert!(secret.matches("makerspace-token"));
        assert!(!secret.matches("makerspace-token2"));
        assert!(!secret.matches(""));
    }

    #[test]
    fn secret_string_debug_is_redacted() {
        let secret = SecretString::new("hunter2");
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("redacted"));
    }
}
