use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use tubely_core::AppError;
use uuid::Uuid;

use crate::auth::jwt::validate_jwt;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing authorization header".to_string(),
                ))
            })?
            .to_str()
            .map_err(|_| {
                HttpAppError(AppError::Unauthorized(
                    "Invalid authorization header format".to_string(),
                ))
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
        })?;

        let user_id = validate_jwt(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            HttpAppError(AppError::Unauthorized("Couldn't validate JWT".to_string()))
        })?;

        Ok(AuthUser { user_id })
    }
}
