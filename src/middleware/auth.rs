use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{error::AppError, state::AppState};

/// Caller identity resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized("empty auth header"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid auth header"))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("invalid auth header"))?
            .trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("token is empty"));
        }

        let user_id = state.tokens().verify(token).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            AppError::Unauthorized("invalid or expired token")
        })?;

        Ok(AuthUser { user_id })
    }
}
