//! Bearer-token authentication extractor.
//!
//! Provides an extractor for requiring an authenticated user in route
//! handlers. The session token is a signed JWT presented as
//! `Authorization: Bearer <token>`.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use revupage_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 Unauthorized if the header is missing, malformed, or the
/// token fails verification. The wrapped value is the user id the token
/// asserts; handlers that need the full profile load it themselves.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user_id): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, user {user_id}!")
/// }
/// ```
pub struct RequireUser(pub UserId);

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

        let user_id = state
            .tokens()
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_owned()))?;

        Ok(Self(user_id))
    }
}
