//! Authentication route handlers.
//!
//! OTP dispatch and verification, registration, login, and profile
//! management. Wire DTOs are camelCase to match the frontend.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use revupage_core::{Email, UserId};

use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Request body for sending a login code.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

/// Request body for verifying a login code.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
}

/// Request body for login. Exactly one of `password` or `otp` is used.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Option<String>,
    pub otp: Option<String>,
}

/// Request body for a profile update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Simple acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Authentication response: the user identity plus a session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Email,
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }
    }
}

/// User profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Email,
    pub phone_number: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /auth/send-otp
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());
    auth.send_login_code(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "Login code sent",
    }))
}

/// POST /auth/verify-otp
///
/// A failed check here is a client mistake (wrong or expired code typed into
/// a form), reported as 400 rather than the 401 the login path uses.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());

    auth.verify_code(&req.email, &req.otp)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCode => ApiError::BadRequest("invalid or expired code".to_owned()),
            other => ApiError::Auth(other),
        })?;

    Ok(Json(MessageResponse {
        message: "Code verified",
    }))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());

    let (user, token) = auth
        .register(
            &req.email,
            req.name.as_deref(),
            req.password.as_deref(),
            req.phone_number.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());

    let (user, token) = auth
        .login(&req.email, req.password.as_deref(), req.otp.as_deref())
        .await?;

    Ok(Json(AuthResponse::new(user, token)))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());
    let user = auth.get_user(user_id).await?;

    Ok(Json(user.into()))
}

/// PUT /auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens(), state.email());
    let user = auth
        .update_profile(user_id, req.name.as_deref(), req.phone_number.as_deref())
        .await?;

    Ok(Json(user.into()))
}
