//! Login flow handlers: session start, self-registration, login, logout.

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::AppState;
use crate::dtos::auth::{
    LoginRequest, MessageResponse, RegisterRequest, SessionResponse, StartSessionRequest,
};
use crate::handlers::require_session_id;
use crate::models::Role;
use crate::utils::Password;
use service_core::error::AppError;

/// Open a session and resolve the device's login state.
///
/// POST /auth/session
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = state.auth.start_session(req.device_id).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Register the session's device under a role and log in.
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    req.validate()?;
    let session_id = require_session_id(&headers)?;

    let session = state
        .auth
        .register(
            session_id,
            Role::new(req.role),
            &Password::new(req.password),
        )
        .await?;

    Ok(Json(session.into()))
}

/// Verify the device's password and log in.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    req.validate()?;
    let session_id = require_session_id(&headers)?;

    let session = state
        .auth
        .login(session_id, &Password::new(req.password))
        .await?;

    Ok(Json(session.into()))
}

/// Destroy the session.
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let session_id = require_session_id(&headers)?;
    state.auth.logout(session_id);
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
