use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::auth::{self, CurrentUser};
use crate::services::identity_service::{AuthSession, PublicUser};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware for `Authorization: Bearer <token>`.
/// Decodes the token and attaches the caller as a [`CurrentUser`] extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let user = authenticate(&state, &headers)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolve the caller from the bearer token. Claims are trusted for the
/// token lifetime; no database lookup happens here.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    auth::verify_token(&token, &state.config.auth.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
}

/// Authenticate and require the admin claim.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let user = authenticate(state, headers)?;
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(user)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
/// Create an account; responds with a session token and the public user view
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthSession>>), ApiError> {
    let session = state
        .identity
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

/// POST /api/auth/login
/// Authenticate with username and password, returns a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    let session = state
        .identity
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(session)))
}

/// POST /api/auth/logout
/// Stateless no-op beyond the client discarding its token
pub async fn logout() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// GET /api/auth/me
/// Get the authenticated user's record (requires a live user row)
pub async fn me(
    State(state): State<Arc<AppState>>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let user = state.identity.current_user(user.id).await?;

    Ok(Json(ApiResponse::success(user)))
}
