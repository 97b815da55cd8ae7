//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use serde::{Deserialize, Serialize};
use voyage_core::error::CoreError;
use voyage_core::roles::ROLE_ADMIN;

use crate::auth::jwt::generate_token;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: AuthUser,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Check the configured admin credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if input.email.is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".into(),
        ));
    }

    if !state.config.admin.verify(&input.email, &input.password) {
        tracing::warn!(email = %input.email, "Rejected admin login");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let token = generate_token(&input.email, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(email = %input.email, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: AuthUser {
            email: input.email,
            role: ROLE_ADMIN.to_string(),
        },
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(user: AuthUser) -> Json<ApiResponse<()>> {
    tracing::info!(email = %user.email, "Admin logged out");
    Json(ApiResponse::message("Logged out successfully"))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user,
    })
}
