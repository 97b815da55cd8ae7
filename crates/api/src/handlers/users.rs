//! Handlers for the `/users` resource (mobile app accounts).
//!
//! Passwords are hashed with the configured salt before they reach the
//! store and never appear in a response.

use axum::extract::State;
use axum::http::StatusCode;
use voyage_core::error::CoreError;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::types::{Record, RecordId};
use voyage_store::models::account::{AccountInput, AccountView};
use voyage_store::repositories::AccountRepo;

use super::list_query;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<AccountView>>>> {
    let query = list_query(params)?;
    let page = AccountRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<AccountView>>> {
    let account = AccountRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(ApiResponse::data(account)))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AccountInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let admin = &state.config.admin;
    let mut created = AccountRepo::create(&state.store, input, |p| admin.hash(p)).await?;
    created.remove("password");
    tracing::info!(id = ?created.get("Id"), email = %user.email, "User created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(created).with_message("User created successfully")),
    ))
}

/// PUT /api/users/{id}
///
/// Only provided fields change; an empty password keeps the current one.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<AccountInput>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let admin = &state.config.admin;
    let mut updated = AccountRepo::update(&state.store, id, input, |p| admin.hash(p)).await?;
    updated.remove("password");
    tracing::info!(id, email = %user.email, "User updated");
    Ok(Json(
        ApiResponse::data(updated).with_message("User updated successfully"),
    ))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<()>>> {
    AccountRepo::delete(&state.store, id).await?;
    tracing::info!(id, email = %user.email, "User deleted");
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
