//! Handlers for the `/festivals` resource.

use axum::extract::State;
use axum::http::StatusCode;
use voyage_core::error::CoreError;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::types::{Record, RecordId};
use voyage_store::models::festival::FestivalInput;
use voyage_store::repositories::FestivalRepo;

use super::list_query;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/festivals
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<Record>>>> {
    let query = list_query(params)?;
    let page = FestivalRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/festivals/types
pub async fn types(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let types = FestivalRepo::types(&state.store).await?;
    Ok(Json(ApiResponse::data(types)))
}

/// GET /api/festivals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let festival = FestivalRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Festival",
            id,
        }))?;
    Ok(Json(ApiResponse::data(festival)))
}

/// POST /api/festivals
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<FestivalInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let created = FestivalRepo::create(&state.store, input).await?;
    tracing::info!(id = ?created.get("Id"), email = %user.email, "Festival created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(created))))
}

/// PUT /api/festivals/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<FestivalInput>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let updated = FestivalRepo::update(&state.store, id, input).await?;
    tracing::info!(id, email = %user.email, "Festival updated");
    Ok(Json(ApiResponse::data(updated)))
}

/// DELETE /api/festivals/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<()>>> {
    FestivalRepo::delete(&state.store, id).await?;
    tracing::info!(id, email = %user.email, "Festival deleted");
    Ok(Json(ApiResponse::message("Festival deleted successfully")))
}
