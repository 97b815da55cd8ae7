//! Handlers for the `/locations` resource.

use axum::extract::State;
use axum::http::StatusCode;
use voyage_core::error::CoreError;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::types::{Record, RecordId};
use voyage_store::models::location::{LocationInput, MarkerUpdate};
use voyage_store::repositories::LocationRepo;

use super::list_query;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/locations
///
/// Filters: `search`, `types`, `hasMarker`. `sort=rating` orders by the
/// average review rating.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<Record>>>> {
    let query = list_query(params)?;
    let page = LocationRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/locations/types
pub async fn types(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let types = LocationRepo::types(&state.store).await?;
    Ok(Json(ApiResponse::data(types)))
}

/// GET /api/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let location = LocationRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;
    Ok(Json(ApiResponse::data(location)))
}

/// POST /api/locations
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<LocationInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let created = LocationRepo::create(&state.store, input).await?;
    tracing::info!(id = ?created.get("Id"), email = %user.email, "Location created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(created))))
}

/// PUT /api/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<LocationInput>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let updated = LocationRepo::update(&state.store, id, input).await?;
    tracing::info!(id, email = %user.email, "Location updated");
    Ok(Json(ApiResponse::data(updated)))
}

/// PATCH /api/locations/{id}/marker
pub async fn set_marker(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<MarkerUpdate>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let updated = LocationRepo::set_marker(&state.store, id, input.marker).await?;
    tracing::info!(id, marker = input.marker, email = %user.email, "Location marker changed");
    Ok(Json(ApiResponse::data(updated)))
}

/// DELETE /api/locations/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<()>>> {
    LocationRepo::delete(&state.store, id).await?;
    tracing::info!(id, email = %user.email, "Location deleted");
    Ok(Json(ApiResponse::message("Location deleted successfully")))
}
