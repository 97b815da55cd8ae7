//! Handlers for the `/objects` resource: labels for the app's image
//! recognition feature.

use axum::extract::State;
use axum::http::StatusCode;
use voyage_core::error::CoreError;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::types::{Record, RecordId};
use voyage_store::models::object::ObjectInput;
use voyage_store::repositories::ObjectRepo;

use super::list_query;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/objects
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<Record>>>> {
    let query = list_query(params)?;
    let page = ObjectRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/objects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let object = ObjectRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Object", id }))?;
    Ok(Json(ApiResponse::data(object)))
}

/// POST /api/objects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ObjectInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let created = ObjectRepo::create(&state.store, input).await?;
    tracing::info!(id = ?created.get("Id"), email = %user.email, "Object created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(created).with_message("Object created successfully")),
    ))
}

/// PUT /api/objects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<ObjectInput>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let updated = ObjectRepo::update(&state.store, id, input).await?;
    tracing::info!(id, email = %user.email, "Object updated");
    Ok(Json(
        ApiResponse::data(updated).with_message("Object updated successfully"),
    ))
}

/// DELETE /api/objects/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<()>>> {
    ObjectRepo::delete(&state.store, id).await?;
    tracing::info!(id, email = %user.email, "Object deleted");
    Ok(Json(ApiResponse::message("Object deleted successfully")))
}
