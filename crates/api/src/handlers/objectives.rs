//! Handlers for the `/objectives` resource, backed by the `items` table.

use axum::extract::State;
use axum::http::StatusCode;
use voyage_core::error::CoreError;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::types::{Record, RecordId};
use voyage_store::models::objective::ObjectiveInput;
use voyage_store::repositories::ObjectiveRepo;

use super::list_query;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/objectives
///
/// Filters: `search` (name), `type`.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<Record>>>> {
    let query = list_query(params)?;
    let page = ObjectiveRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/objectives/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let objective = ObjectiveRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Objective",
            id,
        }))?;
    Ok(Json(ApiResponse::data(objective)))
}

/// POST /api/objectives
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ObjectiveInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Record>>)> {
    let created = ObjectiveRepo::create(&state.store, input).await?;
    tracing::info!(id = ?created.get("Id"), email = %user.email, "Objective created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(created).with_message("Objective created successfully")),
    ))
}

/// PUT /api/objectives/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    Json(input): Json<ObjectiveInput>,
) -> AppResult<Json<ApiResponse<Record>>> {
    let updated = ObjectiveRepo::update(&state.store, id, input).await?;
    tracing::info!(id, email = %user.email, "Objective updated");
    Ok(Json(
        ApiResponse::data(updated).with_message("Objective updated successfully"),
    ))
}

/// DELETE /api/objectives/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> AppResult<Json<ApiResponse<()>>> {
    ObjectiveRepo::delete(&state.store, id).await?;
    tracing::info!(id, email = %user.email, "Objective deleted");
    Ok(Json(ApiResponse::message("Objective deleted successfully")))
}
