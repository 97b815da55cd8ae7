//! Handlers for the `/reviews` resource.
//!
//! Reviews live inside location and festival records; see
//! [`ReviewRepo`] for how they are merged and rewritten.

use axum::extract::State;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::reviews::{MergedReview, ReviewSource, ReviewStats};
use voyage_core::types::RecordId;
use voyage_store::repositories::review_repo::SourceName;
use voyage_store::repositories::ReviewRepo;

use super::list_query;
use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/reviews
///
/// Filters: `search`, `locationId`, `festivalId`. Always sorted by rating,
/// highest first.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<MergedReview>>>> {
    let query = list_query(params)?;
    let page = ReviewRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/reviews/stats
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<ReviewStats>>> {
    let stats = ReviewRepo::stats(&state.store).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// GET /api/reviews/locations
pub async fn location_names(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<SourceName>>>> {
    let names = ReviewRepo::source_names(&state.store, ReviewSource::Location).await?;
    Ok(Json(ApiResponse::data(names)))
}

/// GET /api/reviews/festivals
pub async fn festival_names(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<SourceName>>>> {
    let names = ReviewRepo::source_names(&state.store, ReviewSource::Festival).await?;
    Ok(Json(ApiResponse::data(names)))
}

/// DELETE /api/reviews/{source}/{source_id}/{review_index}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((source, source_id, review_index)): Path<(String, RecordId, i64)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let source = ReviewSource::parse(&source)?;
    let removal = ReviewRepo::delete_at(&state.store, source, source_id, review_index).await?;
    tracing::info!(
        source = source.label(),
        source_id,
        review_index,
        remaining = removal.remaining,
        email = %user.email,
        "Review deleted",
    );
    Ok(Json(ApiResponse::message("Review deleted successfully")))
}
