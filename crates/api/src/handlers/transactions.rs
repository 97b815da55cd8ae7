//! Handlers for the read-only `/transactions` resource.

use axum::extract::State;
use voyage_core::paging::Page;
use voyage_core::query::ListParams;
use voyage_core::stats::TransactionStats;
use voyage_store::models::transaction::TransactionView;
use voyage_store::repositories::TransactionRepo;

use super::list_query;
use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/transactions
///
/// Newest first. Filters: `search`, `status`.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Page<TransactionView>>>> {
    let query = list_query(params)?;
    let page = TransactionRepo::list(&state.store, &query).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/transactions/stats
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<TransactionStats>>> {
    let stats = TransactionRepo::stats(&state.store).await?;
    Ok(Json(ApiResponse::data(stats)))
}
