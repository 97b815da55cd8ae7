//! Handlers for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use voyage_store::repositories::dashboard_repo::{DashboardCharts, DashboardStats};
use voyage_store::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let stats = DashboardRepo::stats(&state.store).await?;
    Ok(Json(ApiResponse::data(stats)))
}

/// GET /api/dashboard/charts
pub async fn charts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardCharts>>> {
    let today = Utc::now().date_naive();
    let charts = DashboardRepo::charts(&state.store, today).await?;
    Ok(Json(ApiResponse::data(charts)))
}
