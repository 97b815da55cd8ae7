use axum::routing::get;
use axum::Router;

use crate::handlers::transactions;
use crate::state::AppState;

/// Routes mounted at `/transactions`. Read-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transactions::list))
        .route("/stats", get(transactions::stats))
}
