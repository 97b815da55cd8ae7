//! Route definitions for the `/festivals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::festivals;
use crate::state::AppState;

/// Routes mounted at `/festivals`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /types         -> types
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(festivals::list).post(festivals::create))
        .route("/types", get(festivals::types))
        .route(
            "/{id}",
            get(festivals::get_by_id)
                .put(festivals::update)
                .delete(festivals::delete),
        )
}
