//! Route definitions for the `/locations` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /types         -> types
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PATCH  /{id}/marker   -> set_marker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(locations::list).post(locations::create))
        .route("/types", get(locations::types))
        .route(
            "/{id}",
            get(locations::get_by_id)
                .put(locations::update)
                .delete(locations::delete),
        )
        .route("/{id}/marker", patch(locations::set_marker))
}
