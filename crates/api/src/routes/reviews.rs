//! Route definitions for the `/reviews` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// GET    /                                     -> list
/// GET    /stats                                -> stats
/// GET    /locations                            -> location_names
/// GET    /festivals                            -> festival_names
/// DELETE /{source}/{source_id}/{review_index}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list))
        .route("/stats", get(reviews::stats))
        .route("/locations", get(reviews::location_names))
        .route("/festivals", get(reviews::festival_names))
        .route(
            "/{source}/{source_id}/{review_index}",
            delete(reviews::delete),
        )
}
