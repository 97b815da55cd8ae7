use axum::routing::get;
use axum::Router;

use crate::handlers::objectives;
use crate::state::AppState;

/// Routes mounted at `/objectives`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(objectives::list).post(objectives::create))
        .route(
            "/{id}",
            get(objectives::get_by_id).put(objectives::update).delete(objectives::delete),
        )
}
