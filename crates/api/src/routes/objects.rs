use axum::routing::get;
use axum::Router;

use crate::handlers::objects;
use crate::state::AppState;

/// Routes mounted at `/objects`.
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
        .route("/", get(objects::list).post(objects::create))
        .route(
            "/{id}",
            get(objects::get_by_id).put(objects::update).delete(objects::delete),
        )
}
