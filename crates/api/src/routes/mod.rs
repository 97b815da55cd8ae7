pub mod auth;
pub mod dashboard;
pub mod festivals;
pub mod health;
pub mod locations;
pub mod objectives;
pub mod objects;
pub mod reviews;
pub mod transactions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          status (public)
///
/// /auth/login                                      login (public)
/// /auth/logout                                     logout
/// /auth/me                                         current operator
///
/// /dashboard/stats                                 row counts
/// /dashboard/charts                                chart series
///
/// /locations                                       list, create
/// /locations/types                                 distinct types
/// /locations/{id}                                  get, update, delete
/// /locations/{id}/marker                           show/hide marker (PATCH)
///
/// /festivals                                       list, create
/// /festivals/types                                 distinct types
/// /festivals/{id}                                  get, update, delete
///
/// /reviews                                         merged list
/// /reviews/stats                                   totals
/// /reviews/locations                               location names
/// /reviews/festivals                               festival names
/// /reviews/{source}/{source_id}/{review_index}     delete one (DELETE)
///
/// /users                                           list, create
/// /users/{id}                                      get, update, delete
///
/// /objects                                         list, create
/// /objects/{id}                                    get, update, delete
///
/// /objectives                                      list, create
/// /objectives/{id}                                 get, update, delete
///
/// /transactions                                    list
/// /transactions/stats                              totals
/// ```
///
/// Everything except `/health` and `/auth/login` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/locations", locations::router())
        .nest("/festivals", festivals::router())
        .nest("/reviews", reviews::router())
        .nest("/users", users::router())
        .nest("/objects", objects::router())
        .nest("/objectives", objectives::router())
        .nest("/transactions", transactions::router())
}
