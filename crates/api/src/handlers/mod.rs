//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: extract, call the repository, wrap the result in an
//! [`ApiResponse`](crate::response::ApiResponse). Errors propagate with `?`
//! into [`AppError`](crate::error::AppError).

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

use voyage_core::query::{ListParams, ListQuery};

use crate::error::AppResult;

/// Validate raw list parameters once, at the edge.
pub(crate) fn list_query(params: ListParams) -> AppResult<ListQuery> {
    Ok(ListQuery::from_params(params)?)
}
