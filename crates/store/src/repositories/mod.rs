//! Per-entity data access over a [`RecordClient`](crate::RecordClient).
//!
//! Repositories are zero-sized structs with async associated functions that
//! take the client as their first argument. They own the mapping from a
//! [`ListQuery`](voyage_core::query::ListQuery) to the store's filter
//! expression and the shaping of records on the way in and out.

pub mod account_repo;
pub mod dashboard_repo;
pub mod festival_repo;
pub mod location_repo;
pub mod object_repo;
pub mod objective_repo;
pub mod review_repo;
pub mod transaction_repo;

pub use account_repo::AccountRepo;
pub use dashboard_repo::DashboardRepo;
pub use festival_repo::FestivalRepo;
pub use location_repo::LocationRepo;
pub use object_repo::ObjectRepo;
pub use objective_repo::ObjectiveRepo;
pub use review_repo::ReviewRepo;
pub use transaction_repo::TransactionRepo;

use voyage_core::query::ListQuery;

use crate::client::ListOptions;

/// Options for a natively sorted page of `query`.
pub(crate) fn native_options(query: &ListQuery, filter: Option<String>) -> ListOptions {
    ListOptions::page(query.page, query.limit)
        .filter(filter)
        .sort(query.sort_expression())
}
