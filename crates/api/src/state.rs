use std::sync::Arc;

use voyage_store::RecordClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Record store client. Holds only immutable configuration.
    pub store: Arc<RecordClient>,
    pub config: Arc<ServerConfig>,
}
