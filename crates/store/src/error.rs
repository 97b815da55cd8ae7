use voyage_core::error::CoreError;

/// Error type for record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The logical table name has no configured store id.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Network failure, timeout, 429, or 5xx. `status` is `None` when no
    /// response was received.
    #[error("Record store unavailable (status {status:?}): {message}")]
    Transient {
        status: Option<u16>,
        message: String,
    },

    /// A 4xx other than 429. Never retried.
    #[error("Record store rejected the request with HTTP {status}: {message}")]
    Permanent { status: u16, message: String },

    /// The store answered 2xx with a body of an unexpected shape.
    #[error("Unexpected record store response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("Record store client setup failed: {0}")]
    Setup(String),

    /// A domain error raised while shaping store data.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Classify a non-2xx status.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 429 || (500..600).contains(&status) {
            StoreError::Transient {
                status: Some(status),
                message,
            }
        } else {
            StoreError::Permanent { status, message }
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }

    /// Whether the store reported the addressed row as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Permanent { status: 404, .. })
    }
}
