use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}

impl CollectionError {
    /// Classify a driver error. Connection-level failures become
    /// [`CollectionError::StoreUnavailable`]; everything else is a query
    /// failure.
    pub fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => {
                Self::StoreUnavailable(format!("{context}: {err}"))
            }
            other => Self::Query(format!("{context}: {other}")),
        }
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Query(_))
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;
