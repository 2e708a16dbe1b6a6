//! Error types for log queries

use thiserror::Error;

/// Errors surfaced by the query layer. Empty result sets are never errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// `group_by` named a field outside the allow-list
    #[error("invalid group_by field: {0:?} (expected one of status, method, protocol, host)")]
    InvalidGroupBy(String),

    /// Page size outside [1, 1000]
    #[error("limit must be between 1 and {max}, got {0}", max = crate::retriever::MAX_LIMIT)]
    InvalidLimit(u64),

    /// Configured table name is not a plain identifier
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    /// The store rejected or failed to run a statement
    #[error("store query failed: {0}")]
    Store(#[from] clickhouse::error::Error),

    /// A bucket start could not be rendered as a label
    #[error("failed to format bucket label: {0}")]
    Label(String),

    /// A stored timestamp could not be represented
    #[error("invalid stored timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),
}

impl QueryError {
    /// Whether the caller supplied bad input, as opposed to the store failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidGroupBy(_) | QueryError::InvalidLimit(_)
        )
    }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
