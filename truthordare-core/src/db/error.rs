//! Repository error types

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by the storage layer
///
/// Nothing here is retried automatically; connection retry only happens
/// during startup in [`crate::db::connect`].
#[derive(Debug, Error)]
pub enum RepoError {
    /// Missing or invalid connection parameters
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Storage unreachable
    #[error("storage unreachable: {0}")]
    Connection(#[source] sqlx::Error),

    /// Query execution failed
    #[error("{context} failed: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A row did not have the expected shape
    #[error("cannot decode {context}: {reason}")]
    Mapping {
        context: &'static str,
        reason: String,
    },

    /// A step of a write transaction failed; the transaction was rolled back
    #[error("transaction failed at {step}: {source}")]
    Transaction {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The call did not finish before its deadline
    #[error("{operation} exceeded deadline of {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl RepoError {
    /// Classify a read-path sqlx error.
    pub fn from_sqlx(context: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(err),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_) => Self::Mapping {
                context,
                reason: err.to_string(),
            },
            other => Self::Query {
                context,
                source: other,
            },
        }
    }

    /// Whether the failure is about reaching storage rather than the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
