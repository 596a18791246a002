//! Database layer - storage handle, schema and repository
//!
//! # Design Principles
//!
//! - One owned `Storage` handle (pool + dialect), passed in explicitly
//! - List operations are a single grouped query - no N+1
//! - Rely on DB constraints for tag uniqueness - no check-then-insert
//! - Transactions for multi-step writes, rolled back on any failure

pub mod error;
pub mod repo;
pub mod schema;
pub mod storage;

pub use error::{RepoError, RepoResult};
pub use repo::{with_deadline, QuestionStore, SqlQuestionRepo};
pub use schema::ensure_schema;
pub use storage::{connect, Storage};

/// Underlying driver error carried by [`RepoError`] variants
pub use sqlx::Error as SqlxError;
