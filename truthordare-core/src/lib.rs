//! truthordare-core: questions, tags and the queries over them
//!
//! Owns the pieces with actual design decisions in them:
//! - `query`: typed predicates rendered into parameterized SQL
//! - `db`: storage handle, schema bootstrap and the question repository
//!
//! HTTP and CLI front-ends live in their own crates and only talk to
//! [`QuestionStore`].

pub mod config;
pub mod db;
pub mod models;
pub mod query;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{
    connect, ensure_schema, QuestionStore, RepoError, RepoResult, SqlQuestionRepo, Storage,
};
pub use models::{
    LanguageCode, NewQuestion, Question, QuestionType, TagName, TaskText, ValidationError,
};
pub use query::{BuiltQuery, Dialect, Predicate, QueryCriteria, TagMatch};
