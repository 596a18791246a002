//! truthordare-server: HTTP surface for the question store
//!
//! Serves the JSON API under `/api`, a health check, and optionally the
//! static single-page frontend. All storage access goes through
//! [`truthordare_core::QuestionStore`].

pub mod http;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
