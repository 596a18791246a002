//! Command implementations for the truthordare CLI

pub mod add;
pub mod database;
pub mod import;
pub mod questions;
pub mod serve;
pub mod tags;

// Re-export dispatcher functions for flat access from main.rs
pub use add::run_add;
pub use import::run_import;
pub use questions::run_questions;
pub use serve::run_serve;
pub use tags::run_tags;
