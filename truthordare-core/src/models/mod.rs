//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod language;
pub mod question;
pub mod tag;
pub mod task;

pub use validation::ValidationError;
pub use language::LanguageCode;
pub use question::{NewQuestion, Question, QuestionType};
pub use tag::TagName;
pub use task::TaskText;
