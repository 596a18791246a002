//! Task text validation

use super::ValidationError;

/// Maximum length for task text
const MAX_TASK_LEN: usize = 1000;

/// Validated task text (the actual question or dare)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskText(String);

impl TaskText {
    /// Create task text.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 1000 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "task" });
        }

        if trimmed.chars().count() > MAX_TASK_LEN {
            return Err(ValidationError::TooLong {
                field: "task",
                max: MAX_TASK_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
