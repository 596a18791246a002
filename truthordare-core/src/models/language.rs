//! Language code validation
//!
//! Short ISO-style codes such as `en`, `de` or `pt-BR`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for language codes
const MAX_LANGUAGE_LEN: usize = 16;

/// Starts with alphanumeric, then alphanumerics, hyphens or underscores
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("invalid language regex")
});

/// Validated language code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code from user input.
    ///
    /// # Rules
    /// - Non-empty after trimming whitespace
    /// - Max 16 characters
    /// - ASCII alphanumeric, hyphens, underscores; starts with alphanumeric
    ///
    /// # Example
    /// ```
    /// use truthordare_core::models::LanguageCode;
    ///
    /// assert!(LanguageCode::new("en").is_ok());
    /// assert!(LanguageCode::new("pt-BR").is_ok());
    /// assert!(LanguageCode::new("e n").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "language" });
        }

        if trimmed.len() > MAX_LANGUAGE_LEN {
            return Err(ValidationError::TooLong {
                field: "language",
                max: MAX_LANGUAGE_LEN,
            });
        }

        if !LANGUAGE_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "language",
                reason: "must be ASCII alphanumeric with hyphens/underscores",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
