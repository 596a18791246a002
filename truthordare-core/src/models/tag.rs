//! Tag name validation
//!
//! Tag names travel through a comma-joined aggregate column on the read
//! path, so a comma can never be part of a name.

use super::ValidationError;

/// Maximum length for tag names
const MAX_TAG_LEN: usize = 64;

/// Separator used when storage aggregates a question's tags into one column
pub const TAG_SEPARATOR: char = ',';

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 64 characters
    /// - No commas, no control characters
    ///
    /// # Example
    /// ```
    /// use truthordare_core::models::TagName;
    ///
    /// assert!(TagName::new("18+").is_ok());
    /// assert!(TagName::new("a,b").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tag" });
        }

        if trimmed.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tag",
                max: MAX_TAG_LEN,
            });
        }

        if trimmed.contains(TAG_SEPARATOR) {
            return Err(ValidationError::InvalidFormat {
                field: "tag",
                reason: "must not contain commas",
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::InvalidFormat {
                field: "tag",
                reason: "must not contain control characters",
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

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split an aggregated tag column back into a sorted, deduplicated list.
///
/// `None` (a question without tags) yields an empty list.
pub fn split_tag_column(column: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = column
        .unwrap_or_default()
        .split(TAG_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}
