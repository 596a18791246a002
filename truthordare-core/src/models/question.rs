//! Question records and the validated write payload

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{LanguageCode, TagName, TaskText, ValidationError};

/// Maximum number of distinct tags on one question
pub const MAX_TAGS_PER_QUESTION: usize = 32;

/// Question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Truth,
    Dare,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truth => "truth",
            Self::Dare => "dare",
        }
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truth" => Ok(Self::Truth),
            "dare" => Ok(Self::Dare),
            other => Err(ValidationError::InvalidVariant {
                field: "type",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question as read back from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub language: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub task: String,
    /// Full tag set of the question, sorted. Empty when untagged.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Question {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Validated payload for creating a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub language: LanguageCode,
    pub kind: QuestionType,
    pub task: TaskText,
    /// Deduplicated, in first-seen order
    pub tags: Vec<TagName>,
}

impl NewQuestion {
    /// Validate raw input into a question ready for storage.
    ///
    /// Duplicate tag names collapse to their first occurrence; at most
    /// [`MAX_TAGS_PER_QUESTION`] distinct tags remain.
    ///
    /// # Example
    /// ```
    /// use truthordare_core::models::NewQuestion;
    ///
    /// let q = NewQuestion::new("en", "truth", "Ever lied?", &["deep", "deep"]).unwrap();
    /// assert_eq!(q.tags.len(), 1);
    /// assert!(NewQuestion::new("en", "joke", "Ever lied?", &[] as &[&str]).is_err());
    /// ```
    pub fn new<S: AsRef<str>>(
        language: &str,
        kind: &str,
        task: &str,
        tags: &[S],
    ) -> Result<Self, ValidationError> {
        let language = LanguageCode::new(language)?;
        let kind = kind.trim().parse::<QuestionType>()?;
        let task = TaskText::new(task)?;

        let mut unique: Vec<TagName> = Vec::with_capacity(tags.len());
        for raw in tags {
            let tag = TagName::new(raw.as_ref())?;
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        if unique.len() > MAX_TAGS_PER_QUESTION {
            return Err(ValidationError::TooMany {
                field: "tags",
                max: MAX_TAGS_PER_QUESTION,
            });
        }

        Ok(Self {
            language,
            kind,
            task,
            tags: unique,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_types() {
        assert_eq!("truth".parse::<QuestionType>().unwrap(), QuestionType::Truth);
        assert_eq!("dare".parse::<QuestionType>().unwrap(), QuestionType::Dare);
        let err = "Truth".parse::<QuestionType>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "type", .. }));
    }

    #[test]
    fn serializes_with_type_field() {
        let q = Question {
            id: 7,
            language: "en".into(),
            kind: QuestionType::Dare,
            task: "Sing".into(),
            tags: vec![],
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "dare");
        assert_eq!(value["tags"], serde_json::json!([]));
    }

    #[test]
    fn new_question_dedups_tags_in_order() {
        let q = NewQuestion::new("en", "dare", "Dance", &["b", "a", "b", " a "]).unwrap();
        let names: Vec<&str> = q.tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn new_question_caps_distinct_tags() {
        let at_limit: Vec<String> = (0..MAX_TAGS_PER_QUESTION).map(|i| format!("tag-{i}")).collect();
        assert_eq!(
            NewQuestion::new("en", "truth", "Many", at_limit.as_slice()).unwrap().tags.len(),
            MAX_TAGS_PER_QUESTION
        );

        let mut over = at_limit.clone();
        over.push("one-more".into());
        assert!(matches!(
            NewQuestion::new("en", "truth", "Many", over.as_slice()),
            Err(ValidationError::TooMany { field: "tags", max: MAX_TAGS_PER_QUESTION })
        ));

        // Duplicates do not count toward the limit.
        let mut repeated = at_limit;
        repeated.push("tag-0".into());
        assert!(NewQuestion::new("en", "truth", "Many", repeated.as_slice()).is_ok());
    }

    #[test]
    fn new_question_rejects_bad_fields() {
        assert!(matches!(
            NewQuestion::new("", "dare", "Dance", &[] as &[&str]),
            Err(ValidationError::Empty { field: "language" })
        ));
        assert!(matches!(
            NewQuestion::new("en", "dare", "  ", &[] as &[&str]),
            Err(ValidationError::Empty { field: "task" })
        ));
        assert!(matches!(
            NewQuestion::new("en", "dare", "Dance", &["x,y"]),
            Err(ValidationError::InvalidFormat { field: "tag", .. })
        ));
    }
}
