//! Read-path filter criteria

use crate::models::{QuestionType, TagName, ValidationError};

use super::predicate::{Column, Predicate, TagFilter, TagMatch};

/// Filters for listing questions
///
/// Absent or empty filters impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCriteria {
    pub language: Option<String>,
    pub kind: Option<QuestionType>,
    pub tags: Vec<String>,
    pub match_mode: TagMatch,
}

impl QueryCriteria {
    /// Criteria matching every question.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build criteria from raw request values where an empty string means
    /// "no filter".
    ///
    /// The language is an exact-match value: any trimmed string is accepted
    /// and one that no question carries simply matches nothing. Blank tag
    /// entries are ignored; the remaining ones must be valid tag names. A
    /// non-empty `kind` must be `truth` or `dare`.
    pub fn from_raw<S: AsRef<str>>(
        language: &str,
        kind: &str,
        tags: &[S],
        match_all: bool,
    ) -> Result<Self, ValidationError> {
        let language = match language.trim() {
            "" => None,
            code => Some(code.to_owned()),
        };

        let kind = match kind.trim() {
            "" => None,
            k => Some(k.parse::<QuestionType>()?),
        };

        let mut names = Vec::with_capacity(tags.len());
        for raw in tags {
            if raw.as_ref().trim().is_empty() {
                continue;
            }
            names.push(TagName::new(raw.as_ref())?.into_string());
        }

        Ok(Self {
            language,
            kind,
            tags: names,
            match_mode: if match_all { TagMatch::All } else { TagMatch::Any },
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_kind(mut self, kind: QuestionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I, mode: TagMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self.match_mode = mode;
        self
    }

    /// The conjunction of every present filter.
    pub fn predicate(&self) -> Predicate {
        let language = self
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| Predicate::eq(Column::Language, l));
        let kind = self.kind.map(|k| Predicate::eq(Column::Type, k.as_str()));
        let tags = Predicate::tags(TagFilter::new(self.tags.iter().cloned(), self.match_mode));

        Predicate::and(language.into_iter().chain(kind).chain(std::iter::once(tags)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_is_true() {
        assert!(QueryCriteria::all().predicate().is_true());
        let c = QueryCriteria::from_raw("", "", &["", "  "], true).unwrap();
        assert!(c.predicate().is_true());
        assert!(c.tags.is_empty());
    }

    #[test]
    fn from_raw_parses_filters() {
        let c = QueryCriteria::from_raw("en", "dare", &["18+", "alcohol"], true).unwrap();
        assert_eq!(c.language.as_deref(), Some("en"));
        assert_eq!(c.kind, Some(QuestionType::Dare));
        assert_eq!(c.tags, vec!["18+".to_string(), "alcohol".to_string()]);
        assert_eq!(c.match_mode, TagMatch::All);
    }

    #[test]
    fn from_raw_rejects_unknown_type() {
        let err = QueryCriteria::from_raw("en", "joke", &[] as &[&str], false).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "type", .. }));
    }

    #[test]
    fn from_raw_keeps_unusual_language_as_exact_value() {
        let long = "x".repeat(40);
        let c = QueryCriteria::from_raw(&long, "", &[] as &[&str], false).unwrap();
        assert_eq!(c.language.as_deref(), Some(long.as_str()));

        let c = QueryCriteria::from_raw(" en US ", "", &[] as &[&str], false).unwrap();
        assert_eq!(c.predicate(), Predicate::eq(Column::Language, "en US"));
    }

    #[test]
    fn predicate_orders_language_type_tags() {
        let c = QueryCriteria::all()
            .with_language("en")
            .with_kind(QuestionType::Truth)
            .with_tags(["deep"], TagMatch::Any);
        match c.predicate() {
            Predicate::And(members) => {
                assert_eq!(members.len(), 3);
                assert_eq!(members[0], Predicate::eq(Column::Language, "en"));
                assert_eq!(members[1], Predicate::eq(Column::Type, "truth"));
                assert!(matches!(members[2], Predicate::Tags(_)));
            }
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn single_filter_is_not_wrapped() {
        let c = QueryCriteria::all().with_language("de");
        assert_eq!(c.predicate(), Predicate::eq(Column::Language, "de"));
    }
}
