//! Composable filter predicates
//!
//! A predicate only ever names columns from the fixed [`Column`] set and
//! carries its values as [`BindValue`]s, so rendering cannot inject user text
//! into SQL.

use serde::{Deserialize, Serialize};

use super::statements::SqlWriter;

/// A value bound to a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Question columns a predicate may compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Language,
    Type,
}

impl Column {
    pub fn qualified(self) -> &'static str {
        match self {
            Self::Language => "q.language",
            Self::Type => "q.type",
        }
    }
}

/// How a tag set restricts questions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// Linked to at least one of the tags
    #[default]
    Any,
    /// Linked to every one of the tags
    All,
}

/// Tag names plus match mode
///
/// Names are deduplicated (first occurrence wins) so that the ALL-mode count
/// compares against the number of distinct requested tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    names: Vec<String>,
    mode: TagMatch,
}

impl TagFilter {
    pub fn new<I, S>(names: I, mode: TagMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self {
            names: unique,
            mode,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn render(&self, w: &mut SqlWriter) {
        w.push(
            "q.id IN (SELECT mqt.question_id FROM question_tags mqt \
             INNER JOIN tags mt ON mt.id = mqt.tag_id WHERE mt.name IN (",
        );
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_bind(name.as_str());
        }
        w.push(")");

        if self.mode == TagMatch::All {
            w.push(" GROUP BY mqt.question_id HAVING COUNT(DISTINCT mt.name) = ");
            w.push_bind(self.names.len() as i64);
        }
        w.push(")");
    }
}

/// Filter over questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every question
    True,
    /// Exact column match
    Eq { column: Column, value: BindValue },
    /// Tag membership (ANY/ALL)
    Tags(TagFilter),
    /// All members must hold; empty is true
    And(Vec<Predicate>),
    /// At least one member must hold; empty is false
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<BindValue>) -> Self {
        Self::Eq {
            column,
            value: value.into(),
        }
    }

    /// Tag membership; an empty filter imposes no constraint.
    pub fn tags(filter: TagFilter) -> Self {
        if filter.is_empty() {
            Self::True
        } else {
            Self::Tags(filter)
        }
    }

    /// Conjunction, flattening nested `And` and dropping `True` members.
    pub fn and<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::True => {}
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::True,
            1 => flat.remove(0),
            _ => Self::And(flat),
        }
    }

    /// Disjunction, flattening nested `Or`. Any `True` member makes it `True`.
    pub fn or<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::True => return Self::True,
                Self::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Or(flat)
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Render into `w`, binding every value in placeholder order.
    pub fn render(&self, w: &mut SqlWriter) {
        match self {
            Self::True => w.push("1 = 1"),
            Self::Eq { column, value } => {
                w.push(column.qualified());
                w.push(" = ");
                w.push_bind(value.clone());
            }
            Self::Tags(filter) => filter.render(w),
            Self::And(members) => render_joined(w, members, " AND ", "1 = 1"),
            Self::Or(members) => render_joined(w, members, " OR ", "1 = 0"),
        }
    }
}

fn render_joined(w: &mut SqlWriter, members: &[Predicate], op: &str, empty: &str) {
    if members.is_empty() {
        w.push(empty);
        return;
    }
    w.push("(");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            w.push(op);
        }
        member.render(w);
    }
    w.push(")");
}
