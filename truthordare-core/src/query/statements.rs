//! Statement assembly
//!
//! [`SqlWriter`] appends fixed SQL fragments and numbers placeholders for the
//! target dialect as values are bound, so the argument list always lines up
//! with the placeholders in the text.

use super::criteria::QueryCriteria;
use super::dialect::Dialect;
use super::predicate::BindValue;

/// SQL text plus its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<BindValue>,
}

impl BuiltQuery {
    /// Number of placeholders in the SQL text.
    pub fn placeholder_count(&self, dialect: Dialect) -> usize {
        match dialect {
            Dialect::MySql | Dialect::Sqlite => self.sql.matches('?').count(),
            Dialect::Postgres => {
                let bytes = self.sql.as_bytes();
                bytes
                    .windows(2)
                    .filter(|w| w[0] == b'$' && w[1].is_ascii_digit())
                    .count()
            }
        }
    }
}

/// Incremental SQL builder with dialect-aware placeholders
#[derive(Debug)]
pub struct SqlWriter {
    dialect: Dialect,
    sql: String,
    args: Vec<BindValue>,
}

impl SqlWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            args: Vec::new(),
        }
    }

    /// Append a fixed SQL fragment. Never pass user input here.
    pub fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Append a placeholder and record its value.
    pub fn push_bind(&mut self, value: impl Into<BindValue>) {
        self.args.push(value.into());
        let placeholder = self.dialect.placeholder(self.args.len());
        self.sql.push_str(&placeholder);
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            args: self.args,
        }
    }
}

/// Read query for questions matching `criteria`.
///
/// One row per question (grouped by id) carrying the question's full tag set
/// as an aggregated column named `tags`; tag filters are applied through an
/// `IN (subquery)` so they never narrow that aggregate.
pub fn find_questions_query(criteria: &QueryCriteria, dialect: Dialect) -> BuiltQuery {
    let mut w = SqlWriter::new(dialect);
    w.push("SELECT q.id, q.language, q.type, q.task, ");
    w.push(&dialect.tag_aggregate("t.name"));
    w.push(
        " AS tags FROM questions q \
         LEFT JOIN question_tags qt ON qt.question_id = q.id \
         LEFT JOIN tags t ON t.id = qt.tag_id",
    );

    let predicate = criteria.predicate();
    if !predicate.is_true() {
        w.push(" WHERE ");
        predicate.render(&mut w);
    }

    w.push(" GROUP BY q.id, q.language, q.type, q.task ORDER BY q.id");
    w.finish()
}

/// Every tag name known to storage.
pub fn list_tags_query() -> &'static str {
    "SELECT name FROM tags ORDER BY name"
}

/// Insert a question row. Binds: language, type, task.
///
/// Returns the new id as a row where the dialect supports `RETURNING`.
pub fn insert_question_sql(dialect: Dialect) -> String {
    let mut sql = format!(
        "INSERT INTO questions (language, type, task) VALUES ({}, {}, {})",
        dialect.placeholder(1),
        dialect.placeholder(2),
        dialect.placeholder(3),
    );
    if dialect.supports_returning() {
        sql.push_str(" RETURNING id");
    }
    sql
}

/// Insert a tag unless the name already exists. Binds: name.
pub fn insert_tag_if_absent_sql(dialect: Dialect) -> String {
    format!(
        "INSERT INTO tags (name) VALUES ({}){}",
        dialect.placeholder(1),
        dialect.on_duplicate_ignore("name"),
    )
}

/// Look up a tag id by name. Binds: name.
pub fn select_tag_id_sql(dialect: Dialect) -> String {
    format!("SELECT id FROM tags WHERE name = {}", dialect.placeholder(1))
}

/// Link a question to a tag, ignoring an existing link. Binds: question id, tag id.
pub fn link_question_tag_sql(dialect: Dialect) -> String {
    format!(
        "INSERT INTO question_tags (question_id, tag_id) VALUES ({}, {}){}",
        dialect.placeholder(1),
        dialect.placeholder(2),
        dialect.on_duplicate_ignore("tag_id"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TagMatch;

    #[test]
    fn unfiltered_query_has_no_where() {
        let q = find_questions_query(&QueryCriteria::all(), Dialect::Sqlite);
        assert!(!q.sql.contains("WHERE"));
        assert!(q.sql.contains("group_concat(DISTINCT t.name) AS tags"));
        assert!(q.sql.ends_with("GROUP BY q.id, q.language, q.type, q.task ORDER BY q.id"));
        assert!(q.args.is_empty());
    }

    #[test]
    fn filtered_query_numbers_placeholders_in_order() {
        let criteria = QueryCriteria::all()
            .with_language("en")
            .with_tags(["18+", "alcohol"], TagMatch::All);
        let q = find_questions_query(&criteria, Dialect::Postgres);

        assert!(q.sql.contains("string_agg(DISTINCT t.name, ',') AS tags"));
        assert!(q.sql.contains("WHERE (q.language = $1 AND q.id IN ("));
        assert!(q.sql.contains("mt.name IN ($2, $3)"));
        assert!(q.sql.contains("HAVING COUNT(DISTINCT mt.name) = $4"));
        assert_eq!(
            q.args,
            vec![
                BindValue::from("en"),
                BindValue::from("18+"),
                BindValue::from("alcohol"),
                BindValue::Int(2),
            ]
        );
        assert_eq!(q.placeholder_count(Dialect::Postgres), q.args.len());
    }

    #[test]
    fn mysql_query_aggregates_as_text() {
        let criteria = QueryCriteria::all().with_tags(["party"], TagMatch::Any);
        let q = find_questions_query(&criteria, Dialect::MySql);

        assert!(q
            .sql
            .contains("CAST(GROUP_CONCAT(DISTINCT t.name SEPARATOR ',') AS CHAR) AS tags"));
        assert!(q.sql.contains("mt.name IN (?)"));
        assert_eq!(q.args, vec![BindValue::from("party")]);
        assert_eq!(q.placeholder_count(Dialect::MySql), 1);
    }

    #[test]
    fn all_mode_with_no_tags_equals_no_tag_filter() {
        let plain = find_questions_query(&QueryCriteria::all().with_language("en"), Dialect::MySql);
        let all_empty = find_questions_query(
            &QueryCriteria::all()
                .with_language("en")
                .with_tags(Vec::<String>::new(), TagMatch::All),
            Dialect::MySql,
        );
        assert_eq!(plain, all_empty);
    }

    #[test]
    fn write_statements_per_dialect() {
        assert_eq!(
            insert_question_sql(Dialect::Postgres),
            "INSERT INTO questions (language, type, task) VALUES ($1, $2, $3) RETURNING id"
        );
        assert_eq!(
            insert_question_sql(Dialect::MySql),
            "INSERT INTO questions (language, type, task) VALUES (?, ?, ?)"
        );
        assert_eq!(
            insert_tag_if_absent_sql(Dialect::Sqlite),
            "INSERT INTO tags (name) VALUES (?) ON CONFLICT DO NOTHING"
        );
        assert_eq!(
            insert_tag_if_absent_sql(Dialect::MySql),
            "INSERT INTO tags (name) VALUES (?) ON DUPLICATE KEY UPDATE name = name"
        );
        assert_eq!(
            link_question_tag_sql(Dialect::MySql),
            "INSERT INTO question_tags (question_id, tag_id) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE tag_id = tag_id"
        );
        assert_eq!(
            link_question_tag_sql(Dialect::Postgres),
            "INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        );
        assert_eq!(
            select_tag_id_sql(Dialect::Postgres),
            "SELECT id FROM tags WHERE name = $1"
        );
    }
}
