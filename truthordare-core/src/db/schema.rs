//! Table bootstrap
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` per dialect. There is no
//! versioning; an existing schema is left as it is.

use crate::query::Dialect;

use super::{RepoError, RepoResult, Storage};

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id BIGSERIAL PRIMARY KEY,
        language TEXT NOT NULL,
        type TEXT NOT NULL CHECK (type IN ('truth', 'dare')),
        task TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS question_tags (
        question_id BIGINT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (question_id, tag_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_questions_language_type ON questions (language, type)",
];

const MYSQL_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        language VARCHAR(16) NOT NULL,
        type VARCHAR(5) NOT NULL,
        task TEXT NOT NULL,
        CONSTRAINT chk_questions_type CHECK (type IN ('truth', 'dare')),
        KEY idx_questions_language_type (language, type)
    ) DEFAULT CHARSET = utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(64) NOT NULL,
        UNIQUE KEY uq_tags_name (name)
    ) DEFAULT CHARSET = utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS question_tags (
        question_id BIGINT NOT NULL,
        tag_id BIGINT NOT NULL,
        PRIMARY KEY (question_id, tag_id),
        FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE,
        FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
    ) DEFAULT CHARSET = utf8mb4
    "#,
];

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        language TEXT NOT NULL,
        type TEXT NOT NULL CHECK (type IN ('truth', 'dare')),
        task TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS question_tags (
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (question_id, tag_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_questions_language_type ON questions (language, type)",
];

/// DDL statements for `dialect`, in execution order.
pub fn schema_statements(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::Postgres => POSTGRES_SCHEMA,
        Dialect::MySql => MYSQL_SCHEMA,
        Dialect::Sqlite => SQLITE_SCHEMA,
    }
}

/// Create the questions/tags tables if they do not exist yet.
pub async fn ensure_schema(storage: &Storage) -> RepoResult<()> {
    tracing::info!(dialect = %storage.dialect(), "ensuring question schema");

    for statement in schema_statements(storage.dialect()) {
        sqlx::query(statement)
            .execute(storage.pool())
            .await
            .map_err(|e| RepoError::from_sqlx("ensure schema", e))?;
    }

    Ok(())
}
