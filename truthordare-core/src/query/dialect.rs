//! SQL dialect differences
//!
//! The repository talks to storage through sqlx's `Any` driver, which passes
//! SQL through untouched. Everything that differs between engines is decided
//! here.

use std::fmt;

/// Supported storage engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Detect the dialect from a connection URL scheme.
    ///
    /// Returns `None` for unknown schemes.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':')?.0.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Placeholder for the `index`-th bound argument (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::MySql | Self::Sqlite => "?".to_owned(),
        }
    }

    /// Aggregate of distinct tag names for one question, NULL when none.
    pub fn tag_aggregate(self, column: &str) -> String {
        match self {
            Self::Postgres => format!("string_agg(DISTINCT {column}, ',')"),
            Self::MySql => format!("CAST(GROUP_CONCAT(DISTINCT {column} SEPARATOR ',') AS CHAR)"),
            Self::Sqlite => format!("group_concat(DISTINCT {column})"),
        }
    }

    /// Whether `INSERT ... RETURNING id` is available.
    pub fn supports_returning(self) -> bool {
        !matches!(self, Self::MySql)
    }

    /// Clause that turns a duplicate-key insert into a no-op.
    ///
    /// `key_column` is only used on MySQL, which needs a column to assign;
    /// every other error still fails the statement.
    pub(crate) fn on_duplicate_ignore(self, key_column: &str) -> String {
        match self {
            Self::MySql => format!(" ON DUPLICATE KEY UPDATE {key_column} = {key_column}"),
            Self::Postgres | Self::Sqlite => " ON CONFLICT DO NOTHING".to_owned(),
        }
    }

    /// Statement run on every new connection, if the engine needs one.
    ///
    /// MySQL truncates `GROUP_CONCAT` at 1024 bytes by default.
    pub fn session_setup(self) -> Option<&'static str> {
        match self {
            Self::MySql => Some("SET SESSION group_concat_max_len = 1048576"),
            Self::Postgres | Self::Sqlite => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
