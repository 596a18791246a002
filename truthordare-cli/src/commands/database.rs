//! Database connection flags shared by every command

use anyhow::{Context, Result};
use clap::Args;
use truthordare_core::{connect, ensure_schema, DatabaseConfig, SqlQuestionRepo};

/// Connection arguments
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (postgres://, mysql://, sqlite:); falls back to MYSQL_* variables
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Create missing tables before running
    #[arg(long)]
    pub ensure_schema: bool,
}

impl DatabaseArgs {
    /// Resolve configuration from flags first, then the environment.
    pub fn config(&self) -> Result<DatabaseConfig> {
        let url = self.database_url.clone();
        DatabaseConfig::from_lookup(|key| match key {
            "DATABASE_URL" => url.clone(),
            _ => std::env::var(key).ok(),
        })
        .context("Invalid database configuration")
    }

    /// Connect (with startup retry) and build the repository.
    pub async fn open(&self) -> Result<SqlQuestionRepo> {
        let config = self.config()?;
        let storage = connect(&config)
            .await
            .with_context(|| format!("Failed to connect to {}", config.redacted_url()))?;

        if self.ensure_schema {
            ensure_schema(&storage)
                .await
                .context("Failed to create schema")?;
        }

        Ok(SqlQuestionRepo::new(storage).with_deadline(config.query_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_url_wins() {
        let args = DatabaseArgs {
            database_url: Some("sqlite::memory:".into()),
            ensure_schema: false,
        };
        let config = args.config().unwrap();
        assert_eq!(config.url, "sqlite::memory:");
    }
}
