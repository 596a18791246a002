//! Storage handle and connection bootstrap
//!
//! Uses sqlx `AnyPool` so the same repository code runs against Postgres,
//! MySQL or SQLite; the [`Dialect`] travels with the pool.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::{error, info, warn};

use crate::config::{ConfigError, DatabaseConfig};
use crate::query::Dialect;

use super::{RepoError, RepoResult};

/// Owned, cloneable handle to the question database
#[derive(Debug, Clone)]
pub struct Storage {
    pool: AnyPool,
    dialect: Dialect,
}

impl Storage {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Close every pooled connection, waiting for checked-out ones.
    pub async fn close(&self) {
        self.pool.close().await;
        info!(dialect = %self.dialect, "database pool closed");
    }
}

/// Connect to storage, retrying up to `config.connect_attempts` times.
///
/// Invalid configuration fails immediately; anything else is retried after
/// `config.retry_delay` and reported as [`RepoError::Connection`] once the
/// attempts run out.
pub async fn connect(config: &DatabaseConfig) -> RepoResult<Storage> {
    let dialect = config.dialect()?;
    sqlx::any::install_default_drivers();

    let max_attempts = config.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        match open_pool(config, dialect).await {
            Ok(pool) => {
                info!(%dialect, attempt, url = %config.redacted_url(), "connected to database");
                return Ok(Storage::new(pool, dialect));
            }
            Err(sqlx::Error::Configuration(err)) => {
                return Err(RepoError::Configuration(ConfigError::Invalid {
                    key: "DATABASE_URL",
                    value: err.to_string(),
                }));
            }
            Err(err) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "failed to connect to database, retrying in {:?}",
                    config.retry_delay
                );
                tokio::time::sleep(config.retry_delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!(attempts = max_attempts, error = %err, "giving up connecting to database");
                return Err(RepoError::Connection(err));
            }
        }
    }
}

async fn open_pool(config: &DatabaseConfig, dialect: Dialect) -> Result<AnyPool, sqlx::Error> {
    let mut options = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.query_timeout);

    // An in-memory SQLite database lives and dies with its single connection.
    if dialect == Dialect::Sqlite && config.url.contains(":memory:") {
        options = options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    if let Some(statement) = dialect.session_setup() {
        options = options.after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query(statement).execute(&mut *conn).await?;
                Ok(())
            })
        });
    }

    options.connect(&config.url).await
}
