//! HTTP server command
//!
//! Connects to storage (retrying while the database comes up), makes sure the
//! tables exist and serves the API plus the optional frontend.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use truthordare_server::{run_server, ServerConfig};

use super::database::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory with the frontend (index.html and assets)
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(mut args: ServeArgs) -> Result<()> {
    // The server always owns its schema.
    args.db.ensure_schema = true;
    let repo = args.db.open().await?;
    let storage = repo.storage().clone();

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        cors_permissive: args.cors_permissive,
        static_dir: args.static_dir,
    };
    tracing::info!("Starting truthordare server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    let result = run_server(Arc::new(repo), config).await;
    storage.close().await;
    result.context("Server error")?;

    Ok(())
}
