//! truthordare CLI - truth-or-dare question service
//!
//! Entry point for the `truthordare` command-line tool:
//! - `serve`: run the HTTP API and frontend
//! - `questions` / `tags`: query storage and print JSON
//! - `add` / `import`: write questions with their tags

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "truthordare",
    author,
    version,
    about = "Truth-or-dare question store with tag filtering",
    long_about = "Serve and manage truth-or-dare prompts tagged by language, type and \
                  free-form tags. Connection settings come from flags, the environment \
                  or a .env file."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server (and the frontend, if configured)
    Serve(commands::serve::ServeArgs),
    /// List questions matching language/type/tag filters as JSON
    Questions(commands::questions::QuestionsArgs),
    /// List every known tag as JSON
    Tags(commands::tags::TagsArgs),
    /// Add one question with its tags
    Add(commands::add::AddArgs),
    /// Import questions from a JSON file
    Import(commands::import::ImportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Questions(args) => commands::run_questions(args).await?,
        Commands::Tags(args) => commands::run_tags(args).await?,
        Commands::Add(args) => commands::run_add(args).await?,
        Commands::Import(args) => commands::run_import(args).await?,
    }

    Ok(())
}
