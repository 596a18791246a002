//! Print every known tag

use anyhow::{Context, Result};
use clap::Parser;
use truthordare_core::QuestionStore;

use super::database::DatabaseArgs;

/// Arguments for the tags command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_tags(args: TagsArgs) -> Result<()> {
    let repo = args.db.open().await?;
    let tags = repo.list_tags().await.context("Failed to list tags")?;
    println!("{}", serde_json::to_string_pretty(&tags)?);
    Ok(())
}
