//! Add a single question

use anyhow::{Context, Result};
use clap::Parser;
use truthordare_core::{NewQuestion, QuestionStore};

use super::database::DatabaseArgs;

/// Arguments for the add command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Question type (truth or dare)
    #[arg(long = "type", short = 't')]
    pub kind: String,

    /// Language code
    #[arg(long, short = 'l', default_value = "en")]
    pub language: String,

    /// Tags to attach; repeat or comma-separate
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// The prompt text
    pub task: String,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_add(args: AddArgs) -> Result<()> {
    let question = NewQuestion::new(&args.language, &args.kind, &args.task, args.tags.as_slice())
        .context("Invalid question")?;

    let repo = args.db.open().await?;
    let id = repo
        .create_question(&question)
        .await
        .context("Failed to add question")?;

    println!("{id}");
    Ok(())
}
