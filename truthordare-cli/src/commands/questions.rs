//! Query questions from the command line

use anyhow::{Context, Result};
use clap::Parser;
use truthordare_core::{QueryCriteria, QuestionStore};

use super::database::DatabaseArgs;

/// Arguments for the questions command
#[derive(Parser, Debug)]
pub struct QuestionsArgs {
    /// Language code filter (e.g. en)
    #[arg(long, short = 'l', default_value = "")]
    pub language: String,

    /// Question type filter (truth or dare)
    #[arg(long = "type", short = 't', default_value = "")]
    pub kind: String,

    /// Tag filter; repeat or comma-separate
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Require every tag instead of any
    #[arg(long)]
    pub match_all: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_questions(args: QuestionsArgs) -> Result<()> {
    let criteria = QueryCriteria::from_raw(
        &args.language,
        &args.kind,
        args.tags.as_slice(),
        args.match_all,
    )
    .context("Invalid filter")?;

    let repo = args.db.open().await?;
    let questions = repo
        .find_questions(&criteria)
        .await
        .context("Failed to fetch questions")?;

    tracing::debug!(count = questions.len(), "fetched questions");
    println!("{}", serde_json::to_string_pretty(&questions)?);
    Ok(())
}
