//! Bulk import of questions from a JSON file
//!
//! The file holds an array of `{language, type, task, tags}` objects. Every
//! record is validated before anything is written; each question is then
//! stored in its own transaction and the import stops at the first failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use truthordare_core::{NewQuestion, QuestionStore};

use super::database::DatabaseArgs;

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// JSON file with an array of questions
    pub file: PathBuf,

    /// Validate the file without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// One question as written in the import file
#[derive(Debug, Deserialize)]
pub struct ImportRecord {
    pub language: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub task: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parse and validate every record in `path`.
pub fn load_questions(path: &Path) -> Result<Vec<NewQuestion>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<ImportRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            NewQuestion::new(&r.language, &r.kind, &r.task, r.tags.as_slice())
                .with_context(|| format!("Invalid question at index {i}"))
        })
        .collect()
}

pub async fn run_import(args: ImportArgs) -> Result<()> {
    let questions = load_questions(&args.file)?;
    tracing::info!(count = questions.len(), file = %args.file.display(), "loaded questions");

    if args.dry_run {
        println!("{} questions valid", questions.len());
        return Ok(());
    }

    let repo = args.db.open().await?;
    for (i, question) in questions.iter().enumerate() {
        repo.create_question(question)
            .await
            .with_context(|| format!("Failed to import question at index {i}; {i} already imported"))?;
    }

    println!("imported {} questions", questions.len());
    Ok(())
}
