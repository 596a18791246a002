//! Question repository
//!
//! - find: one grouped query built from typed predicates
//! - create: question + tags in one transaction, tag upsert via
//!   insert-if-absent so concurrent writers never trip the unique key
//! - every call bounded by a deadline

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Row, Transaction};
use tracing::{debug, info, instrument, warn};

use crate::models::tag::split_tag_column;
use crate::models::{NewQuestion, Question, QuestionType, TagName};
use crate::query::statements::{
    insert_question_sql, insert_tag_if_absent_sql, link_question_tag_sql, list_tags_query,
    select_tag_id_sql,
};
use crate::query::{find_questions_query, BindValue, Dialect, QueryCriteria};

use super::{RepoError, RepoResult, Storage};

/// Default per-call deadline
const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Read and write entry points over question storage
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Questions matching `criteria`, each exactly once with its full tag set.
    async fn find_questions(&self, criteria: &QueryCriteria) -> RepoResult<Vec<Question>>;

    /// Every tag name known to storage.
    async fn list_tags(&self) -> RepoResult<Vec<String>>;

    /// Persist a question and its tags atomically, returning the new id.
    async fn create_question(&self, question: &NewQuestion) -> RepoResult<i64>;
}

/// SQL-backed question repository
#[derive(Debug, Clone)]
pub struct SqlQuestionRepo {
    storage: Storage,
    deadline: Duration,
}

impl SqlQuestionRepo {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Bound every storage call by `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

#[async_trait]
impl QuestionStore for SqlQuestionRepo {
    async fn find_questions(&self, criteria: &QueryCriteria) -> RepoResult<Vec<Question>> {
        let built = find_questions_query(criteria, self.storage.dialect());
        debug!(sql = %built.sql, args = built.args.len(), "finding questions");

        let rows = with_deadline(self.deadline, "find questions", async {
            bind_all(sqlx::query(&built.sql), &built.args)
                .fetch_all(self.storage.pool())
                .await
                .map_err(|e| RepoError::from_sqlx("find questions", e))
        })
        .await?;

        let questions = rows
            .iter()
            .map(question_from_row)
            .collect::<RepoResult<Vec<_>>>()?;
        debug!(count = questions.len(), "found questions");
        Ok(questions)
    }

    async fn list_tags(&self) -> RepoResult<Vec<String>> {
        let rows = with_deadline(self.deadline, "list tags", async {
            sqlx::query(list_tags_query())
                .fetch_all(self.storage.pool())
                .await
                .map_err(|e| RepoError::from_sqlx("list tags", e))
        })
        .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("name")
                    .map_err(|e| RepoError::Mapping {
                        context: "tag row",
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    async fn create_question(&self, question: &NewQuestion) -> RepoResult<i64> {
        let id = with_deadline(
            self.deadline,
            "create question",
            create_in_transaction(&self.storage, question),
        )
        .await?;

        info!(
            question_id = id,
            language = question.language.as_str(),
            kind = %question.kind,
            tags = question.tags.len(),
            "created question"
        );
        Ok(id)
    }
}

/// Run `fut`, failing with [`RepoError::Timeout`] if it outlives `deadline`.
///
/// On timeout the future is dropped, which cancels the in-flight storage call
/// and rolls back any transaction it held.
pub async fn with_deadline<T, F>(deadline: Duration, operation: &'static str, fut: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, deadline_ms = deadline.as_millis() as u64, "storage call exceeded deadline");
            Err(RepoError::Timeout {
                operation,
                after: deadline,
            })
        }
    }
}

/// Begin, write, then commit, rolling back explicitly when any step fails.
async fn create_in_transaction(storage: &Storage, question: &NewQuestion) -> RepoResult<i64> {
    let mut tx = storage.pool().begin().await.map_err(step_error("begin"))?;

    match write_question(&mut tx, storage.dialect(), question).await {
        Ok(id) => {
            tx.commit().await.map_err(step_error("commit"))?;
            Ok(id)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback after failed write also failed");
            }
            Err(err)
        }
    }
}

#[instrument(skip_all, fields(dialect = %dialect, tags = question.tags.len()))]
async fn write_question(
    tx: &mut Transaction<'_, Any>,
    dialect: Dialect,
    question: &NewQuestion,
) -> RepoResult<i64> {
    let insert = insert_question_sql(dialect);
    let query = sqlx::query(&insert)
        .bind(question.language.as_str())
        .bind(question.kind.as_str())
        .bind(question.task.as_str());

    let question_id: i64 = if dialect.supports_returning() {
        let row = query
            .fetch_one(&mut **tx)
            .await
            .map_err(step_error("insert question"))?;
        row.try_get("id").map_err(step_error("insert question"))?
    } else {
        query
            .execute(&mut **tx)
            .await
            .map_err(step_error("insert question"))?
            .last_insert_id()
            .ok_or_else(|| RepoError::Transaction {
                step: "insert question",
                source: sqlx::Error::Protocol("no generated id returned".into()),
            })?
    };

    let insert_tag = insert_tag_if_absent_sql(dialect);
    let select_tag = select_tag_id_sql(dialect);
    let link = link_question_tag_sql(dialect);

    for tag in upsert_order(&question.tags) {
        sqlx::query(&insert_tag)
            .bind(tag.as_str())
            .execute(&mut **tx)
            .await
            .map_err(step_error("insert tag"))?;

        let tag_id: i64 = sqlx::query_scalar(&select_tag)
            .bind(tag.as_str())
            .fetch_one(&mut **tx)
            .await
            .map_err(step_error("look up tag"))?;

        sqlx::query(&link)
            .bind(question_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await
            .map_err(step_error("link tag"))?;
    }

    Ok(question_id)
}

/// Tags in name order.
///
/// Every writer takes the tag unique-key locks in the same order, so two
/// transactions adding overlapping new tags queue instead of deadlocking.
fn upsert_order(tags: &[TagName]) -> Vec<&TagName> {
    let mut ordered: Vec<&TagName> = tags.iter().collect();
    ordered.sort();
    ordered
}

fn step_error(step: &'static str) -> impl Fn(sqlx::Error) -> RepoError {
    move |source| RepoError::Transaction { step, source }
}

fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    args: &'q [BindValue],
) -> Query<'q, Any, AnyArguments<'q>> {
    for arg in args {
        query = match arg {
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Int(n) => query.bind(*n),
        };
    }
    query
}

fn question_from_row(row: &AnyRow) -> RepoResult<Question> {
    let decode = |e: sqlx::Error| RepoError::Mapping {
        context: "question row",
        reason: e.to_string(),
    };

    let kind: String = row.try_get("type").map_err(decode)?;
    let kind = kind
        .parse::<QuestionType>()
        .map_err(|e| RepoError::Mapping {
            context: "question row",
            reason: e.to_string(),
        })?;
    let tags: Option<String> = row.try_get("tags").map_err(decode)?;

    Ok(Question {
        id: row.try_get("id").map_err(decode)?,
        language: row.try_get("language").map_err(decode)?,
        kind,
        task: row.try_get("task").map_err(decode)?,
        tags: split_tag_column(tags.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_written_in_name_order() {
        let forward = NewQuestion::new("en", "dare", "x", &["race-a", "race-b", "alcohol"]).unwrap();
        let reverse = NewQuestion::new("en", "dare", "x", &["race-b", "alcohol", "race-a"]).unwrap();

        let names = |q: &NewQuestion| -> Vec<String> {
            upsert_order(&q.tags).iter().map(|t| t.as_str().to_owned()).collect()
        };
        assert_eq!(names(&forward), vec!["alcohol", "race-a", "race-b"]);
        assert_eq!(names(&forward), names(&reverse));
    }

    #[tokio::test]
    async fn deadline_passes_through_results() {
        let ok = with_deadline(Duration::from_secs(1), "noop", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cancels_stuck_calls() {
        let err = with_deadline(
            Duration::from_millis(50),
            "find questions",
            std::future::pending::<RepoResult<()>>(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Timeout {
                operation: "find questions",
                ..
            }
        ));
    }
}
