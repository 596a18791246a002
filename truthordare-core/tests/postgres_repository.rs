//! Repository round trip against a live Postgres.
//!
//! Needs `DATABASE_URL` pointing at a disposable database:
//! `cargo test -p truthordare-core --test postgres_repository -- --ignored`

use truthordare_core::db::{connect, ensure_schema, QuestionStore, SqlQuestionRepo};
use truthordare_core::models::NewQuestion;
use truthordare_core::query::{Dialect, QueryCriteria, TagMatch};
use truthordare_core::DatabaseConfig;

async fn live_repo() -> SqlQuestionRepo {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let storage = connect(&DatabaseConfig::new(url)).await.expect("connect");
    assert_eq!(storage.dialect(), Dialect::Postgres);
    ensure_schema(&storage).await.expect("schema");
    SqlQuestionRepo::new(storage)
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_any_and_all_against_postgres() {
    let repo = live_repo().await;
    // Unique tags keep the test independent of existing rows.
    let suffix = std::process::id();
    let adult = format!("18+-{suffix}");
    let alcohol = format!("alcohol-{suffix}");

    let q1 = NewQuestion::new("en", "truth", "Q1", &[adult.as_str()]).unwrap();
    let q2 = NewQuestion::new("en", "dare", "Q2", &[adult.as_str(), alcohol.as_str()]).unwrap();
    let id1 = repo.create_question(&q1).await.unwrap();
    let id2 = repo.create_question(&q2).await.unwrap();

    let any = repo
        .find_questions(
            &QueryCriteria::all()
                .with_language("en")
                .with_tags([adult.clone(), alcohol.clone()], TagMatch::Any),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = any.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![id1, id2]);

    let all = repo
        .find_questions(
            &QueryCriteria::all()
                .with_language("en")
                .with_tags([adult.clone(), alcohol.clone()], TagMatch::All),
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id2);
    assert!(all[0].has_tag(&adult) && all[0].has_tag(&alcohol));

    let tags = repo.list_tags().await.unwrap();
    assert!(tags.contains(&adult));
    assert!(tags.contains(&alcohol));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires database"]
async fn test_opposite_tag_orders_do_not_deadlock() {
    let repo = live_repo().await;
    let suffix = std::process::id();
    let first = format!("race-a-{suffix}");
    let second = format!("race-b-{suffix}");

    let mut writers = tokio::task::JoinSet::new();
    for i in 0..16 {
        let tags = if i % 2 == 0 {
            [first.clone(), second.clone()]
        } else {
            [second.clone(), first.clone()]
        };
        let question = NewQuestion::new("en", "truth", &format!("race {i}"), tags.as_slice()).unwrap();
        let repo = repo.clone();
        writers.spawn(async move { repo.create_question(&question).await });
    }

    let mut failures = Vec::new();
    while let Some(joined) = writers.join_next().await {
        if let Err(e) = joined.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "writers failed: {failures:?}");

    let both = repo
        .find_questions(&QueryCriteria::all().with_tags([first, second], TagMatch::All))
        .await
        .unwrap();
    assert_eq!(both.len(), 16);
}
