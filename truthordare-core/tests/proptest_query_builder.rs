use proptest::prelude::*;
use std::collections::BTreeSet;
use truthordare_core::models::QuestionType;
use truthordare_core::query::{find_questions_query, BindValue, Dialect, QueryCriteria, TagMatch};

// Every generated user value carries this marker so it can be spotted in SQL text.
const MARKER: &str = "\u{1F3B2}";

fn arb_dialect() -> impl Strategy<Value = Dialect> {
    prop_oneof![
        Just(Dialect::Postgres),
        Just(Dialect::MySql),
        Just(Dialect::Sqlite),
    ]
}

fn arb_user_text() -> impl Strategy<Value = String> {
    // Include quote, comment and placeholder characters on purpose.
    "[a-z0-9 '\"%?$;()-]{0,12}".prop_map(|s| format!("{MARKER}{s}"))
}

fn arb_criteria() -> impl Strategy<Value = QueryCriteria> {
    (
        prop::option::of(arb_user_text()),
        prop::option::of(prop_oneof![Just(QuestionType::Truth), Just(QuestionType::Dare)]),
        prop::collection::vec(arb_user_text(), 0..6),
        any::<bool>(),
    )
        .prop_map(|(language, kind, tags, all)| {
            let mode = if all { TagMatch::All } else { TagMatch::Any };
            QueryCriteria {
                language,
                kind,
                tags,
                match_mode: mode,
            }
        })
}

proptest! {
    /// Property: placeholders and arguments always line up
    #[test]
    fn prop_placeholders_match_arguments(criteria in arb_criteria(), dialect in arb_dialect()) {
        let built = find_questions_query(&criteria, dialect);
        prop_assert_eq!(built.placeholder_count(dialect), built.args.len());
    }

    /// Property: user-supplied values never reach the SQL text
    #[test]
    fn prop_user_values_are_bound_not_inlined(criteria in arb_criteria(), dialect in arb_dialect()) {
        let built = find_questions_query(&criteria, dialect);
        prop_assert!(!built.sql.contains(MARKER), "user text inlined: {}", built.sql);
    }

    /// Property: argument count follows the filters present
    #[test]
    fn prop_argument_count_follows_filters(criteria in arb_criteria(), dialect in arb_dialect()) {
        let built = find_questions_query(&criteria, dialect);

        let distinct_tags: BTreeSet<&String> = criteria.tags.iter().collect();
        let mut expected = criteria.language.iter().count() + criteria.kind.iter().count();
        expected += distinct_tags.len();
        if criteria.match_mode == TagMatch::All && !distinct_tags.is_empty() {
            expected += 1;
            prop_assert_eq!(
                built.args.last(),
                Some(&BindValue::Int(distinct_tags.len() as i64))
            );
        }
        prop_assert_eq!(built.args.len(), expected);
    }

    /// Property: the statement keeps its one-row-per-question shape
    #[test]
    fn prop_result_shape_is_stable(criteria in arb_criteria(), dialect in arb_dialect()) {
        let built = find_questions_query(&criteria, dialect);
        prop_assert!(built.sql.starts_with("SELECT q.id, q.language, q.type, q.task, "));
        prop_assert!(built.sql.ends_with(" GROUP BY q.id, q.language, q.type, q.task ORDER BY q.id"));
        prop_assert_eq!(built.sql.contains(" WHERE "), !built.args.is_empty());
    }

    /// Property: the builder is deterministic
    #[test]
    fn prop_same_criteria_same_statement(criteria in arb_criteria(), dialect in arb_dialect()) {
        prop_assert_eq!(
            find_questions_query(&criteria, dialect),
            find_questions_query(&criteria, dialect)
        );
    }
}

#[test]
fn test_empty_criteria_has_no_where_clause() {
    for dialect in [Dialect::Postgres, Dialect::MySql, Dialect::Sqlite] {
        let built = find_questions_query(&QueryCriteria::all(), dialect);
        assert!(built.args.is_empty());
        assert!(!built.sql.contains("WHERE"));
    }
}
