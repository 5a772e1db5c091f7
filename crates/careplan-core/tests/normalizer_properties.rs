//! Property tests for the response normalizer.

use careplan_core::normalizer::{normalize, normalize_candidate};
use careplan_core::{CarePlanRow, NormalizedResult};
use careplan_llm::PlanSchema;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Bullet text that deliberately includes bracket and quote characters.
fn bullet() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.:;/+()\\[\\]{}'\"-]{0,40}"
}

/// A list-ish field as a model might emit it.
fn loose_list() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        bullet().prop_map(Value::String),
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        prop::collection::vec(bullet(), 0..4).prop_map(|v| json!(v)),
    ]
}

fn loose_row() -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            bullet().prop_map(Value::String),
            any::<i64>().prop_map(|n| json!(n)),
            Just(Value::Null)
        ],
        loose_list(),
        loose_list(),
        loose_list(),
        any::<bool>(),
    )
        .prop_map(|(label, objective, strategy, follow_up, with_extra)| {
            let mut row = json!({
                "clinical_issue_diagnosis": label,
                "therapeutic_objective": objective,
                "management_strategy": strategy,
                "assessment_of_response_follow_up": follow_up,
            });
            if with_extra {
                row["unexpected"] = json!({"nested": [1, 2]});
            }
            row
        })
}

fn loose_rows() -> impl Strategy<Value = Value> {
    prop::collection::vec(loose_row(), 1..5).prop_map(Value::Array)
}

/// Prose that never contains JSON-significant characters or fences.
fn prose() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.:!?\n-]{0,60}"
}

proptest! {
    #[test]
    fn direct_json_matches_parse_plus_defaults(rows in loose_rows()) {
        let text = serde_json::to_string(&rows).unwrap();
        let normalized = normalize(Some(&text), PlanSchema::Rows).unwrap();
        prop_assert_eq!(normalized.result, normalize_candidate(&rows, PlanSchema::Rows));
    }

    #[test]
    fn fenced_json_in_prose_matches_fenced_content(
        rows in loose_rows(),
        before in prose(),
        after in prose(),
        pretty in any::<bool>(),
    ) {
        let body = if pretty {
            serde_json::to_string_pretty(&rows).unwrap()
        } else {
            serde_json::to_string(&rows).unwrap()
        };
        let text = format!("{before}\n```json\n{body}\n```\n{after}");

        let fenced = normalize(Some(&text), PlanSchema::Rows).unwrap();
        let alone = normalize(Some(&body), PlanSchema::Rows).unwrap();
        prop_assert_eq!(fenced.result, alone.result);
    }

    #[test]
    fn unfenced_array_in_prose_keeps_span(
        rows in loose_rows(),
        before in prose(),
        after in prose(),
    ) {
        let body = serde_json::to_string(&rows).unwrap();
        let text = format!("{before} {body} {after}");

        let normalized = normalize(Some(&text), PlanSchema::Rows).unwrap();
        prop_assert_eq!(normalized.result, normalize_candidate(&rows, PlanSchema::Rows));
    }

    #[test]
    fn renormalizing_is_identity(rows in loose_rows()) {
        let first = normalize_candidate(&rows, PlanSchema::Rows);
        let second = normalize_candidate(&serde_json::to_value(&first).unwrap(), PlanSchema::Rows);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rows_are_never_empty_and_always_typed(rows in loose_rows()) {
        let text = serde_json::to_string(&rows).unwrap();
        let result = normalize(Some(&text), PlanSchema::Rows).unwrap().result;

        // Serialized shape: array of objects holding a string and three string lists.
        let json = serde_json::to_value(&result).unwrap();
        let array = json.as_array().unwrap();
        prop_assert!(!array.is_empty());
        for row in array {
            prop_assert!(row["clinical_issue_diagnosis"].is_string());
            for key in [
                "therapeutic_objective",
                "management_strategy",
                "assessment_of_response_follow_up",
            ] {
                let items = row[key].as_array().unwrap();
                prop_assert!(items.iter().all(Value::is_string));
            }
        }
    }

    #[test]
    fn bare_object_becomes_one_row(row in loose_row()) {
        let result = normalize_candidate(&row, PlanSchema::Rows);
        let wrapped = normalize_candidate(&Value::Array(vec![row]), PlanSchema::Rows);
        prop_assert_eq!(result.rows().map(<[CarePlanRow]>::len), Some(1));
        prop_assert_eq!(result, wrapped);
    }

    #[test]
    fn text_without_brackets_is_unrecoverable(text in prose()) {
        prop_assume!(!text.trim().is_empty());
        prop_assert!(normalize(Some(&text), PlanSchema::Rows).is_err());
    }
}

#[test]
fn plan_results_serialize_as_object() {
    let result = normalize(Some(r#"{"diagnosis":"x"}"#), PlanSchema::Plan)
        .unwrap()
        .result;
    assert!(matches!(result, NormalizedResult::Plan(_)));
    assert!(serde_json::to_value(&result).unwrap().is_object());
}
