//! Response normalizer.
//!
//! Pipeline: raw model text → JSON recovery (`careplan_llm::extract_json`)
//! → field-table normalization → [`NormalizedResult`]
//!
//! Pure and synchronous; safe to call from any number of requests at once.

mod fields;

pub use fields::*;

use careplan_llm::{extract_json, ExtractionResult, PlanSchema, Strategy};
use serde_json::{Map, Value};

use crate::models::{CarePlanRow, GuidelinePlan, NormalizedResult, TreatmentModality};

/// A normalized result plus the strategy that recovered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub result: NormalizedResult,
    pub strategy: Strategy,
}

/// Recover and normalize a model reply.
///
/// Fails only when there is no text or nothing parseable in it;
/// normalization itself is total.
pub fn normalize(raw: Option<&str>, schema: PlanSchema) -> ExtractionResult<Normalized> {
    let extracted = extract_json(raw)?;
    Ok(Normalized {
        result: normalize_candidate(&extracted.value, schema),
        strategy: extracted.strategy,
    })
}

/// Normalize an already-parsed value.
///
/// Row schema: a bare object becomes a one-element list and non-object
/// array elements are skipped. Plan schema: an array contributes its first
/// object. Values holding no object at all give an empty row list or a
/// default plan.
pub fn normalize_candidate(value: &Value, schema: PlanSchema) -> NormalizedResult {
    match schema {
        PlanSchema::Rows => NormalizedResult::Rows(
            objects(value)
                .map(|object| row_from_record(normalize_record(object, CARE_PLAN_ROW_FIELDS)))
                .collect(),
        ),
        PlanSchema::Plan => NormalizedResult::Plan(
            objects(value)
                .next()
                .map(|object| plan_from_record(normalize_record(object, GUIDELINE_PLAN_FIELDS)))
                .unwrap_or_default(),
        ),
    }
}

/// The objects a candidate holds: itself, or its object elements.
fn objects(value: &Value) -> Box<dyn Iterator<Item = &Map<String, Value>> + '_> {
    match value {
        Value::Object(object) => Box::new(std::iter::once(object)),
        Value::Array(items) => Box::new(items.iter().filter_map(Value::as_object)),
        _ => Box::new(std::iter::empty()),
    }
}

fn row_from_record(mut record: Record) -> CarePlanRow {
    CarePlanRow {
        clinical_issue_diagnosis: record.take_text("clinical_issue_diagnosis"),
        therapeutic_objective: record.take_text_list("therapeutic_objective"),
        management_strategy: record.take_text_list("management_strategy"),
        assessment_of_response_follow_up: record
            .take_text_list("assessment_of_response_follow_up"),
    }
}

fn plan_from_record(mut record: Record) -> GuidelinePlan {
    GuidelinePlan {
        diagnosis: record.take_text("diagnosis"),
        workup: record.take_text_list("workup"),
        treatment: record
            .take_record_list("treatment")
            .into_iter()
            .map(treatment_from_record)
            .collect(),
        surveillance: record.take_text_list("surveillance"),
        follow_up: record.take_text_list("follow_up"),
    }
}

fn treatment_from_record(mut record: Record) -> TreatmentModality {
    TreatmentModality {
        name: record.take_text("name"),
        details: record.take_optional_text("details"),
    }
}
