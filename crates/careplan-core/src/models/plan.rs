//! Normalized care-plan results.

use serde::{Deserialize, Serialize};

/// One row of the care-plan table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarePlanRow {
    /// Clinical issue / diagnosis label
    pub clinical_issue_diagnosis: String,
    /// Therapeutic objective bullets
    pub therapeutic_objective: Vec<String>,
    /// Management strategy bullets
    pub management_strategy: Vec<String>,
    /// Assessment of response / follow-up bullets
    pub assessment_of_response_follow_up: Vec<String>,
}

/// A treatment modality in a structured plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentModality {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Structured single-object care plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidelinePlan {
    pub diagnosis: String,
    pub workup: Vec<String>,
    pub treatment: Vec<TreatmentModality>,
    pub surveillance: Vec<String>,
    pub follow_up: Vec<String>,
}

/// Normalizer output. Serializes as a bare JSON array or object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NormalizedResult {
    Rows(Vec<CarePlanRow>),
    Plan(GuidelinePlan),
}

impl NormalizedResult {
    pub fn rows(&self) -> Option<&[CarePlanRow]> {
        match self {
            NormalizedResult::Rows(rows) => Some(rows),
            NormalizedResult::Plan(_) => None,
        }
    }

    pub fn plan(&self) -> Option<&GuidelinePlan> {
        match self {
            NormalizedResult::Rows(_) => None,
            NormalizedResult::Plan(plan) => Some(plan),
        }
    }
}
