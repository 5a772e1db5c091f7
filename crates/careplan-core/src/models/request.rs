//! Incoming care-plan request.

use careplan_llm::PromptContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request validation errors. Raised before any model call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Either cancerType or diagnosis is required")]
    MissingDiagnosis,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Body of `POST /api/guidelines`.
///
/// `diagnosis` is the older single-field form; it stands in for
/// `cancer_type` when that is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuidelineRequest {
    #[serde(default)]
    pub cancer_type: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub setting: Option<String>,
    #[serde(default)]
    pub guideline_basis: Option<String>,
    #[serde(default)]
    pub clinical_context_notes: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
}

impl GuidelineRequest {
    /// Trim every field, dropping blank ones, and require a diagnosis.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let request = Self {
            cancer_type: clean(self.cancer_type),
            stage: clean(self.stage),
            subtype: clean(self.subtype),
            setting: clean(self.setting),
            guideline_basis: clean(self.guideline_basis),
            clinical_context_notes: clean(self.clinical_context_notes),
            diagnosis: clean(self.diagnosis),
        };

        if request.primary_diagnosis().is_none() {
            return Err(ValidationError::MissingDiagnosis);
        }
        Ok(request)
    }

    /// Cancer type, falling back to the legacy diagnosis field.
    pub fn primary_diagnosis(&self) -> Option<&str> {
        self.cancer_type.as_deref().or(self.diagnosis.as_deref())
    }

    pub fn prompt_context(&self) -> PromptContext<'_> {
        PromptContext {
            cancer_type: self.primary_diagnosis(),
            stage: self.stage.as_deref(),
            subtype: self.subtype.as_deref(),
            setting: self.setting.as_deref(),
            guideline_basis: self.guideline_basis.as_deref(),
            clinical_context_notes: self.clinical_context_notes.as_deref(),
        }
    }
}

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
