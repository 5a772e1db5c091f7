//! Care-plan prompts for the chat-completion model.
//!
//! Both prompts ask for bare JSON. The model does not always comply, which
//! is why responses go through [`crate::extraction`] before use.

use serde::{Deserialize, Serialize};

/// Which response shape the model is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSchema {
    /// Array of care-plan rows (issue, objectives, strategies, follow-up).
    #[default]
    #[serde(alias = "row-table", alias = "row_table")]
    Rows,
    /// Single object with diagnosis, workup, treatment, surveillance, follow-up.
    #[serde(alias = "structured-plan", alias = "structured_plan")]
    Plan,
}

impl std::fmt::Display for PlanSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanSchema::Rows => write!(f, "rows"),
            PlanSchema::Plan => write!(f, "plan"),
        }
    }
}

/// Clinical context injected into the prompt. Absent fields render as "N/A".
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptContext<'a> {
    pub cancer_type: Option<&'a str>,
    pub stage: Option<&'a str>,
    pub subtype: Option<&'a str>,
    pub setting: Option<&'a str>,
    pub guideline_basis: Option<&'a str>,
    pub clinical_context_notes: Option<&'a str>,
}

pub const DEFAULT_GUIDELINE_BASIS: &str = "Evidence-based standard of care";

const ROWS_OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT:
- Return ONLY valid JSON (UTF-8), no markdown, no commentary.
- JSON must be an array of 5 objects (rows), each with EXACTLY these keys:
  - "clinical_issue_diagnosis"                (string)
  - "therapeutic_objective"                  (array of strings; each item is a bullet)
  - "management_strategy"                    (array of strings; each item is a bullet)
  - "assessment_of_response_follow_up"       (array of strings; each item is a bullet)"#;

const PLAN_OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT:
- Return ONLY valid JSON (UTF-8), no markdown, no commentary.
- JSON must be a single object with EXACTLY these keys:
  - "diagnosis"      (string)
  - "workup"         (array of strings; each item is a bullet)
  - "treatment"      (array of objects with "name" (string) and optional "details" (string))
  - "surveillance"   (array of strings; each item is a bullet)
  - "follow_up"      (array of strings; each item is a bullet)"#;

const CLINICAL_STYLE: &str = r#"CLINICAL STYLE:
- Use precise clinical language suitable for an oncologist.
- Make bullets concise, action-oriented, and non-redundant.
- Include biomarker- or mutation-directed strategies when relevant (e.g., PIK3CA, BRCA1/2, PD-L1, MSI-H, NTRK, etc.) based on the specified subtype/setting.
- Include supportive/palliative components when relevant to the context.
- Do NOT include drug doses or schedules; summarize strategies and decisions.
- If an item does not apply, omit it rather than writing "N/A"."#;

const ROW_DEFINITIONS: &str = r#"ROW DEFINITIONS (create 5 rows total, adapt to the context):
1) Row for the PRIMARY clinical problem in this context (e.g., localized disease OR first-line metastatic presentation).
2) Row for RECURRENCE/PROGRESSION or next-line sequencing (e.g., biomarker-driven options, endocrine vs chemotherapy triggers, ADCs, immunotherapy, PARPi, etc.)
3) Row for COMPLICATION-SPECIFIC care where relevant (e.g., bone metastases/SRE prevention, CNS disease management, thromboembolism risk).
4) Row for TOXICITY/PREVENTIVE care linked to the chosen strategies (e.g., cardiotoxicity surveillance, bone health on AIs, hyperglycemia on PI3K inhibitors).
5) Row for SURVIVORSHIP / FOLLOW-UP or ONGOING MONITORING appropriate to the setting (metastatic monitoring vs adjuvant surveillance), including PROs and imaging principles."#;

const ROWS_VALIDATION: &str = r#"VALIDATION:
- Ensure the response is strictly valid JSON and parses with a standard JSON parser.
- Each array must have at least 2 bullet items.
- Avoid duplicate bullets across columns."#;

const PLAN_VALIDATION: &str = r#"VALIDATION:
- Ensure the response is strictly valid JSON and parses with a standard JSON parser.
- List treatment modalities in the order they would be delivered.
- Avoid duplicate bullets across sections."#;

/// Build the full prompt for one request.
pub fn build_prompt(ctx: &PromptContext<'_>, schema: PlanSchema) -> String {
    let (output_format, validation) = match schema {
        PlanSchema::Rows => (ROWS_OUTPUT_FORMAT, ROWS_VALIDATION),
        PlanSchema::Plan => (PLAN_OUTPUT_FORMAT, PLAN_VALIDATION),
    };

    let mut prompt = String::new();
    prompt.push_str(
        "You are generating a structured clinical care-plan summary for oncology.\n\n",
    );
    prompt.push_str(output_format);
    prompt.push_str("\n\n");
    prompt.push_str(&content_requirements(ctx));
    prompt.push_str("\n\n");
    prompt.push_str(CLINICAL_STYLE);
    prompt.push_str("\n\n");
    if schema == PlanSchema::Rows {
        prompt.push_str(ROW_DEFINITIONS);
        prompt.push_str("\n\n");
    }
    prompt.push_str(validation);
    prompt.push_str("\n\nNow produce the JSON.");

    prompt
}

fn content_requirements(ctx: &PromptContext<'_>) -> String {
    format!(
        "CONTENT REQUIREMENTS:\n\
         - Cancer: {}\n\
         - Stage: {}\n\
         - Subtype: {}\n\
         - Treatment setting: {}\n\
         - Guideline basis: {}\n\
         - Context notes: {}",
        or_na(ctx.cancer_type),
        or_na(ctx.stage),
        or_na(ctx.subtype),
        or_na(ctx.setting),
        ctx.guideline_basis.unwrap_or(DEFAULT_GUIDELINE_BASIS),
        ctx.clinical_context_notes.unwrap_or("None"),
    )
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_prompt_contains_context() {
        let ctx = PromptContext {
            cancer_type: Some("Breast cancer"),
            stage: Some("II"),
            subtype: Some("HR+/HER2-"),
            ..Default::default()
        };
        let prompt = build_prompt(&ctx, PlanSchema::Rows);

        assert!(prompt.contains("- Cancer: Breast cancer"));
        assert!(prompt.contains("- Stage: II"));
        assert!(prompt.contains("- Subtype: HR+/HER2-"));
        assert!(prompt.contains("clinical_issue_diagnosis"));
        assert!(prompt.contains("ROW DEFINITIONS"));
        assert!(prompt.ends_with("Now produce the JSON."));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let prompt = build_prompt(&PromptContext::default(), PlanSchema::Rows);

        assert!(prompt.contains("- Cancer: N/A"));
        assert!(prompt.contains("- Treatment setting: N/A"));
        assert!(prompt.contains("- Guideline basis: Evidence-based standard of care"));
        assert!(prompt.contains("- Context notes: None"));
    }

    #[test]
    fn test_plan_prompt_asks_for_object() {
        let ctx = PromptContext {
            cancer_type: Some("Colorectal cancer"),
            ..Default::default()
        };
        let prompt = build_prompt(&ctx, PlanSchema::Plan);

        assert!(prompt.contains("single object"));
        assert!(prompt.contains("\"treatment\""));
        assert!(!prompt.contains("ROW DEFINITIONS"));
        assert!(!prompt.contains("clinical_issue_diagnosis"));
    }

    #[test]
    fn test_schema_serde_names() {
        assert_eq!(serde_json::to_string(&PlanSchema::Rows).unwrap(), "\"rows\"");
        let plan: PlanSchema = serde_json::from_str("\"structured-plan\"").unwrap();
        assert_eq!(plan, PlanSchema::Plan);
        assert_eq!(PlanSchema::default(), PlanSchema::Rows);
    }
}
