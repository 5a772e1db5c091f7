//! Field-kind tables and per-field coercion.
//!
//! Coercion rules:
//! - `Text`: strings as-is, numbers/booleans stringified, null/missing → `""`
//! - `OptionalText`: same, but null/missing/`""` → absent
//! - `TextList`: arrays keep their non-null elements (stringified), any other
//!   non-null, non-empty value becomes a one-element list, null/missing/`""` → `[]`
//! - `RecordList`: like `TextList`, but each element is normalized against a
//!   nested table; a bare scalar fills the record's first field
//!
//! Unknown keys are dropped and missing keys take their empty default.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Expected shape of one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    OptionalText,
    TextList,
    RecordList(&'static [FieldSpec]),
}

/// One named field in a schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn optional_text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::OptionalText,
        }
    }

    pub const fn text_list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TextList,
        }
    }

    pub const fn record_list(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            kind: FieldKind::RecordList(fields),
        }
    }
}

/// Row-table variant.
pub const CARE_PLAN_ROW_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("clinical_issue_diagnosis"),
    FieldSpec::text_list("therapeutic_objective"),
    FieldSpec::text_list("management_strategy"),
    FieldSpec::text_list("assessment_of_response_follow_up"),
];

pub const TREATMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::optional_text("details"),
];

/// Structured-plan variant.
pub const GUIDELINE_PLAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("diagnosis"),
    FieldSpec::text_list("workup"),
    FieldSpec::record_list("treatment", TREATMENT_FIELDS),
    FieldSpec::text_list("surveillance"),
    FieldSpec::text_list("follow_up"),
];

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    TextList(Vec<String>),
    RecordList(Vec<Record>),
}

/// A record holding exactly the fields of its table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Take a text field, or `""` if it is not a text field.
    pub fn take_text(&mut self, name: &str) -> String {
        match self.fields.remove(name) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    pub fn take_optional_text(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name) {
            Some(FieldValue::OptionalText(s)) => s,
            _ => None,
        }
    }

    pub fn take_text_list(&mut self, name: &str) -> Vec<String> {
        match self.fields.remove(name) {
            Some(FieldValue::TextList(items)) => items,
            _ => Vec::new(),
        }
    }

    pub fn take_record_list(&mut self, name: &str) -> Vec<Record> {
        match self.fields.remove(name) {
            Some(FieldValue::RecordList(records)) => records,
            _ => Vec::new(),
        }
    }
}

/// Normalize one object against a field table. Never fails.
pub fn normalize_record(object: &Map<String, Value>, fields: &'static [FieldSpec]) -> Record {
    let fields = fields
        .iter()
        .map(|spec| (spec.name, coerce(object.get(spec.name), spec.kind)))
        .collect();
    Record { fields }
}

fn coerce(value: Option<&Value>, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(value.and_then(scalar_text).unwrap_or_default()),
        FieldKind::OptionalText => FieldValue::OptionalText(
            value.and_then(scalar_text).filter(|s| !s.is_empty()),
        ),
        FieldKind::TextList => FieldValue::TextList(list_items(value, element_text)),
        FieldKind::RecordList(nested) => {
            FieldValue::RecordList(list_items(value, |v| element_record(v, nested)))
        }
    }
}

/// Apply the list rules: arrays map element-wise, null/missing/`""` are empty,
/// anything else is a one-element list.
fn list_items<T>(value: Option<&Value>, element: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(element).collect(),
        Some(other) => element(other).into_iter().collect(),
    }
}

/// Stringify a value for a scalar field. `None` only for null.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Stringify a list element. Nested structures become compact JSON.
fn element_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn element_record(value: &Value, fields: &'static [FieldSpec]) -> Option<Record> {
    match value {
        Value::Object(object) => Some(normalize_record(object, fields)),
        Value::Null | Value::Array(_) => None,
        Value::String(s) if s.is_empty() => None,
        scalar => {
            // "Surgery" → {"name": "Surgery"}
            let first = fields.first()?;
            let mut object = Map::new();
            object.insert(first.name.to_string(), scalar.clone());
            Some(normalize_record(&object, fields))
        }
    }
}
