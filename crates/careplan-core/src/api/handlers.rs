//! Request handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use careplan_llm::{build_prompt, PlanSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::{GuidelineRequest, NormalizedResult, ValidationError};
use crate::normalizer::normalize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct GuidelineQuery {
    /// Overrides the configured response schema.
    #[serde(default)]
    pub schema: Option<PlanSchema>,
}

/// `POST /api/guidelines`: validate, prompt, complete, then normalize.
///
/// The request is validated before the model is called.
#[tracing::instrument(
    skip_all,
    fields(request_id = %Uuid::new_v4(), schema = tracing::field::Empty)
)]
pub async fn guidelines(
    State(state): State<AppState>,
    query: Result<Query<GuidelineQuery>, QueryRejection>,
    body: Result<Json<GuidelineRequest>, JsonRejection>,
) -> Result<Json<NormalizedResult>, ApiError> {
    let Query(query) = query.map_err(|e| ValidationError::InvalidQuery(e.body_text()))?;
    let Json(request) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    let request = request.validate()?;

    let schema = query.schema.unwrap_or(state.default_schema);
    tracing::Span::current().record("schema", tracing::field::display(schema));

    let prompt = build_prompt(&request.prompt_context(), schema);
    tracing::debug!(
        diagnosis = request.primary_diagnosis().unwrap_or_default(),
        prompt_len = prompt.len(),
        "Requesting care plan"
    );

    let content = state.client.complete(&prompt).await?;
    let normalized = normalize(content.as_deref(), schema)?;

    tracing::info!(strategy = %normalized.strategy, "Care plan normalized");
    Ok(Json(normalized.result))
}
