//! HTTP API.
//!
//! - `GET /health`
//! - `POST /api/guidelines[?schema=rows|plan]`

pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use careplan_llm::{CompletionClient, PlanSchema};

pub use error::ApiError;
pub use router::api_router;

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub default_schema: PlanSchema,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, default_schema: PlanSchema) -> Self {
        Self {
            client,
            default_schema,
        }
    }
}
