//! Careplan Core Library
//!
//! Oncology care-plan service: relays a clinical context to a chat model and
//! turns whatever text comes back into a fixed-shape plan.
//!
//! # Architecture
//!
//! ```text
//! POST /api/guidelines
//!         │
//!   validate request ──── 400 ValidationError
//!         │
//!   build prompt
//!         │
//!   chat completion ───── 502 upstream / 500 misconfigured
//!         │
//!  ┌──────▼─────────────────────────────┐
//!  │          Response Normalizer       │
//!  │  direct → fenced → [..] → {..}     │ ── 502 EmptyResponse / NoJson
//!  │  field-table coercion              │
//!  └──────┬─────────────────────────────┘
//!         │
//!   rows (array) or plan (object)
//! ```
//!
//! # Core Principle
//!
//! **Normalization never fails.** Once some JSON object is recovered, every
//! field has a defined default, so consumers never check shapes themselves.
//!
//! # Modules
//!
//! - [`models`]: Request and result types
//! - [`normalizer`]: JSON recovery + schema normalization
//! - [`api`]: axum router, handlers, error mapping
//! - [`config`]: Layered settings

pub mod api;
pub mod config;
pub mod models;
pub mod normalizer;

// Re-export commonly used types
pub use api::{api_router, ApiError, AppState};
pub use config::Settings;
pub use models::{
    CarePlanRow, GuidelinePlan, GuidelineRequest, NormalizedResult, TreatmentModality,
    ValidationError,
};
pub use normalizer::{normalize, normalize_candidate, Normalized};
