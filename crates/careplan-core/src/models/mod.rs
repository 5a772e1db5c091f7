//! Domain models for the care-plan service.

mod plan;
mod request;

pub use plan::*;
pub use request::*;
