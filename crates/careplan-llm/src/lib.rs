//! LLM side of care-plan generation.
//!
//! This crate builds the oncology care-plan prompt, sends it to an
//! OpenAI-compatible chat-completion API, and recovers JSON from whatever
//! text comes back.

pub mod client;
pub mod extraction;
pub mod prompts;

pub use client::*;
pub use extraction::*;
pub use prompts::*;
