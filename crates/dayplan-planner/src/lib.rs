//! AI sort requester for Dayplan.
//!
//! Given a session's task snapshot and the owner's productivity
//! preferences, this crate asks an external text-completion service for a
//! reordered plan and validates the free-text reply as JSON. The service is
//! treated as an unreliable black box: replies may be fenced, padded, or
//! plain garbage, and every failure mode collapses into a typed error the
//! caller renders as "could not build a plan".

pub mod client;
pub mod error;
pub mod planner;
pub mod response;

pub use client::{
    Completion, OpenRouterCompletion, DEFAULT_MODEL, OPENROUTER_API_KEY_ENV, OPENROUTER_MODEL_ENV,
};
pub use error::{PlannerError, Result};
pub use planner::request_plan;
pub use response::extract_json;
