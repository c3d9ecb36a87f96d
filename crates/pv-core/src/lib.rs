//! Core data model for the conversational chart client
//!
//! This crate defines the state that is exchanged with the remote agent and
//! tracked across a session: the chart plan, the opaque rendering
//! specification, the backing dataset, the current mark selection and the
//! conversation history.

pub mod data;
pub mod history;
pub mod plan;
pub mod selection;

// Re-export commonly used types
pub use data::{Dataset, Record};
pub use history::{Role, Turn};
pub use plan::{ChartType, Mark, Plan, PlanError};
pub use selection::Selection;

use serde::{Deserialize, Serialize};

/// Opaque declarative chart description produced by the remote agent.
///
/// The client never inspects it; it is handed verbatim to the renderer and
/// replaced atomically whenever a turn delivers a new one. It is never merged
/// with a previous specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderSpec(pub serde_json::Value);

impl RenderSpec {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}
