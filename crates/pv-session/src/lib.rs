//! Conversation and plan state
//!
//! [`ChatSession`] is the single owned session object: it tracks the turn
//! history, the current plan/specification/dataset, the live chart via the
//! render session, and the current mark selection. All mutation goes through
//! its documented entry points; submissions are single-flight so out-of-order
//! agent responses can never corrupt the plan.

pub mod query;
pub mod session;

pub use query::selection_to_query;
pub use session::ChatSession;

use thiserror::Error;

/// Errors surfaced by session entry points
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a submission is already in flight")]
    Busy,

    #[error("agent error: {0}")]
    Agent(#[from] pv_agent::AgentError),

    #[error("rejected plan: {0}")]
    Plan(#[from] pv_core::PlanError),

    #[error("render error: {0}")]
    Render(#[from] pv_render::RenderError),

    #[error("export error: {0}")]
    Export(#[from] pv_export::ExportError),
}
