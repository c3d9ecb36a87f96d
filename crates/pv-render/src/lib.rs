//! Chart rendering session
//!
//! This crate owns the lifecycle of the single live chart instance: mounting
//! a new rendering specification, tearing the previous instance down safely,
//! discarding stale results from superseded mounts, and feeding mark
//! selections from the live instance to the rest of the session.
//!
//! The renderer itself is an external collaborator behind the
//! [`ChartRenderer`] trait; the client never looks inside a specification.

pub mod channel;
pub mod instance;
pub mod session;

pub use channel::SelectionChannel;
pub use instance::{ChartRenderer, ListenerId, RenderInstance, SignalListener, SELECT_SIGNAL};
pub use session::{InstanceSubscriber, RenderSession};

use thiserror::Error;

/// Errors from the rendering seam
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart construction failed: {0}")]
    Construction(String),

    #[error("signal '{0}' is not supported by this chart")]
    SignalUnsupported(String),

    #[error("render instance already finalized")]
    Finalized,

    #[error("image export failed: {0}")]
    Export(String),
}
