//! Renderer collaborator seam

use async_trait::async_trait;
use pv_core::RenderSpec;
use serde_json::Value;
use std::sync::Arc;

use crate::RenderError;

/// Well-known interaction signal emitted when the user picks a mark.
pub const SELECT_SIGNAL: &str = "select";

/// Handle returned by [`RenderInstance::on_signal`], used to detach.
pub type ListenerId = u64;

/// Callback invoked with the raw signal payload (absent or a JSON value).
pub type SignalListener = Box<dyn Fn(Option<Value>) + Send + Sync>;

/// The mounted, interactive chart object.
///
/// Exactly one instance is live at any time, owned by the
/// [`RenderSession`](crate::RenderSession); everything else only reads the
/// published handle.
#[async_trait]
pub trait RenderInstance: Send + Sync {
    /// Tear the instance down. Idempotent; later calls are no-ops.
    fn finalize(&self);

    /// Register a listener for a named interaction signal.
    ///
    /// Instances for charts without interactive marks may not support the
    /// signal; callers treat that as non-fatal.
    fn on_signal(&self, signal: &str, listener: SignalListener) -> Result<ListenerId, RenderError>;

    /// Remove a previously registered listener.
    fn off_signal(&self, signal: &str, id: ListenerId) -> Result<(), RenderError>;

    /// Rasterize the current view as PNG bytes.
    ///
    /// Fails (rather than delivering a partial file) if the instance was
    /// finalized mid-export.
    async fn to_png(&self) -> Result<Vec<u8>, RenderError>;
}

/// Constructs live instances from rendering specifications.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, spec: &RenderSpec) -> Result<Arc<dyn RenderInstance>, RenderError>;
}
