//! Console stand-in for the chart engine
//!
//! The real renderer is an external collaborator; this placeholder fills the
//! seam so the session can run end to end from a terminal. It prints a
//! one-line summary of each mounted specification, supports no interaction
//! signal (so selection simply stays unavailable) and cannot rasterize.

use async_trait::async_trait;
use pv_core::RenderSpec;
use pv_render::{
    ChartRenderer, ListenerId, RenderError, RenderInstance, SignalListener,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub struct ConsoleRenderer;

struct ConsoleInstance {
    summary: String,
    finalized: AtomicBool,
}

#[async_trait]
impl ChartRenderer for ConsoleRenderer {
    async fn render(&self, spec: &RenderSpec) -> Result<Arc<dyn RenderInstance>, RenderError> {
        let value = spec.as_value();
        let mark = value["mark"].as_str().unwrap_or("chart");
        let title = value["title"].as_str().unwrap_or("untitled");
        let summary = format!("{mark} chart \"{title}\"");
        println!("[chart] mounted {summary}");
        Ok(Arc::new(ConsoleInstance {
            summary,
            finalized: AtomicBool::new(false),
        }))
    }
}

#[async_trait]
impl RenderInstance for ConsoleInstance {
    fn finalize(&self) {
        if !self.finalized.swap(true, Ordering::SeqCst) {
            debug!(summary = %self.summary, "console chart torn down");
        }
    }

    fn on_signal(&self, signal: &str, _listener: SignalListener) -> Result<ListenerId, RenderError> {
        Err(RenderError::SignalUnsupported(signal.to_string()))
    }

    fn off_signal(&self, _signal: &str, _id: ListenerId) -> Result<(), RenderError> {
        Ok(())
    }

    async fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        if self.finalized.load(Ordering::SeqCst) {
            return Err(RenderError::Finalized);
        }
        Err(RenderError::Export(
            "image export needs a graphical chart engine".into(),
        ))
    }
}
