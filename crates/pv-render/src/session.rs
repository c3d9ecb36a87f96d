//! Render session: single live instance with last-mount-wins replacement

use parking_lot::RwLock;
use pv_core::RenderSpec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::instance::{ChartRenderer, RenderInstance};
use crate::RenderError;

/// Observer of the published instance handle.
///
/// Notified synchronously whenever the handle changes, so a subscriber can
/// re-attach listeners before any signal from the new instance can fire.
pub trait InstanceSubscriber: Send + Sync {
    fn on_instance_change(&self, instance: Option<&Arc<dyn RenderInstance>>);
}

/// Owns the lifecycle of the single live chart instance.
///
/// Each `mount` call finalizes the previous instance immediately and records
/// a generation number; when the asynchronous construction resolves, the
/// result is only published if no later mount has been issued in the
/// meantime. A superseded instance is finalized without ever being
/// published, so a slow render for an old specification can never overwrite
/// a fast render for a newer one.
pub struct RenderSession {
    renderer: Arc<dyn ChartRenderer>,
    current: RwLock<Option<Arc<dyn RenderInstance>>>,
    generation: AtomicU64,
    subscribers: RwLock<Vec<Weak<dyn InstanceSubscriber>>>,
}

impl RenderSession {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            renderer,
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// The currently published live instance, if any.
    pub fn current(&self) -> Option<Arc<dyn RenderInstance>> {
        self.current.read().clone()
    }

    /// Add a subscriber for instance changes.
    pub fn subscribe(&self, subscriber: Arc<dyn InstanceSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    /// Mount a new rendering specification, replacing the live instance.
    pub async fn mount(&self, spec: &RenderSpec) -> Result<(), RenderError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Drop the prior instance before construction starts so consumers
        // cannot observe it mid-teardown.
        if let Some(prev) = self.current.write().take() {
            prev.finalize();
        }
        self.notify();

        match self.renderer.render(spec).await {
            Ok(instance) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    // A later mount was issued while this one was being
                    // constructed; its instance is authoritative.
                    debug!(generation, "discarding superseded render instance");
                    instance.finalize();
                    return Ok(());
                }
                *self.current.write() = Some(instance);
                debug!(generation, "published render instance");
                self.notify();
                Ok(())
            }
            Err(err) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(generation, %err, "ignoring failure of superseded mount");
                    return Ok(());
                }
                warn!(%err, "chart construction failed");
                Err(err)
            }
        }
    }

    /// Finalize and clear the live instance (owning view going away).
    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(prev) = self.current.write().take() {
            prev.finalize();
        }
        self.notify();
    }

    fn notify(&self) {
        let instance = self.current.read().clone();
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|weak| weak.strong_count() > 0);
        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_instance_change(instance.as_ref());
            }
        }
    }
}
