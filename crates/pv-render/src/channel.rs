//! Selection channel: mark picks from the live instance

use parking_lot::{Mutex, RwLock};
use pv_core::Selection;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::instance::{ListenerId, RenderInstance, SELECT_SIGNAL};
use crate::session::InstanceSubscriber;

struct Attachment {
    instance: Weak<dyn RenderInstance>,
    listener: ListenerId,
}

/// Subscribes to the live instance's selection signal and exposes the
/// current selection, or none.
///
/// Exactly one listener is attached per live instance; the old listener is
/// detached before the new one attaches, and the selection is cleared on
/// every instance swap. Instances that do not support the signal simply
/// never produce a selection.
pub struct SelectionChannel {
    selection: Arc<RwLock<Option<Selection>>>,
    attachment: Mutex<Option<Attachment>>,
}

impl SelectionChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            selection: Arc::new(RwLock::new(None)),
            attachment: Mutex::new(None),
        })
    }

    /// The most recently picked mark's attributes, if any.
    pub fn current(&self) -> Option<Selection> {
        self.selection.read().clone()
    }

    /// Explicitly clear the selection.
    pub fn clear(&self) {
        *self.selection.write() = None;
    }

    fn detach(&self, attachment: Attachment) {
        if let Some(instance) = attachment.instance.upgrade() {
            // The instance is being discarded anyway; detachment failures
            // are of no consequence.
            if let Err(err) = instance.off_signal(SELECT_SIGNAL, attachment.listener) {
                debug!(%err, "failed to detach selection listener");
            }
        }
    }
}

impl InstanceSubscriber for SelectionChannel {
    fn on_instance_change(&self, instance: Option<&Arc<dyn RenderInstance>>) {
        let mut attachment = self.attachment.lock();
        if let Some(old) = attachment.take() {
            self.detach(old);
        }
        // A selection never outlives the chart it was made on.
        *self.selection.write() = None;

        let Some(instance) = instance else {
            return;
        };
        let selection = self.selection.clone();
        let listener = Box::new(move |payload| {
            *selection.write() = Selection::from_payload(payload);
        });
        match instance.on_signal(SELECT_SIGNAL, listener) {
            Ok(id) => {
                *attachment = Some(Attachment {
                    instance: Arc::downgrade(instance),
                    listener: id,
                });
            }
            Err(err) => {
                // Non-fatal: this chart has no interactive marks.
                debug!(%err, "selection signal unavailable for this chart");
            }
        }
    }
}
