#![forbid(unsafe_code)]

//! Event hub: the document-level listener registry.
//!
//! The host translates backend input into [`Event`]s and emits them here;
//! bindings subscribe for the lifetime of an RAII [`HubSubscription`] guard.
//! Listener storage mirrors the reactive module: weak function pointers,
//! pruned lazily at dispatch time, with the guard holding the only strong
//! reference.
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order.
//! 2. A guard dropped before `emit` never fires.
//! 3. Listeners registered during `emit` do not observe the in-flight event.
//!
//! # Failure Modes
//!
//! - Listener panic: propagates to the emitter; later listeners in that
//!   dispatch do not run.
//! - Guard dropped *during* `emit` by an earlier listener: the dispatch
//!   snapshot already holds the callback, so it still fires this cycle and
//!   is gone the next.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use tether_core::event::Event;

// ---------------------------------------------------------------------------
// HubSubscription
// ---------------------------------------------------------------------------

/// RAII guard for a hub listener; dropping it unsubscribes.
pub struct HubSubscription {
    _keep_alive: Rc<dyn Fn(&Event)>,
}

impl std::fmt::Debug for HubSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSubscription").finish()
    }
}

// ---------------------------------------------------------------------------
// EventHub
// ---------------------------------------------------------------------------

struct HubInner {
    listeners: Vec<Weak<dyn Fn(&Event)>>,
}

/// Global event bus with registration-order dispatch.
///
/// Cheap to clone; clones share the listener registry.
#[derive(Clone)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

impl EventHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                listeners: Vec::new(),
            })),
        }
    }

    /// Register `listener` for every emitted event.
    ///
    /// The listener fires until the returned guard is dropped.
    #[must_use]
    pub fn subscribe(&self, listener: impl Fn(&Event) + 'static) -> HubSubscription {
        let strong: Rc<dyn Fn(&Event)> = Rc::new(listener);
        self.inner
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&strong));
        trace!("hub listener registered");
        HubSubscription {
            _keep_alive: strong,
        }
    }

    /// Dispatch `event` to all live listeners in registration order.
    pub fn emit(&self, event: &Event) {
        let listeners: Vec<Rc<dyn Fn(&Event)>> = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|weak| weak.strong_count() > 0);
            inner.listeners.iter().filter_map(Weak::upgrade).collect()
        };
        trace!(listeners = listeners.len(), "hub dispatch");
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of live listeners (dead guards are pruned first).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|weak| weak.strong_count() > 0);
        inner.listeners.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
