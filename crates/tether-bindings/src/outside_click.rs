#![forbid(unsafe_code)]

//! Outside-click detection: dismiss-style callbacks for pointer-down events
//! that land outside a referenced element.
//!
//! [`OutsideClick`] keeps a listener on the [`EventHub`] for its whole
//! lifetime. On every `PointerDown` it checks, in order: the referenced
//! element is mounted, the event position falls outside it, and the gate is
//! enabled — and only then invokes the callback. The gate value is captured
//! at subscribe time; [`set_enabled`] replaces the listener when the gate
//! changes, so a stale capture never outlives its input.
//!
//! [`set_enabled`]: OutsideClick::set_enabled
//!
//! # Invariants
//!
//! 1. An unset element reference makes the listener a no-op for that event.
//! 2. The old listener is removed before the replacement is registered.
//! 3. Drop unsubscribes; no callback fires after unmount.
//!
//! # Failure Modes
//!
//! - Events other than `PointerDown` are ignored entirely.
//! - Callback panic: propagates to the hub's emitter.

use std::rc::Rc;

use tracing::trace;

use tether_core::element::ElementRef;
use tether_core::event::Event;
use tether_runtime::deps;
use tether_runtime::hub::EventHub;
use tether_runtime::scope::Effect;

/// A gated pointer-down-outside listener bound to its owner's lifetime.
pub struct OutsideClick {
    hub: EventHub,
    element: ElementRef,
    callback: Rc<dyn Fn()>,
    enabled: bool,
    effect: Effect,
}

impl std::fmt::Debug for OutsideClick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutsideClick")
            .field("enabled", &self.enabled)
            .field("mounted", &self.element.is_mounted())
            .finish()
    }
}

impl OutsideClick {
    /// Bind `callback` to pointer-downs outside `element`, gate enabled.
    #[must_use]
    pub fn new(hub: &EventHub, element: ElementRef, callback: impl Fn() + 'static) -> Self {
        Self::with_enabled(hub, element, callback, true)
    }

    /// Bind with an explicit initial gate value.
    #[must_use]
    pub fn with_enabled(
        hub: &EventHub,
        element: ElementRef,
        callback: impl Fn() + 'static,
        enabled: bool,
    ) -> Self {
        let mut binding = Self {
            hub: hub.clone(),
            element,
            callback: Rc::new(callback),
            enabled,
            effect: Effect::new(),
        };
        binding.resubscribe();
        binding
    }

    /// Update the gate; a changed value re-subscribes the listener.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.resubscribe();
    }

    /// Current gate value.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The element reference this binding watches.
    #[must_use]
    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    fn resubscribe(&mut self) {
        let hub = self.hub.clone();
        let element = self.element.clone();
        let callback = Rc::clone(&self.callback);
        let enabled = self.enabled;
        self.effect.sync(deps!(enabled), move || {
            let guard = hub.subscribe(move |event| {
                let Event::PointerDown(pointer) = event else {
                    return;
                };
                if element.is_mounted() && !element.contains(pointer.position) && enabled {
                    trace!(
                        x = pointer.position.x,
                        y = pointer.position.y,
                        "outside click"
                    );
                    callback();
                }
            });
            Some(Box::new(move || drop(guard)))
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
