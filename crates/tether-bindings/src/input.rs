#![forbid(unsafe_code)]

//! Bound input state: a value plus a formatting change handler.
//!
//! [`BoundInput<T>`] pairs an [`Observable`] value with a formatter
//! `(raw text) -> T`. The change handler reads the triggering event's text,
//! applies the formatter synchronously, and stores the result. Formatter
//! panics are not caught — they propagate to whoever delivered the event.

use std::rc::Rc;

use tether_core::event::InputEvent;
use tether_runtime::reactive::{Observable, Subscription};

/// A stateful value fed by formatted change events.
pub struct BoundInput<T> {
    value: Observable<T>,
    format: Rc<dyn Fn(&str) -> T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for BoundInput<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundInput")
            .field("value", &self.value)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> BoundInput<T> {
    /// Create a binding holding `initial`, formatting change events with
    /// `format`.
    #[must_use]
    pub fn new(initial: T, format: impl Fn(&str) -> T + 'static) -> Self {
        Self {
            value: Observable::new(initial),
            format: Rc::new(format),
        }
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.value.get()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }

    /// Store `value` directly, bypassing the formatter.
    pub fn set(&self, value: T) {
        self.value.set(value);
    }

    /// Apply a change event: format its text and store the result.
    pub fn on_change(&self, event: &InputEvent) {
        self.value.set((self.format)(event.text()));
    }

    /// A detached change handler, e.g. to hand to a widget.
    ///
    /// Equivalent to calling [`on_change`](Self::on_change); the closure
    /// shares this binding's value.
    #[must_use]
    pub fn change_handler(&self) -> Rc<dyn Fn(&InputEvent)> {
        let value = self.value.clone();
        let format = Rc::clone(&self.format);
        Rc::new(move |event: &InputEvent| value.set(format(event.text())))
    }

    /// Observe value changes until the guard is dropped.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.value.subscribe(callback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
