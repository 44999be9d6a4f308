#![forbid(unsafe_code)]

//! Debounced value holder: republish only after a quiet period.
//!
//! [`Debounced<T>`] tracks a raw input value and an [`Observable`] published
//! value. Every input change cancels the outstanding publish (if any) and
//! schedules a fresh one; the published value therefore only moves once the
//! input has been stable for the full delay.
//!
//! # Invariants
//!
//! 1. At most one publish is pending at any time.
//! 2. The published value changes only when a scheduled publish fires.
//! 3. Setting an input equal to the current input neither cancels nor
//!    reschedules the pending publish.
//! 4. Drop cancels the pending publish; a value in flight at unmount is
//!    never published.
//!
//! # Failure Modes
//!
//! - A zero delay degenerates to "publish on the next pump", not "publish
//!   immediately".
//! - Publishing a value equal to the already-published one notifies no
//!   subscribers (equal-value set on the backing observable is a no-op).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use web_time::Duration;

use tether_runtime::reactive::{Observable, Subscription};
use tether_runtime::timer::{TimerId, TimerService};

/// Delay applied when none is given.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

struct DebouncedInner<T> {
    input: T,
    delay: Duration,
    pending: Option<TimerId>,
    published: Observable<T>,
}

/// A value that republishes only after staying unchanged for a delay.
///
/// Owned by the component that created it; dropping it cancels any pending
/// publish.
pub struct Debounced<T> {
    inner: Rc<RefCell<DebouncedInner<T>>>,
    timers: TimerService,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Debounced")
            .field("input", &inner.input)
            .field("pending", &inner.pending.is_some())
            .field("delay", &inner.delay)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Debounced<T> {
    /// Create a holder publishing `initial`, with [`DEFAULT_DELAY`].
    #[must_use]
    pub fn new(timers: &TimerService, initial: T) -> Self {
        Self::with_delay(timers, initial, DEFAULT_DELAY)
    }

    /// Create a holder publishing `initial`, with an explicit delay.
    #[must_use]
    pub fn with_delay(timers: &TimerService, initial: T, delay: Duration) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DebouncedInner {
                input: initial.clone(),
                delay,
                pending: None,
                published: Observable::new(initial),
            })),
            timers: timers.clone(),
        }
    }

    /// Feed a new input value.
    ///
    /// A changed value cancels the outstanding publish and schedules a new
    /// one after the current delay. An unchanged value does nothing.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.input == value {
                return;
            }
            inner.input = value;
        }
        self.reschedule();
    }

    /// Change the quiet period.
    ///
    /// A changed delay cancels the outstanding publish and schedules a fresh
    /// one for the current input after the new delay.
    pub fn set_delay(&self, delay: Duration) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.delay == delay {
                return;
            }
            inner.delay = delay;
        }
        self.reschedule();
    }

    /// The current published (debounced) value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().published.get()
    }

    /// The latest raw input, which may not be published yet.
    #[must_use]
    pub fn input(&self) -> T {
        self.inner.borrow().input.clone()
    }

    /// The current quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.borrow().delay
    }

    /// Whether a publish is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// Observe publishes. The callback fires with each newly published
    /// value until the guard is dropped.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.borrow().published.subscribe(callback)
    }

    fn reschedule(&self) {
        let delay = {
            let mut inner = self.inner.borrow_mut();
            if let Some(id) = inner.pending.take() {
                self.timers.cancel(id);
            }
            inner.delay
        };

        // The scheduled publish holds a weak handle: if the holder is gone
        // by fire time nothing happens (and Drop cancels the timer anyway).
        let weak = Rc::downgrade(&self.inner);
        let id = self.timers.schedule_once(delay, move || {
            let Some(inner) = weak.upgrade() else { return };
            let (published, value) = {
                let mut inner = inner.borrow_mut();
                inner.pending = None;
                (inner.published.clone(), inner.input.clone())
            };
            published.set(value);
        });
        trace!(delay_us = delay.as_micros() as u64, "debounce scheduled");
        self.inner.borrow_mut().pending = Some(id);
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(id) = self.inner.borrow_mut().pending.take() {
            self.timers.cancel(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
