#![forbid(unsafe_code)]

//! Reactive state: a version-tracked value with change notification.
//!
//! [`Observable<T>`] is the local-state primitive the bindings build on. It
//! uses `Rc<RefCell<..>>` for single-threaded shared ownership; subscribers
//! are stored as `Weak` function pointers and cleaned up lazily during
//! notification. [`Subscription`] is the RAII guard — dropping it is the
//! unsubscribe.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version
//!    bump, no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//!
//! # Failure Modes
//!
//! - Subscriber panic: propagates to the caller of `set`; later subscribers
//!   in that cycle do not run.
//! - Re-entrant `set` from a subscriber: the nested cycle completes first,
//!   then the outer cycle resumes with its already-collected subscriber list.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// RAII guard for a subscriber callback.
///
/// The guard owns the only strong reference to the callback; the observable
/// keeps a weak one. Dropping the guard therefore unsubscribes.
pub struct Subscription {
    _keep_alive: Box<dyn Any>,
}

impl Subscription {
    pub(crate) fn new(keep_alive: Box<dyn Any>) -> Self {
        Self {
            _keep_alive: keep_alive,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}

// ---------------------------------------------------------------------------
// Observable<T>
// ---------------------------------------------------------------------------

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<dyn Fn(&T)>>,
}

/// A shared, version-tracked value wrapper with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value: initial,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set a new value, notifying subscribers if it differs from the
    /// current one.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place, notifying subscribers if the mutation
    /// changed it.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            f(&mut inner.value);
            if inner.value == before {
                return;
            }
            inner.version += 1;
        }
        self.notify();
    }

    /// Register `callback` to run after every value change.
    ///
    /// The callback fires until the returned [`Subscription`] is dropped.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<dyn Fn(&T)> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription::new(Box::new(strong))
    }

    /// Monotonic version counter; bumps once per value change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers (dead guards are pruned first).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|weak| weak.strong_count() > 0);
        inner.subscribers.len()
    }

    fn notify(&self) {
        // Snapshot live subscribers in registration order, pruning dead
        // ones, then invoke with the borrow released so callbacks may read
        // or even set the observable.
        let (value, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<dyn Fn(&T)>> = inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&value);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
