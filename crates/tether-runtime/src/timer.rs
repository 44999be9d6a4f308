#![forbid(unsafe_code)]

//! Timer service: one-shot and repeating schedules driven by a host loop.
//!
//! The host pumps the service (typically once per loop iteration); [`pump`]
//! fires every entry whose deadline has passed according to the service's
//! [`Clock`]. With a lab clock, tests advance time explicitly and pump —
//! no sleeping, fully deterministic.
//!
//! [`pump`]: TimerService::pump
//!
//! # Invariants
//!
//! 1. Due entries fire in deadline order; ties break by schedule order.
//! 2. A one-shot entry fires exactly once, then its id is gone.
//! 3. A cancelled entry never fires, including when cancelled by an earlier
//!    callback in the same pump.
//! 4. A repeating entry fires at most once per pump; after firing it is
//!    rescheduled to `now + period` (slip — no catch-up bursts after a
//!    stall).
//! 5. Entries scheduled from inside a callback first become due on a later
//!    pump, even with zero delay.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates out of `pump`; the panicking entry has
//!   already been consumed (one-shot) or rescheduled (repeating), remaining
//!   due entries fire on the next pump.
//! - Zero-period repeating entry: fires once per pump, never spins.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use web_time::{Duration, Instant};

use tether_core::clock::Clock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Handle to a scheduled entry; cancel by passing it back.
///
/// Ids are unique for the lifetime of the service and never reused, so a
/// stale handle can never cancel someone else's entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct TimerEntry {
    id: TimerId,
    due: Instant,
    period: Option<Duration>,
    callback: Rc<dyn Fn()>,
}

struct TimerInner {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

/// One-shot and repeating timers, fired by [`pump`](TimerService::pump).
///
/// Cheap to clone; clones share the schedule and the clock.
#[derive(Clone)]
pub struct TimerService {
    inner: Rc<RefCell<TimerInner>>,
    clock: Clock,
}

impl std::fmt::Debug for TimerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerService")
            .field("pending", &self.inner.borrow().entries.len())
            .field("lab", &self.clock.is_lab())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

impl TimerService {
    /// Create a service reading time from `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimerInner {
                entries: Vec::new(),
                next_id: 1,
            })),
            clock,
        }
    }

    /// Schedule `callback` to fire once, `delay` from now.
    ///
    /// A zero delay fires on the next pump.
    pub fn schedule_once(&self, delay: Duration, callback: impl Fn() + 'static) -> TimerId {
        self.schedule(delay, None, Rc::new(callback))
    }

    /// Schedule `callback` to fire every `period`, starting one period from
    /// now.
    pub fn schedule_repeating(&self, period: Duration, callback: impl Fn() + 'static) -> TimerId {
        self.schedule(period, Some(period), Rc::new(callback))
    }

    fn schedule(&self, delay: Duration, period: Option<Duration>, callback: Rc<dyn Fn()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(TimerEntry {
            id,
            due: self.clock.now() + delay,
            period,
            callback,
        });
        trace!(
            timer_id = id.0,
            delay_us = delay.as_micros() as u64,
            repeating = period.is_some(),
            "timer scheduled"
        );
        id
    }

    /// Cancel an entry. Returns `false` if the id is unknown or already
    /// fired (one-shot).
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let len_before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        let removed = inner.entries.len() < len_before;
        if removed {
            trace!(timer_id = id.0, "timer cancelled");
        }
        removed
    }

    /// Whether `id` refers to a live entry.
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.inner.borrow().entries.iter().any(|e| e.id == id)
    }

    /// Number of live entries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Earliest deadline among live entries, for hosts that sleep between
    /// pumps.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.inner.borrow().entries.iter().map(|e| e.due).min()
    }
}

// ---------------------------------------------------------------------------
// Pumping
// ---------------------------------------------------------------------------

impl TimerService {
    /// Fire every entry due as of now. Returns the number fired.
    ///
    /// The due set is snapshotted up front: entries scheduled by callbacks
    /// wait for the next pump, and each snapshotted entry is re-checked for
    /// cancellation just before it fires.
    pub fn pump(&self) -> usize {
        let now = self.clock.now();

        let mut due: Vec<(Instant, TimerId)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.due <= now)
            .map(|entry| (entry.due, entry.id))
            .collect();
        due.sort_by_key(|&(deadline, id)| (deadline, id.0));

        let mut fired = 0;
        for (_, id) in due {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let Some(index) = inner.entries.iter().position(|e| e.id == id) else {
                    continue; // cancelled by an earlier callback this pump
                };
                match inner.entries[index].period {
                    None => inner.entries.swap_remove(index).callback,
                    Some(period) => {
                        let entry = &mut inner.entries[index];
                        entry.due = self.clock.now() + period;
                        Rc::clone(&entry.callback)
                    }
                }
            };
            trace!(timer_id = id.0, "timer fired");
            callback();
            fired += 1;
        }
        fired
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
