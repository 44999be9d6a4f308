#![forbid(unsafe_code)]

//! Lifecycle-scoped repeating timer.
//!
//! [`Interval`] owns one repeating schedule on a [`TimerService`], restarted
//! whenever its declared inputs change and stopped on drop. [`sync`] is the
//! per-pass entry point: call it with the component's current callback,
//! period, and extra dependencies every time the component updates.
//!
//! Input identity rules (what counts as "changed"):
//!
//! - callback: `Rc` pointer identity; swapping `Some`/`None` also counts
//! - period: value equality
//! - deps: [`Deps`] fingerprint equality
//!
//! [`sync`]: Interval::sync
//!
//! # Invariants
//!
//! 1. At most one live schedule; the old one stops before a new one starts.
//! 2. A `None` callback means disabled — not an error, nothing scheduled.
//! 3. An unchanged input set never resets the schedule's phase.
//! 4. Drop stops the schedule.

use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::trace;
use web_time::Duration;

use tether_runtime::scope::{Deps, Effect, deps_hasher};
use tether_runtime::timer::{TimerId, TimerService};

/// Period applied when callers have no better default.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// A repeating callback bound to its owner's lifetime.
pub struct Interval {
    timers: TimerService,
    effect: Effect,
    // Kept so the pointer compared against next pass cannot be reused by a
    // fresh allocation while it is still the comparison baseline.
    callback: Option<Rc<dyn Fn()>>,
    running: Rc<Cell<Option<TimerId>>>,
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interval")
            .field("running", &self.is_running())
            .finish()
    }
}

impl Interval {
    /// Create an idle interval; nothing is scheduled until [`sync`].
    ///
    /// [`sync`]: Interval::sync
    #[must_use]
    pub fn new(timers: &TimerService) -> Self {
        Self {
            timers: timers.clone(),
            effect: Effect::new(),
            callback: None,
            running: Rc::new(Cell::new(None)),
        }
    }

    /// Apply the component's current inputs.
    ///
    /// Restarts the schedule when the callback reference, the period, or
    /// `deps` changed since the last call; otherwise leaves the running
    /// schedule untouched. `None` disables.
    pub fn sync(&mut self, callback: Option<Rc<dyn Fn()>>, period: Duration, deps: Deps) {
        let identity = {
            let mut hasher = deps_hasher();
            match &callback {
                Some(cb) => {
                    1u8.hash(&mut hasher);
                    (Rc::as_ptr(cb).cast::<()>() as usize).hash(&mut hasher);
                }
                None => 0u8.hash(&mut hasher),
            }
            period.hash(&mut hasher);
            deps.hash(&mut hasher);
            Deps::from_hash(hasher.finish())
        };

        let timers = self.timers.clone();
        let running = Rc::clone(&self.running);
        self.callback = callback.clone();
        self.effect.sync(identity, move || {
            let callback = callback?;
            let id = timers.schedule_repeating(period, move || callback());
            running.set(Some(id));
            trace!(period_us = period.as_micros() as u64, "interval started");
            Some(Box::new(move || {
                if let Some(id) = running.take() {
                    timers.cancel(id);
                    trace!("interval stopped");
                }
            }))
        });
    }

    /// Whether a schedule is currently live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get().is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::clock::{Clock, LabClock};
    use tether_runtime::deps;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_500: Duration = Duration::from_millis(500);
    const SEC_1: Duration = Duration::from_secs(1);

    fn lab_service() -> (TimerService, LabClock) {
        let lab = LabClock::new();
        (TimerService::new(Clock::lab(&lab)), lab)
    }

    fn counting_callback() -> (Rc<Cell<u32>>, Rc<dyn Fn()>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, Rc::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn fires_once_per_period() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(callback), SEC_1, deps!());
        assert!(interval.is_running());

        for expected in 1..=3 {
            lab.advance(SEC_1);
            timers.pump();
            assert_eq!(count.get(), expected);
        }
    }

    #[test]
    fn idle_until_first_sync() {
        let (timers, lab) = lab_service();
        let interval = Interval::new(&timers);
        assert!(!interval.is_running());
        lab.advance(SEC_1);
        assert_eq!(timers.pump(), 0);
    }

    #[test]
    fn none_callback_is_disabled() {
        let (timers, lab) = lab_service();
        let mut interval = Interval::new(&timers);
        interval.sync(None, SEC_1, deps!());
        assert!(!interval.is_running());

        lab.advance(SEC_1);
        assert_eq!(timers.pump(), 0);
    }

    #[test]
    fn callback_becoming_none_stops_fires() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(callback), MS_100, deps!());

        lab.advance(MS_100);
        timers.pump();
        assert_eq!(count.get(), 1);

        interval.sync(None, MS_100, deps!());
        assert!(!interval.is_running());
        lab.advance(SEC_1);
        timers.pump();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unchanged_inputs_keep_schedule_phase() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(Rc::clone(&callback)), MS_100, deps!());

        lab.advance(MS_50);
        timers.pump();
        // Re-sync with identical inputs mid-period: no restart.
        interval.sync(Some(callback), MS_100, deps!());

        lab.advance(MS_50);
        timers.pump();
        assert_eq!(count.get(), 1, "fire lands on the original schedule");
    }

    #[test]
    fn period_change_restarts_without_double_fire() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(Rc::clone(&callback)), SEC_1, deps!());

        lab.advance(SEC_1);
        timers.pump();
        assert_eq!(count.get(), 1);

        interval.sync(Some(callback), MS_500, deps!());
        assert_eq!(timers.pending(), 1, "old schedule stopped, one live");

        lab.advance(MS_500);
        timers.pump();
        assert_eq!(count.get(), 2);

        lab.advance(MS_500);
        timers.pump();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn restart_resets_phase() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(Rc::clone(&callback)), MS_100, deps!("a"));

        lab.advance(MS_50);
        timers.pump();
        interval.sync(Some(callback), MS_100, deps!("b"));

        // The pre-restart deadline passes unfired.
        lab.advance(MS_50);
        timers.pump();
        assert_eq!(count.get(), 0);

        lab.advance(MS_50);
        timers.pump();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn new_callback_reference_restarts() {
        let (timers, lab) = lab_service();
        let (count_a, callback_a) = counting_callback();
        let (count_b, callback_b) = counting_callback();
        let mut interval = Interval::new(&timers);

        interval.sync(Some(callback_a), MS_100, deps!());
        interval.sync(Some(callback_b), MS_100, deps!());

        lab.advance(MS_100);
        timers.pump();
        assert_eq!(count_a.get(), 0, "replaced before it ever fired");
        assert_eq!(count_b.get(), 1);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn drop_stops_schedule() {
        let (timers, lab) = lab_service();
        let (count, callback) = counting_callback();
        let mut interval = Interval::new(&timers);
        interval.sync(Some(callback), MS_100, deps!());
        assert_eq!(timers.pending(), 1);

        drop(interval);
        assert_eq!(timers.pending(), 0);
        lab.advance(SEC_1);
        timers.pump();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn debug_format() {
        let (timers, _lab) = lab_service();
        let interval = Interval::new(&timers);
        assert!(format!("{interval:?}").contains("running: false"));
    }
}
