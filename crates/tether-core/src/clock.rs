#![forbid(unsafe_code)]

//! Time sources: the real wall clock, or a manually-advanceable lab clock.
//!
//! Every timing decision in the stack goes through a [`Clock`] handle so that
//! tests can drive time deterministically instead of sleeping. In production
//! a clock reads `web_time::Instant::now()`; under test a [`LabClock`] is
//! advanced explicitly and every handle cloned from it observes the same
//! instant.
//!
//! # Invariants
//!
//! 1. `now()` is monotonic: advancing a lab clock never moves time backwards.
//! 2. All clones of a `Clock` (and the `LabClock` behind it) agree on `now()`.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

// ─── LabClock ────────────────────────────────────────────────────────────────

/// A manually-advanceable clock for deterministic tests.
///
/// Cheap to clone; all clones share the same offset.
#[derive(Debug, Clone)]
pub struct LabClock {
    epoch: Instant,
    offset_us: Rc<Cell<u64>>,
}

impl LabClock {
    /// Create a lab clock starting at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset_us: Rc::new(Cell::new(0)),
        }
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let us = delta.as_micros().min(u128::from(u64::MAX)) as u64;
        self.offset_us.set(self.offset_us.get().saturating_add(us));
    }

    /// Current lab time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.epoch + Duration::from_micros(self.offset_us.get())
    }
}

impl Default for LabClock {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Clock ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Source {
    Real,
    Lab(LabClock),
}

/// Handle to a time source.
///
/// Cheaply cloneable. Services that schedule work hold one and read
/// [`Clock::now`] whenever they need the current instant.
#[derive(Debug, Clone)]
pub struct Clock {
    source: Source,
}

impl Clock {
    /// The real wall clock.
    #[must_use]
    pub fn real() -> Self {
        Self {
            source: Source::Real,
        }
    }

    /// A clock driven by `lab`.
    #[must_use]
    pub fn lab(lab: &LabClock) -> Self {
        Self {
            source: Source::Lab(lab.clone()),
        }
    }

    /// Current time according to this source.
    #[must_use]
    pub fn now(&self) -> Instant {
        match &self.source {
            Source::Real => Instant::now(),
            Source::Lab(lab) => lab.now(),
        }
    }

    /// Whether this clock is lab-driven.
    #[inline]
    #[must_use]
    pub fn is_lab(&self) -> bool {
        matches!(self.source, Source::Lab(_))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::real()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
