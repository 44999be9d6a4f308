#![forbid(unsafe_code)]

//! Lifecycle scopes: effects that re-run when their declared inputs change.
//!
//! An [`Effect`] is one lifecycle-bound slot. `sync(deps, setup)` is called
//! on every pass of the owning component: when the [`Deps`] fingerprint
//! differs from the last applied one, the previous cleanup runs, then the
//! new setup, whose returned [`Cleanup`] is held for next time. Dropping the
//! effect runs the pending cleanup — release is guaranteed on every exit
//! path.
//!
//! Dependencies are declared explicitly through the [`deps!`] macro, which
//! hashes each input into a fingerprint with a fixed-seed hasher. This makes
//! the equality rule visible at the call site instead of relying on implicit
//! comparison.
//!
//! # Invariants
//!
//! 1. Cleanup always runs before the replacement setup.
//! 2. An unchanged fingerprint runs neither cleanup nor setup.
//! 3. Drop runs the pending cleanup exactly once.
//! 4. [`EffectScope`] tears down held effects in reverse registration order.
//!
//! # Failure Modes
//!
//! - Fingerprint collision: two distinct dependency sets hashing equal read
//!   as "unchanged" and skip the restart. 64-bit fingerprints make this
//!   negligible for UI-scale inputs.
//! - Setup or cleanup panic: propagates to the caller of `sync`; the effect
//!   is left without a pending cleanup.

use std::hash::{Hash, Hasher};

use tracing::trace;

// ---------------------------------------------------------------------------
// Deps
// ---------------------------------------------------------------------------

/// Fingerprint of a declared dependency set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Deps(u64);

impl Deps {
    /// The empty dependency set: the effect runs once and never restarts.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Wrap a precomputed fingerprint (used by [`deps!`]).
    #[must_use]
    pub const fn from_hash(hash: u64) -> Self {
        Self(hash)
    }

    /// Fingerprint a single hashable value.
    #[must_use]
    pub fn of<D: Hash + ?Sized>(value: &D) -> Self {
        let mut hasher = deps_hasher();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Hasher for dependency fingerprints.
///
/// Seeds are fixed: fingerprints only need to be comparable between
/// successive `sync` calls within one process.
#[must_use]
pub fn deps_hasher() -> impl Hasher {
    use std::hash::BuildHasher;
    ahash::RandomState::with_seeds(
        0x7465_7468_6572,
        0x6465_7073,
        0x0b1e_55ed,
        0x5eed_5eed,
    )
    .build_hasher()
}

/// Fingerprint a list of dependencies into a [`Deps`].
///
/// # Examples
///
/// ```ignore
/// let deps = deps!(user_id, page);
/// effect.sync(deps, || { /* setup */ None });
/// ```
///
/// `deps!()` is the empty set — equivalent to [`Deps::none`].
#[macro_export]
macro_rules! deps {
    () => {
        $crate::scope::Deps::none()
    };
    ($($dep:expr),+ $(,)?) => {{
        let mut hasher = $crate::scope::deps_hasher();
        $(::std::hash::Hash::hash(&$dep, &mut hasher);)+
        $crate::scope::Deps::from_hash(::std::hash::Hasher::finish(&hasher))
    }};
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// Teardown closure returned by an effect's setup.
pub type Cleanup = Box<dyn FnOnce()>;

/// One lifecycle-bound effect slot.
#[derive(Default)]
pub struct Effect {
    deps: Option<Deps>,
    cleanup: Option<Cleanup>,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("has_run", &self.deps.is_some())
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

impl Effect {
    /// Create an effect that has never run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the current pass: if `deps` differs from the last applied
    /// fingerprint (or the effect never ran), run the pending cleanup, then
    /// `setup`, and hold its returned cleanup.
    pub fn sync(&mut self, deps: Deps, setup: impl FnOnce() -> Option<Cleanup>) {
        if self.deps == Some(deps) {
            return;
        }
        if let Some(cleanup) = self.cleanup.take() {
            trace!("effect cleanup (deps changed)");
            cleanup();
        }
        self.cleanup = setup();
        self.deps = Some(deps);
        trace!(has_cleanup = self.cleanup.is_some(), "effect setup");
    }

    /// Run the pending cleanup and forget the applied fingerprint, so the
    /// next `sync` runs setup again.
    pub fn teardown(&mut self) {
        self.deps = None;
        if let Some(cleanup) = self.cleanup.take() {
            trace!("effect cleanup (teardown)");
            cleanup();
        }
    }

    /// Whether setup has run since construction or the last teardown.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.deps.is_some()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// ---------------------------------------------------------------------------
// EffectScope
// ---------------------------------------------------------------------------

struct Slot {
    label: String,
    effect: Effect,
}

/// A labelled collection of effects torn down together.
///
/// One scope per component instance: every effect the component declares is
/// synced through the scope each pass, and dropping the scope releases them
/// all in reverse registration order.
#[derive(Default)]
pub struct EffectScope {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for EffectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectScope")
            .field("effects", &self.slots.len())
            .finish()
    }
}

impl EffectScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync the effect labelled `label`, creating its slot on first use.
    pub fn sync(&mut self, label: &str, deps: Deps, setup: impl FnOnce() -> Option<Cleanup>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.label == label) {
            slot.effect.sync(deps, setup);
        } else {
            let mut effect = Effect::new();
            effect.sync(deps, setup);
            self.slots.push(Slot {
                label: label.to_string(),
                effect,
            });
        }
    }

    /// Tear down and remove one labelled effect. Returns `false` if the
    /// label is unknown.
    pub fn teardown(&mut self, label: &str) -> bool {
        match self.slots.iter().position(|s| s.label == label) {
            Some(index) => {
                let mut slot = self.slots.remove(index);
                slot.effect.teardown();
                true
            }
            None => false,
        }
    }

    /// Tear down every effect (reverse registration order); the scope stays
    /// usable.
    pub fn clear(&mut self) {
        while let Some(mut slot) = self.slots.pop() {
            slot.effect.teardown();
        }
    }

    /// Whether the scope holds an effect labelled `label`.
    #[must_use]
    pub fn has(&self, label: &str) -> bool {
        self.slots.iter().any(|s| s.label == label)
    }

    /// Number of held effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the scope holds no effects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Drop for EffectScope {
    fn drop(&mut self) {
        self.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
