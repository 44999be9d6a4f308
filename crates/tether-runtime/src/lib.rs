#![forbid(unsafe_code)]

//! Runtime services for lifecycle-bound UI state.
//!
//! Everything here is single-threaded and event-loop-driven: services hand
//! out cheap shared handles (`Rc` inside), callbacks run on the caller's
//! thread while the host pumps the loop, and teardown is RAII — dropping a
//! guard or a scope releases the underlying timer or listener.

pub mod hub;
pub mod reactive;
pub mod scope;
pub mod timer;

pub use hub::{EventHub, HubSubscription};
pub use reactive::{Observable, Subscription};
pub use scope::{Cleanup, Deps, Effect, EffectScope};
pub use timer::{TimerId, TimerService};
