#![forbid(unsafe_code)]

//! Lifecycle-scoped UI bindings.
//!
//! Each binding wraps one platform primitive — a timer, a listener, a piece
//! of local state — in the subscribe-on-mount / release-on-unmount shape:
//! construct it when the owning component mounts, feed it the component's
//! current inputs on every pass, and drop it on unmount. Teardown is
//! guaranteed on every exit path; input changes tear the old resource down
//! before the replacement is set up.

pub mod debounce;
pub mod input;
pub mod interval;
pub mod outside_click;

pub use debounce::{DEFAULT_DELAY, Debounced};
pub use input::BoundInput;
pub use interval::{DEFAULT_PERIOD, Interval};
pub use outside_click::OutsideClick;
