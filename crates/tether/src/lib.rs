#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use tether_core as core;
    pub use tether_runtime as runtime;

    pub use tether_bindings::debounce::{DEFAULT_DELAY, Debounced};
    pub use tether_bindings::input::BoundInput;
    pub use tether_bindings::interval::{DEFAULT_PERIOD, Interval};

    pub use tether_core::clock::{Clock, LabClock};
    pub use tether_core::element::ElementRef;
    pub use tether_core::event::{Event, InputEvent, PointerEvent};
    pub use tether_core::geometry::{Point, Rect};
    pub use tether_runtime::deps;
    pub use tether_runtime::hub::EventHub;
    pub use tether_runtime::reactive::Observable;
    pub use tether_runtime::scope::{Deps, Effect, EffectScope};
    pub use tether_runtime::timer::TimerService;
}
