#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The host runtime translates whatever its backend produces (terminal mouse
//! reports, browser events, synthetic test input) into these types before
//! dispatch. Bindings only ever see this surface.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
    }
}

/// Which pointer button an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A pointer press/release at a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a primary-button event with no modifiers at `position`.
    #[must_use]
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the button.
    #[must_use]
    pub fn button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A change event from a text-bearing control.
///
/// Carries the control's full current text, not a delta — the accessor a
/// change handler reads to recompute its bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    text: String,
}

impl InputEvent {
    /// Create a change event carrying `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The control's current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Canonical event enum dispatched through the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A pointer button was pressed.
    PointerDown(PointerEvent),
    /// A pointer button was released.
    PointerUp(PointerEvent),
    /// A text-bearing control changed.
    Input(InputEvent),
}
