//! End-to-end exercise of every binding through one component's life.
//!
//! Models a search panel: a text field whose value is debounced into a
//! query, a refresh ticker, and dismiss-on-outside-click. The test drives
//! the full mount → interact → update → unmount cycle on a lab clock and
//! verifies that teardown releases every timer and listener.

use std::cell::Cell;
use std::rc::Rc;

use web_time::Duration;

use tether_bindings::debounce::Debounced;
use tether_bindings::input::BoundInput;
use tether_bindings::interval::Interval;
use tether_bindings::outside_click::OutsideClick;
use tether_core::clock::{Clock, LabClock};
use tether_core::element::ElementRef;
use tether_core::event::{Event, InputEvent, PointerEvent};
use tether_core::geometry::{Point, Rect};
use tether_runtime::deps;
use tether_runtime::hub::EventHub;
use tether_runtime::timer::TimerService;

const DEBOUNCE: Duration = Duration::from_millis(100);
const REFRESH: Duration = Duration::from_millis(1000);

struct SearchPanel {
    field: BoundInput<String>,
    query: Debounced<String>,
    refresh: Interval,
    dismiss: OutsideClick,
    area: ElementRef,
    open: Rc<Cell<bool>>,
    refreshes: Rc<Cell<u32>>,
}

impl SearchPanel {
    fn mount(timers: &TimerService, hub: &EventHub) -> Self {
        let area = ElementRef::mounted(Rect::new(10, 5, 40, 12));
        let open = Rc::new(Cell::new(true));
        let refreshes = Rc::new(Cell::new(0));

        let o = Rc::clone(&open);
        let dismiss = OutsideClick::new(hub, area.clone(), move || o.set(false));

        let mut panel = Self {
            field: BoundInput::new(String::new(), |raw: &str| raw.trim().to_lowercase()),
            query: Debounced::with_delay(timers, String::new(), DEBOUNCE),
            refresh: Interval::new(timers),
            dismiss,
            area,
            open,
            refreshes,
        };
        panel.update();
        panel
    }

    /// One pass of the component: push current inputs into every binding.
    fn update(&mut self) {
        self.query.set(self.field.value());

        let callback: Option<Rc<dyn Fn()>> = if self.open.get() {
            let refreshes = Rc::clone(&self.refreshes);
            Some(Rc::new(move || refreshes.set(refreshes.get() + 1)))
        } else {
            None
        };
        self.refresh.sync(callback, REFRESH, deps!(self.open.get()));
        self.dismiss.set_enabled(self.open.get());
    }

    fn type_text(&mut self, text: &str) {
        self.field.on_change(&InputEvent::new(text));
        self.update();
    }
}

fn pointer_down(x: u16, y: u16) -> Event {
    Event::PointerDown(PointerEvent::new(Point::new(x, y)))
}

#[test]
fn full_component_lifecycle() {
    let lab = LabClock::new();
    let timers = TimerService::new(Clock::lab(&lab));
    let hub = EventHub::new();

    let mut panel = SearchPanel::mount(&timers, &hub);
    assert!(panel.open.get());
    assert_eq!(hub.listener_count(), 1);

    // Typing: the field formats eagerly, the query debounces.
    panel.type_text("  Rust  ");
    assert_eq!(panel.field.value(), "rust");
    assert_eq!(panel.query.get(), "", "still inside the quiet window");

    panel.type_text("  Rust TUI ");
    lab.advance(DEBOUNCE);
    timers.pump();
    assert_eq!(panel.query.get(), "rust tui");

    // The refresh ticker runs while the panel is open.
    lab.advance(REFRESH);
    timers.pump();
    lab.advance(REFRESH);
    timers.pump();
    assert_eq!(panel.refreshes.get(), 2);

    // Clicking inside does not dismiss; clicking outside does.
    hub.emit(&pointer_down(20, 10));
    assert!(panel.open.get());
    hub.emit(&pointer_down(0, 0));
    assert!(!panel.open.get());

    // The next pass reacts to the closed state: ticker off, gate off.
    panel.update();
    assert!(!panel.refresh.is_running());
    lab.advance(REFRESH);
    timers.pump();
    assert_eq!(panel.refreshes.get(), 2, "no refresh while closed");

    // Further outside clicks are gated off.
    hub.emit(&pointer_down(0, 0));
    assert!(!panel.open.get());

    // Unmount: every timer and listener is released.
    panel.area.clear();
    drop(panel);
    assert_eq!(timers.pending(), 0);
    assert_eq!(hub.listener_count(), 0);
}

#[test]
fn reopening_restarts_ticker_and_gate() {
    let lab = LabClock::new();
    let timers = TimerService::new(Clock::lab(&lab));
    let hub = EventHub::new();

    let mut panel = SearchPanel::mount(&timers, &hub);
    hub.emit(&pointer_down(0, 0));
    panel.update();
    assert!(!panel.refresh.is_running());

    panel.open.set(true);
    panel.update();
    assert!(panel.refresh.is_running());

    lab.advance(REFRESH);
    timers.pump();
    assert_eq!(panel.refreshes.get(), 1);

    hub.emit(&pointer_down(0, 0));
    assert!(!panel.open.get(), "gate re-armed after reopen");
}

#[test]
fn debounce_pending_at_unmount_never_publishes() {
    let lab = LabClock::new();
    let timers = TimerService::new(Clock::lab(&lab));
    let hub = EventHub::new();

    let mut panel = SearchPanel::mount(&timers, &hub);
    let publishes = Rc::new(Cell::new(0u32));
    let p = Rc::clone(&publishes);
    let sub = panel.query.subscribe(move |_| p.set(p.get() + 1));

    panel.type_text("doomed");
    drop(panel);

    lab.advance(Duration::from_secs(10));
    timers.pump();
    assert_eq!(publishes.get(), 0);
    drop(sub);
}
