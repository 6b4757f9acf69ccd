//! Shared test helpers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{Event, EventBus, EventKind};

/// Install a test logger once. Later calls are no-ops.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Record every event published on `bus`.
pub(crate) fn record(bus: &EventBus) -> Rc<RefCell<Vec<Event>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let events_clone = events.clone();
    bus.subscribe_all(move |event| events_clone.borrow_mut().push(event.clone()));
    events
}

/// Kinds of the recorded events, in publish order.
pub(crate) fn kinds(events: &Rc<RefCell<Vec<Event>>>) -> Vec<EventKind> {
    events.borrow().iter().map(Event::kind).collect()
}
