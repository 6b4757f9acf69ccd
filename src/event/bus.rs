//! Event Bus - synchronous publish/subscribe for one UI session
//!
//! Handler registry keyed by [`EventMask`]. Publishing runs every matching
//! handler to completion before returning.
//!
//! # API
//!
//! - `subscribe(mask, fn)` - Subscribe to every kind in a mask
//! - `on(kind, fn)` - Subscribe to a single kind
//! - `subscribe_all(fn)` - Subscribe to everything
//! - `unsubscribe(id)` - Remove a subscription
//! - `publish(event)` - Deliver an event
//!
//! # Re-entrancy
//!
//! `publish` snapshots the matching handlers before calling any of them.
//! Handlers may subscribe, unsubscribe or publish from inside their body:
//!
//! - a handler removed mid-dispatch still sees the event it was snapshotted for
//! - a handler added mid-dispatch only sees later events
//! - a nested publish is delivered completely before the outer one resumes
//!
//! A handler that panics is logged and skipped; the rest of the snapshot
//! still runs.
//!
//! # Example
//!
//! ```ignore
//! let bus = EventBus::new();
//! let id = bus.subscribe(EventMask::LAYER, |event| {
//!     println!("redraw after {:?}", event.kind());
//! });
//! bus.publish(Event::LayerAdded { emitter: Emitter::unique() });
//! bus.unsubscribe(id);
//! ```

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::{error, trace};

use super::types::{Event, EventKind, EventMask};

// =============================================================================
// TYPES
// =============================================================================

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&Event)>;

struct Subscription {
    id: SubscriptionId,
    mask: EventMask,
    handler: Handler,
}

struct BusInner {
    subscribers: Vec<Subscription>,
    next_id: u64,
    trace_events: bool,
}

impl BusInner {
    fn next_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

// =============================================================================
// EVENT BUS
// =============================================================================

/// Shared handle to a session's event bus.
///
/// Cloning is cheap; every clone talks to the same subscriber list.
/// Not thread-safe: callers on other threads must serialize access
/// through the UI thread.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                subscribers: Vec::new(),
                next_id: 0,
                trace_events: false,
            })),
        }
    }

    /// Enable or disable `trace` logging of every publish.
    pub fn set_trace_events(&self, enabled: bool) {
        self.inner.borrow_mut().trace_events = enabled;
    }

    /// Subscribe to every kind contained in `mask`.
    pub fn subscribe<F>(&self, mask: EventMask, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.subscribers.push(Subscription {
            id,
            mask,
            handler: Rc::new(handler),
        });
        id
    }

    /// Subscribe to a single kind.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + 'static,
    {
        self.subscribe(kind.mask(), handler)
    }

    /// Subscribe to every event.
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + 'static,
    {
        self.subscribe(EventMask::ALL, handler)
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|sub| sub.id != id);
        inner.subscribers.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Deliver an event to every matching subscriber, in subscription order.
    ///
    /// Returns the number of handlers invoked. Events nobody listens to are
    /// dropped; the bus keeps no history.
    pub fn publish(&self, event: Event) -> usize {
        let kind = event.kind();

        // Snapshot, then release the borrow before running any handler
        let (snapshot, trace_events) = {
            let inner = self.inner.borrow();
            let snapshot: Vec<Handler> = inner
                .subscribers
                .iter()
                .filter(|sub| sub.mask.matches(kind))
                .map(|sub| Rc::clone(&sub.handler))
                .collect();
            (snapshot, inner.trace_events)
        };

        if trace_events {
            trace!("publish {:?} to {} subscriber(s)", kind, snapshot.len());
        }

        for handler in &snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&event)));
            if outcome.is_err() {
                error!("event handler panicked while handling {:?}", kind);
            }
        }

        snapshot.len()
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
