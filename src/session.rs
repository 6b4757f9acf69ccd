//! Session - one UI session's context object.
//!
//! Bundles the event bus, component tree, layer stack, focus order and
//! cursor for a single session. Nothing here is global: two sessions in the
//! same process never see each other's events.
//!
//! On construction the session subscribes the handlers that turn request
//! events into state changes:
//!
//! | Event              | Handled by                          |
//! |--------------------|-------------------------------------|
//! | `RequestFocusFor`  | [`FocusOrderList::request_focus`]   |
//! | `ClearFocus`       | [`FocusOrderList::clear_focus`]     |
//! | `RequestCursorAt`  | [`CursorController::request_cursor_at`] |
//! | `HideCursor`       | [`CursorController::hide_cursor`]   |
//! | `ScreenSwitch`     | active screen tracking              |
//!
//! Dropping the session (or calling [`Session::teardown`]) removes those
//! handlers again.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(SessionConfig::default());
//! let root = session.tree_mut().create(ComponentProps::container(Position::ZERO, Size::new(80, 24)));
//! let button = session.tree_mut().create(ComponentProps::leaf(Position::new(2, 2), Size::new(8, 1)).focusable());
//! session.tree_mut().attach(root, button)?;
//! session.request_focus(button);
//! assert_eq!(session.focus().focused(), Some(button));
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, warn};
use spark_signals::{signal, Signal};

use crate::config::SessionConfig;
use crate::event::{Emitter, Event, EventBus, EventMask, SubscriptionId};
use crate::layer::LayerStack;
use crate::state::{CursorController, CursorState, FocusOrderList};
use crate::tree::ComponentTree;
use crate::types::{ComponentId, Position, ScreenId};

// =============================================================================
// Session
// =============================================================================

/// Context object for one UI session.
pub struct Session {
    config: SessionConfig,
    bus: EventBus,
    tree: ComponentTree,
    layers: LayerStack,
    focus: Rc<RefCell<FocusOrderList>>,
    cursor: Rc<CursorController>,
    active_screen: Signal<Option<ScreenId>>,
    emitter: Emitter,
    subscriptions: Vec<SubscriptionId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("layers", &self.layers)
            .field("cursor", &self.cursor)
            .field("active_screen", &self.active_screen())
            .finish()
    }
}

impl Session {
    /// Create a session and wire its request handlers onto a fresh bus.
    pub fn new(config: SessionConfig) -> Self {
        let bus = EventBus::new();
        bus.set_trace_events(config.trace_events);

        let focus = Rc::new(RefCell::new(FocusOrderList::with_wrap(config.focus_wraps)));
        let cursor = Rc::new(CursorController::new(config.initial_cursor));
        let active_screen = signal(None);

        let tree = ComponentTree::new(bus.clone(), Rc::clone(&focus));
        let layers = LayerStack::new(bus.clone(), config.z_order_policy);

        let subscriptions = vec![
            subscribe_focus(&bus, Rc::clone(&focus)),
            subscribe_cursor(&bus, Rc::clone(&cursor)),
            subscribe_screen(&bus, active_screen.clone()),
        ];

        debug!("session created with {:?}", config);
        Self {
            config,
            bus,
            tree,
            layers,
            focus,
            cursor,
            active_screen,
            emitter: Emitter::unique(),
            subscriptions,
        }
    }

    /// Unsubscribe the session's handlers and drop it.
    pub fn teardown(self) {
        drop(self);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The session's bus. Clone it to subscribe from collaborators.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The emitter stamped on requests made through the session helpers.
    pub fn emitter(&self) -> Emitter {
        self.emitter
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    /// Borrow the focus order. Release it before mutating the tree.
    pub fn focus(&self) -> Ref<'_, FocusOrderList> {
        self.focus.borrow()
    }

    /// Mutably borrow the focus order (Tab handling, explicit reordering).
    pub fn focus_mut(&self) -> RefMut<'_, FocusOrderList> {
        self.focus.borrow_mut()
    }

    pub fn cursor(&self) -> &CursorController {
        &self.cursor
    }

    /// The screen most recently switched to.
    pub fn active_screen(&self) -> Option<ScreenId> {
        self.active_screen.get()
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    /// Focused component as a signal. Effects reading it never touch the
    /// focus order's `RefCell`.
    pub fn focused_signal(&self) -> Signal<Option<ComponentId>> {
        self.focus.borrow().focused_signal()
    }

    pub fn cursor_signal(&self) -> Signal<CursorState> {
        self.cursor.state_signal()
    }

    pub fn active_screen_signal(&self) -> Signal<Option<ScreenId>> {
        self.active_screen.clone()
    }

    // -------------------------------------------------------------------------
    // Requests (published on the bus)
    // -------------------------------------------------------------------------

    /// Publish `RequestFocusFor`. Ineligible targets are ignored.
    pub fn request_focus(&self, component: ComponentId) {
        self.bus.publish(Event::RequestFocusFor {
            component,
            emitter: self.emitter,
        });
    }

    /// Publish `ClearFocus`.
    pub fn clear_focus(&self, component: ComponentId) {
        self.bus.publish(Event::ClearFocus {
            component,
            emitter: self.emitter,
        });
    }

    /// Publish `RequestCursorAt`.
    pub fn request_cursor_at(&self, position: Position) {
        self.bus.publish(Event::RequestCursorAt {
            position,
            emitter: self.emitter,
        });
    }

    /// Publish `HideCursor`.
    pub fn hide_cursor(&self) {
        self.bus.publish(Event::HideCursor {
            emitter: self.emitter,
        });
    }

    /// Publish `ScreenSwitch` for `screen_id`.
    pub fn switch_screen(&self, screen_id: ScreenId) {
        self.bus.publish(Event::ScreenSwitch {
            screen_id,
            emitter: Emitter::from(screen_id),
        });
    }

    /// Move focus forward (Tab).
    pub fn focus_next(&self) -> Option<ComponentId> {
        self.focus.borrow_mut().next()
    }

    /// Move focus backward (Shift+Tab).
    pub fn focus_previous(&self) -> Option<ComponentId> {
        self.focus.borrow_mut().previous()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
        debug!("session torn down");
    }
}

// =============================================================================
// Request handlers
// =============================================================================

fn subscribe_focus(bus: &EventBus, focus: Rc<RefCell<FocusOrderList>>) -> SubscriptionId {
    bus.subscribe(EventMask::FOCUS, move |event| {
        let Ok(mut focus) = focus.try_borrow_mut() else {
            warn!("focus order busy, dropping {:?}", event.kind());
            return;
        };
        match *event {
            Event::RequestFocusFor { component, .. } => {
                if let Err(err) = focus.request_focus(component) {
                    debug!("ignoring focus request: {err}");
                }
            }
            Event::ClearFocus { component, .. } => {
                focus.clear_focus(component);
            }
            _ => {}
        }
    })
}

fn subscribe_cursor(bus: &EventBus, cursor: Rc<CursorController>) -> SubscriptionId {
    bus.subscribe(EventMask::CURSOR, move |event| match *event {
        Event::RequestCursorAt { position, emitter } => cursor.request_cursor_at(position, emitter),
        Event::HideCursor { emitter } => cursor.hide_cursor(emitter),
        _ => {}
    })
}

fn subscribe_screen(bus: &EventBus, active: Signal<Option<ScreenId>>) -> SubscriptionId {
    bus.subscribe(EventMask::SCREEN_SWITCH, move |event| {
        if let Event::ScreenSwitch { screen_id, .. } = *event {
            debug!("switched to screen {:?}", screen_id);
            active.set(Some(screen_id));
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================
