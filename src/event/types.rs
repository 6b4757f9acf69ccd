//! Event types - the notifications carried by the bus.
//!
//! [`Event`] is a closed enum: one variant per notification, each carrying
//! an [`Emitter`]. Dispatch on it is exhaustive, so adding a variant is a
//! compile error everywhere it is matched.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::layer::LayerState;
use crate::types::{ComponentId, LayerId, Position, ScreenId};

// =============================================================================
// EMITTER
// =============================================================================

static NEXT_EMITTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source {
    Component(ComponentId),
    Layer(LayerId),
    Screen(ScreenId),
    Object(u64),
}

/// Opaque identity of whoever produced an event.
///
/// Only for provenance and debugging. The bus never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Emitter(Source);

impl Emitter {
    /// Allocate an identity not tied to any component, layer or screen.
    pub fn unique() -> Self {
        Self(Source::Object(NEXT_EMITTER.fetch_add(1, Ordering::Relaxed)))
    }

    /// The component this emitter stands for, if any.
    pub fn as_component(&self) -> Option<ComponentId> {
        match self.0 {
            Source::Component(id) => Some(id),
            _ => None,
        }
    }

    /// The layer this emitter stands for, if any.
    pub fn as_layer(&self) -> Option<LayerId> {
        match self.0 {
            Source::Layer(id) => Some(id),
            _ => None,
        }
    }

    /// The screen this emitter stands for, if any.
    pub fn as_screen(&self) -> Option<ScreenId> {
        match self.0 {
            Source::Screen(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ComponentId> for Emitter {
    fn from(id: ComponentId) -> Self {
        Self(Source::Component(id))
    }
}

impl From<LayerId> for Emitter {
    fn from(id: LayerId) -> Self {
        Self(Source::Layer(id))
    }
}

impl From<ScreenId> for Emitter {
    fn from(id: ScreenId) -> Self {
        Self(Source::Screen(id))
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// A single state change or request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The cursor is requested at `position`.
    RequestCursorAt { position: Position, emitter: Emitter },
    /// Focus is requested for `component`.
    RequestFocusFor { component: ComponentId, emitter: Emitter },
    /// Focus should be cleared from `component`.
    ClearFocus { component: ComponentId, emitter: Emitter },
    /// The cursor should be hidden.
    HideCursor { emitter: Emitter },
    /// A screen has been switched to.
    ScreenSwitch { screen_id: ScreenId, emitter: Emitter },
    /// A component changed position or size, attached or not.
    ComponentMoved { emitter: Emitter },
    /// `component` was added to `parent`.
    ComponentAdded {
        parent: ComponentId,
        component: ComponentId,
        emitter: Emitter,
    },
    /// `component` was removed from `parent`. Always follows `ComponentDetached`.
    ComponentRemoved {
        parent: ComponentId,
        component: ComponentId,
        emitter: Emitter,
    },
    /// `component` is being detached from `parent`. Always precedes `ComponentRemoved`.
    ComponentDetached {
        parent: ComponentId,
        component: ComponentId,
        emitter: Emitter,
    },
    /// A layer was added.
    LayerAdded { emitter: Emitter },
    /// A layer was removed.
    LayerRemoved { emitter: Emitter },
    /// A layer's observable state changed.
    LayerChanged { state: LayerState, emitter: Emitter },
}

impl Event {
    /// The variant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RequestCursorAt { .. } => EventKind::RequestCursorAt,
            Event::RequestFocusFor { .. } => EventKind::RequestFocusFor,
            Event::ClearFocus { .. } => EventKind::ClearFocus,
            Event::HideCursor { .. } => EventKind::HideCursor,
            Event::ScreenSwitch { .. } => EventKind::ScreenSwitch,
            Event::ComponentMoved { .. } => EventKind::ComponentMoved,
            Event::ComponentAdded { .. } => EventKind::ComponentAdded,
            Event::ComponentRemoved { .. } => EventKind::ComponentRemoved,
            Event::ComponentDetached { .. } => EventKind::ComponentDetached,
            Event::LayerAdded { .. } => EventKind::LayerAdded,
            Event::LayerRemoved { .. } => EventKind::LayerRemoved,
            Event::LayerChanged { .. } => EventKind::LayerChanged,
        }
    }

    /// Who produced this event.
    pub fn emitter(&self) -> Emitter {
        match *self {
            Event::RequestCursorAt { emitter, .. }
            | Event::RequestFocusFor { emitter, .. }
            | Event::ClearFocus { emitter, .. }
            | Event::HideCursor { emitter }
            | Event::ScreenSwitch { emitter, .. }
            | Event::ComponentMoved { emitter }
            | Event::ComponentAdded { emitter, .. }
            | Event::ComponentRemoved { emitter, .. }
            | Event::ComponentDetached { emitter, .. }
            | Event::LayerAdded { emitter }
            | Event::LayerRemoved { emitter }
            | Event::LayerChanged { emitter, .. } => emitter,
        }
    }
}

// =============================================================================
// KIND / MASK
// =============================================================================

/// Fieldless discriminant of [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RequestCursorAt,
    RequestFocusFor,
    ClearFocus,
    HideCursor,
    ScreenSwitch,
    ComponentMoved,
    ComponentAdded,
    ComponentRemoved,
    ComponentDetached,
    LayerAdded,
    LayerRemoved,
    LayerChanged,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 12] = [
        EventKind::RequestCursorAt,
        EventKind::RequestFocusFor,
        EventKind::ClearFocus,
        EventKind::HideCursor,
        EventKind::ScreenSwitch,
        EventKind::ComponentMoved,
        EventKind::ComponentAdded,
        EventKind::ComponentRemoved,
        EventKind::ComponentDetached,
        EventKind::LayerAdded,
        EventKind::LayerRemoved,
        EventKind::LayerChanged,
    ];

    /// The single-bit mask matching this kind.
    pub const fn mask(self) -> EventMask {
        match self {
            EventKind::RequestCursorAt => EventMask::REQUEST_CURSOR_AT,
            EventKind::RequestFocusFor => EventMask::REQUEST_FOCUS_FOR,
            EventKind::ClearFocus => EventMask::CLEAR_FOCUS,
            EventKind::HideCursor => EventMask::HIDE_CURSOR,
            EventKind::ScreenSwitch => EventMask::SCREEN_SWITCH,
            EventKind::ComponentMoved => EventMask::COMPONENT_MOVED,
            EventKind::ComponentAdded => EventMask::COMPONENT_ADDED,
            EventKind::ComponentRemoved => EventMask::COMPONENT_REMOVED,
            EventKind::ComponentDetached => EventMask::COMPONENT_DETACHED,
            EventKind::LayerAdded => EventMask::LAYER_ADDED,
            EventKind::LayerRemoved => EventMask::LAYER_REMOVED,
            EventKind::LayerChanged => EventMask::LAYER_CHANGED,
        }
    }
}

bitflags::bitflags! {
    /// Set of event kinds a subscriber is interested in.
    ///
    /// Combine with bitwise OR: `EventMask::LAYER_ADDED | EventMask::LAYER_REMOVED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        const REQUEST_CURSOR_AT = 1 << 0;
        const REQUEST_FOCUS_FOR = 1 << 1;
        const CLEAR_FOCUS = 1 << 2;
        const HIDE_CURSOR = 1 << 3;
        const SCREEN_SWITCH = 1 << 4;
        const COMPONENT_MOVED = 1 << 5;
        const COMPONENT_ADDED = 1 << 6;
        const COMPONENT_REMOVED = 1 << 7;
        const COMPONENT_DETACHED = 1 << 8;
        const LAYER_ADDED = 1 << 9;
        const LAYER_REMOVED = 1 << 10;
        const LAYER_CHANGED = 1 << 11;

        /// Cursor requests.
        const CURSOR = Self::REQUEST_CURSOR_AT.bits() | Self::HIDE_CURSOR.bits();
        /// Focus requests.
        const FOCUS = Self::REQUEST_FOCUS_FOR.bits() | Self::CLEAR_FOCUS.bits();
        /// Structural component notifications.
        const COMPONENT = Self::COMPONENT_MOVED.bits()
            | Self::COMPONENT_ADDED.bits()
            | Self::COMPONENT_REMOVED.bits()
            | Self::COMPONENT_DETACHED.bits();
        /// Layer notifications.
        const LAYER = Self::LAYER_ADDED.bits()
            | Self::LAYER_REMOVED.bits()
            | Self::LAYER_CHANGED.bits();
        /// Everything.
        const ALL = Self::CURSOR.bits()
            | Self::FOCUS.bits()
            | Self::SCREEN_SWITCH.bits()
            | Self::COMPONENT.bits()
            | Self::LAYER.bits();
    }
}

impl EventMask {
    /// Check if this mask matches the given kind.
    #[inline]
    pub fn matches(&self, kind: EventKind) -> bool {
        self.contains(kind.mask())
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        kind.mask()
    }
}
