//! Session configuration.
//!
//! Plain struct with defaults; override fields with struct update syntax
//! or the `with_*` builders:
//!
//! ```ignore
//! let config = SessionConfig {
//!     z_order_policy: ZOrderPolicy::Shift,
//!     ..Default::default()
//! };
//! ```

use crate::types::Position;

/// What [`LayerStack::add_layer`](crate::layer::LayerStack::add_layer) does
/// when the requested z-order is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZOrderPolicy {
    /// Fail with `DuplicateZOrder` and leave the stack unchanged.
    #[default]
    Reject,
    /// Shift the occupying layer (and any contiguous run above it) up by one.
    Shift,
}

/// Configuration for one UI session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Collision handling for layer z-orders.
    pub z_order_policy: ZOrderPolicy,
    /// Whether focus traversal wraps around at either end.
    pub focus_wraps: bool,
    /// Log every publish at `trace` level.
    pub trace_events: bool,
    /// Cursor position before anyone requests it.
    pub initial_cursor: Position,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            z_order_policy: ZOrderPolicy::Reject,
            focus_wraps: true,
            trace_events: false,
            initial_cursor: Position::ZERO,
        }
    }
}

impl SessionConfig {
    /// Set the z-order collision policy.
    pub fn with_z_order_policy(mut self, policy: ZOrderPolicy) -> Self {
        self.z_order_policy = policy;
        self
    }

    /// Enable or disable wrap-around focus traversal.
    pub fn with_focus_wraps(mut self, wraps: bool) -> Self {
        self.focus_wraps = wraps;
        self
    }

    /// Enable or disable per-publish trace logging.
    pub fn with_trace_events(mut self, trace: bool) -> Self {
        self.trace_events = trace;
        self
    }

    /// Set the initial cursor position.
    pub fn with_initial_cursor(mut self, position: Position) -> Self {
        self.initial_cursor = position;
        self
    }
}
