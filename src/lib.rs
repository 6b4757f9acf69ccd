//! # tilegrid-core
//!
//! Coordination core for tile-grid UIs: the event bus plus the lifecycle
//! machinery that keeps widgets, raster layers, keyboard focus and the
//! cursor consistent with each other.
//!
//! Rendering, input polling, theming and tileset loading live outside this
//! crate. They subscribe to the events produced here and call the mutation
//! entry points.
//!
//! ## Architecture
//!
//! ```text
//!            attach / detach / move          add / remove / mutate
//!                      │                              │
//!               ComponentTree ──► FocusOrderList   LayerStack
//!                      │                              │
//!                      └──────────► EventBus ◄────────┘
//!                                      │
//!         ┌────────────────┬───────────┴──────┬──────────────────┐
//!   focus handler    cursor handler      renderer (ext)   accessibility (ext)
//!   FocusOrderList  CursorController
//! ```
//!
//! Everything runs on one thread. Event delivery is synchronous: `publish`
//! returns after every handler has run. A [`Session`] ties the pieces
//! together for one UI session.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, ids, tile cells
//! - [`event`] - Event enum, masks, emitter, bus
//! - [`tree`] - Components and the attachment state machine
//! - [`state`] - Focus order and cursor
//! - [`layer`] - Layers, snapshots, z-ordered stack
//! - [`session`] - Per-session context object
//! - [`config`] / [`error`] - Configuration and error types

pub mod config;
pub mod error;
pub mod event;
pub mod layer;
pub mod session;
pub mod state;
pub mod tree;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use types::*;

pub use config::{SessionConfig, ZOrderPolicy};
pub use error::{CoreError, Result};

pub use event::{Emitter, Event, EventBus, EventKind, EventMask, SubscriptionId};

pub use tree::{Component, ComponentKind, ComponentProps, ComponentTree};

pub use state::{CursorController, CursorState, FocusOrderList};

pub use layer::{Layer, LayerMutation, LayerStack, LayerState, Layers, TileBuffer};

pub use session::Session;
