//! Events - the typed notifications and the bus that carries them.
//!
//! - [`Event`] / [`EventKind`] / [`EventMask`] - what is published
//! - [`Emitter`] - opaque provenance attached to every event
//! - [`EventBus`] - per-session synchronous publish/subscribe

mod bus;
mod types;

pub use bus::*;
pub use types::*;
