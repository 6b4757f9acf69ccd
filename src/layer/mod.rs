//! Layers - overlapping raster surfaces composited bottom to top.
//!
//! - [`TileBuffer`] - a layer's content
//! - [`Layer`] / [`LayerState`] / [`LayerMutation`] - one surface, its snapshot, its edits
//! - [`LayerStack`] - z-ordered membership and change diffing

mod buffer;
mod stack;
mod surface;

pub use buffer::*;
pub use stack::*;
pub use surface::*;
