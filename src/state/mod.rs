//! State Module - Session-wide interaction state
//!
//! - **Focus** - Focus order, Tab cycling, single focused component
//! - **Cursor** - Single active cursor position and visibility

mod cursor;
mod focus;

pub use cursor::*;
pub use focus::*;
