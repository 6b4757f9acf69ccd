//! Component tree - parent/child ownership of UI components.
//!
//! Components are handles ([`ComponentId`](crate::types::ComponentId)) into
//! an arena owned by [`ComponentTree`]. Containers own an ordered child list;
//! a child's `parent` is only a back-reference used for lookup.

mod component;
mod component_tree;

pub use component::*;
pub use component_tree::*;
