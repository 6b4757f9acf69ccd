//! Error types for tilegrid-core.
//!
//! Every error is local to the mutating call that produced it. A failed
//! call leaves the tree or stack untouched and publishes nothing.

use thiserror::Error;

use crate::types::{ComponentId, LayerId};

/// Errors produced by the mutation entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The component already has a parent container.
    #[error("component {component:?} is already attached to {parent:?}")]
    AlreadyAttached {
        component: ComponentId,
        parent: ComponentId,
    },

    /// The component is not a child of the given container.
    #[error("component {component:?} is not a child of {container:?}")]
    NotAChild {
        container: ComponentId,
        component: ComponentId,
    },

    /// Focus was requested for a component that is not registered as focusable.
    #[error("component {0:?} is not focusable")]
    NotFocusable(ComponentId),

    /// A layer already occupies the requested z-order.
    #[error("z-order {0} is already occupied")]
    DuplicateZOrder(i32),

    /// The layer is not part of the stack.
    #[error("layer {0:?} not found")]
    LayerNotFound(LayerId),

    /// The component is unknown to the tree.
    #[error("component {0:?} not found")]
    ComponentNotFound(ComponentId),

    /// The attach target is a leaf component.
    #[error("component {0:?} is not a container")]
    NotAContainer(ComponentId),

    /// Attaching would make a component its own ancestor.
    #[error("attaching {component:?} under {container:?} would create a cycle")]
    CyclicAttachment {
        container: ComponentId,
        component: ComponentId,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
