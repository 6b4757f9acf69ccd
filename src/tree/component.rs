//! Component - a node in the UI hierarchy.

use crate::types::{ComponentId, Position, Size};

/// Whether a component can own children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentKind {
    /// A leaf widget.
    #[default]
    Leaf,
    /// A component that owns an ordered list of children.
    Container,
}

/// Properties for creating a component.
///
/// All fields default, so only set what you need:
///
/// ```ignore
/// let id = tree.create(ComponentProps {
///     position: Position::new(1, 1),
///     focusable: true,
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentProps {
    pub position: Position,
    pub size: Size,
    pub focusable: bool,
    pub kind: ComponentKind,
}

impl ComponentProps {
    /// Props for an empty container of the given size.
    pub fn container(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            focusable: false,
            kind: ComponentKind::Container,
        }
    }

    /// Props for a leaf component.
    pub fn leaf(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            focusable: false,
            kind: ComponentKind::Leaf,
        }
    }

    /// Mark the component focusable.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }
}

/// A component as stored in the tree.
///
/// `parent` is a lookup back-reference only; ownership runs from the
/// container's `children` list downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) position: Position,
    pub(crate) size: Size,
    pub(crate) focusable: bool,
    pub(crate) kind: ComponentKind,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
}

impl Component {
    pub(crate) fn new(id: ComponentId, props: ComponentProps) -> Self {
        Self {
            id,
            position: props.position,
            size: props.size,
            focusable: props.focusable,
            kind: props.kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind == ComponentKind::Container
    }

    /// The container this component is attached to.
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Children in attachment order. Always empty for leaves.
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }
}
