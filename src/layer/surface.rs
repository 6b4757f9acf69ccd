//! Layer - one raster surface of the grid, and its change-detection snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use super::buffer::TileBuffer;
use crate::types::{Cell, LayerId, Position, Size};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// Layer
// =============================================================================

/// A positioned, possibly hidden raster surface.
///
/// Owns its content exclusively. Not `Clone`, so a layer id can only ever
/// be in one stack.
#[derive(Debug, PartialEq, Eq)]
pub struct Layer {
    id: LayerId,
    position: Position,
    visible: bool,
    content: TileBuffer,
}

impl Layer {
    /// Create a visible layer at `position` with the given content.
    pub fn new(position: Position, content: TileBuffer) -> Self {
        Self {
            id: LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed)),
            position,
            visible: true,
            content,
        }
    }

    /// Create a visible, transparent layer of `size`.
    pub fn with_size(position: Position, size: Size) -> Self {
        Self::new(position, TileBuffer::new(size))
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Offset of the layer's top-left tile on the grid.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.content.size()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &TileBuffer {
        &self.content
    }

    /// Cell at a grid position (not layer-local), if covered by this layer.
    pub fn cell_at(&self, at: Position) -> Option<&Cell> {
        let local = Position::new(
            at.x.saturating_sub(self.position.x),
            at.y.saturating_sub(self.position.y),
        );
        self.content.get(local)
    }

    /// Snapshot of everything a renderer cares about.
    pub fn state(&self) -> LayerState {
        LayerState {
            layer: self.id,
            position: self.position,
            size: self.content.size(),
            visible: self.visible,
            content_digest: self.content.digest(),
        }
    }

    pub(crate) fn content_mut(&mut self) -> &mut TileBuffer {
        &mut self.content
    }

    pub(crate) fn apply(&mut self, mutation: LayerMutation) {
        match mutation {
            LayerMutation::MoveTo(position) => self.position = position,
            LayerMutation::MoveBy(delta) => self.position = self.position.offset(delta),
            LayerMutation::SetContent(content) => self.content = content,
            LayerMutation::SetCell { at, cell } => {
                self.content.set(at, cell);
            }
            LayerMutation::Fill(cell) => self.content.fill(cell),
            LayerMutation::Clear => self.content.clear(),
            LayerMutation::SetVisible(visible) => self.visible = visible,
        }
    }
}

// =============================================================================
// LayerMutation
// =============================================================================

/// A change to apply to a layer through the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerMutation {
    /// Move to an absolute grid position.
    MoveTo(Position),
    /// Move by a relative offset.
    MoveBy(Position),
    /// Replace the whole content.
    SetContent(TileBuffer),
    /// Overwrite one layer-local cell. Out-of-bounds writes change nothing.
    SetCell { at: Position, cell: Cell },
    /// Fill every cell.
    Fill(Cell),
    /// Reset every cell to transparent.
    Clear,
    /// Show or hide the layer.
    SetVisible(bool),
}

// =============================================================================
// LayerState
// =============================================================================

/// Immutable snapshot of a layer, compared by value to decide whether a
/// `LayerChanged` notification is warranted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerState {
    pub layer: LayerId,
    pub position: Position,
    pub size: Size,
    pub visible: bool,
    pub content_digest: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ids_unique() {
        let a = Layer::with_size(Position::ZERO, Size::new(1, 1));
        let b = Layer::with_size(Position::ZERO, Size::new(1, 1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_state_equal_for_equal_layers() {
        let mut layer = Layer::with_size(Position::new(1, 1), Size::new(2, 2));
        let before = layer.state();

        layer.apply(LayerMutation::Clear);
        assert_eq!(layer.state(), before);

        layer.apply(LayerMutation::MoveBy(Position::new(1, 0)));
        assert_ne!(layer.state(), before);
        assert_eq!(layer.position(), Position::new(2, 1));

        layer.apply(LayerMutation::MoveTo(Position::new(1, 1)));
        assert_eq!(layer.state(), before);
    }

    #[test]
    fn test_cell_at_uses_offset() {
        let mut layer = Layer::with_size(Position::new(5, 5), Size::new(2, 1));
        layer.apply(LayerMutation::SetCell {
            at: Position::new(1, 0),
            cell: Cell::glyph('k'),
        });

        assert_eq!(layer.cell_at(Position::new(6, 5)).unwrap().glyph, 'k');
        assert!(layer.cell_at(Position::new(1, 0)).is_none());
    }

    #[test]
    fn test_visibility_in_state() {
        let mut layer = Layer::with_size(Position::ZERO, Size::new(1, 1));
        assert!(layer.state().visible);
        layer.apply(LayerMutation::SetVisible(false));
        assert!(!layer.is_visible());
        assert!(!layer.state().visible);
    }
}
