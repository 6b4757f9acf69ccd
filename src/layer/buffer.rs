//! TileBuffer - raster content of a layer.
//!
//! A 2D grid of [`Cell`]s with flat, row-major storage:
//! `index = y * width + x`. Coordinates are layer-local.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::types::{Cell, Position, Size};

// =============================================================================
// TileBuffer
// =============================================================================

/// A 2D buffer of tiles, transparent by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileBuffer {
    size: Size,
    cells: Vec<Cell>,
}

impl Default for TileBuffer {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl TileBuffer {
    /// Create a buffer filled with transparent cells.
    pub fn new(size: Size) -> Self {
        Self::filled(size, Cell::EMPTY)
    }

    /// Create a buffer filled with `cell`.
    pub fn filled(size: Size, cell: Cell) -> Self {
        Self {
            size,
            cells: vec![cell; size.area()],
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    fn index(&self, at: Position) -> Option<usize> {
        if self.size.contains(at) {
            Some(at.y as usize * self.size.width as usize + at.x as usize)
        } else {
            None
        }
    }

    /// Get a cell (None if out of bounds).
    #[inline]
    pub fn get(&self, at: Position) -> Option<&Cell> {
        self.index(at).map(|i| &self.cells[i])
    }

    /// Overwrite a cell. Returns false if out of bounds.
    pub fn set(&mut self, at: Position, cell: Cell) -> bool {
        match self.index(at) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Raw cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        let width = self.size.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let at = Position::new((i % width) as i32, (i / width) as i32);
            (at, cell)
        })
    }

    /// Fill every cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Reset every cell to transparent.
    pub fn clear(&mut self) {
        self.fill(Cell::EMPTY);
    }

    /// Write `text` starting at `at`, one glyph per tile, clipped to the row.
    ///
    /// Colors and attributes come from `style`. Returns the number of tiles
    /// written.
    pub fn write_str(&mut self, at: Position, text: &str, style: Cell) -> usize {
        let mut written = 0;
        for (offset, glyph) in text.chars().enumerate() {
            let pos = Position::new(at.x.saturating_add(offset as i32), at.y);
            if self.set(pos, Cell { glyph, ..style }) {
                written += 1;
            }
        }
        written
    }

    /// 64-bit digest of dimensions and content.
    ///
    /// Equal buffers always share a digest; used for change detection only.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn test_new_is_transparent() {
        let buffer = TileBuffer::new(Size::new(3, 2));
        assert_eq!(buffer.cells().len(), 6);
        assert!(buffer.cells().iter().all(Cell::is_transparent));
    }

    #[test]
    fn test_set_and_get() {
        let mut buffer = TileBuffer::new(Size::new(3, 2));
        assert!(buffer.set(Position::new(2, 1), Cell::glyph('@')));
        assert_eq!(buffer.get(Position::new(2, 1)).unwrap().glyph, '@');
        assert_eq!(buffer.cells()[5].glyph, '@');

        assert!(!buffer.set(Position::new(3, 0), Cell::glyph('x')));
        assert!(buffer.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_write_str_clips() {
        let mut buffer = TileBuffer::new(Size::new(4, 1));
        let style = Cell::glyph(' ').with_colors(Rgba::GREEN, Rgba::BLACK);
        assert_eq!(buffer.write_str(Position::new(1, 0), "hello", style), 3);

        let row: String = buffer.cells().iter().map(|c| c.glyph).collect();
        assert_eq!(row, " hel");
        assert_eq!(buffer.get(Position::new(1, 0)).unwrap().fg, Rgba::GREEN);
    }

    #[test]
    fn test_iter_coordinates() {
        let mut buffer = TileBuffer::new(Size::new(2, 2));
        buffer.set(Position::new(1, 1), Cell::glyph('z'));
        let found: Vec<Position> = buffer
            .iter()
            .filter(|(_, cell)| cell.glyph == 'z')
            .map(|(at, _)| at)
            .collect();
        assert_eq!(found, vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_digest_tracks_content() {
        let mut a = TileBuffer::new(Size::new(2, 2));
        let b = TileBuffer::new(Size::new(2, 2));
        assert_eq!(a.digest(), b.digest());

        a.set(Position::ZERO, Cell::glyph('#'));
        assert_ne!(a.digest(), b.digest());

        a.clear();
        assert_eq!(a.digest(), b.digest());

        // Same cell count, different shape
        let wide = TileBuffer::new(Size::new(4, 1));
        assert_ne!(wide.digest(), b.digest());
    }
}
