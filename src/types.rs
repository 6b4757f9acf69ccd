//! Core types for tilegrid-core.
//!
//! Geometry, identity handles and the tile cell that layer content is made of.
//! Everything here is a small `Copy` value type.

use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Geometry
// =============================================================================

/// A point on the tile grid.
///
/// Unconstrained: may be negative or past the grid edge. Clipping is the
/// renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// The origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by another one.
    #[inline]
    pub const fn offset(self, by: Position) -> Self {
        Self {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A size in tiles. Unsigned, so never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self { width: 0, height: 0 };

    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tiles covered.
    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if the size covers no tiles.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a grid-local position lies inside this size.
    #[inline]
    pub fn contains(&self, at: Position) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as u32) < self.width && (at.y as u32) < self.height
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

// =============================================================================
// Identity handles
// =============================================================================

/// Handle of a component inside a [`ComponentTree`](crate::tree::ComponentTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

impl ComponentId {
    /// Raw numeric value (for logging).
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle of a layer inside a [`LayerStack`](crate::layer::LayerStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

impl LayerId {
    /// Raw numeric value (for logging).
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a screen. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u64);

impl ScreenId {
    /// Allocate a fresh screen id.
    pub fn new() -> Self {
        Self(NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (for logging).
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
///
/// Alpha 255 = fully opaque, 0 = fully transparent. Layers are composited
/// by the renderer, so transparency only matters as data here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Glyph attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const CROSSED_OUT = 1 << 7;
    }
}

// =============================================================================
// Cell - one tile of layer content
// =============================================================================

/// A single tile.
///
/// A transparent cell (the default) lets lower layers show through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unicode scalar for the glyph.
    pub glyph: char,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Attribute flags.
    pub attrs: Attr,
}

impl Cell {
    /// A fully transparent, empty tile.
    pub const EMPTY: Self = Self {
        glyph: ' ',
        fg: Rgba::TRANSPARENT,
        bg: Rgba::TRANSPARENT,
        attrs: Attr::NONE,
    };

    /// A glyph with opaque white-on-black colors.
    pub const fn glyph(glyph: char) -> Self {
        Self {
            glyph,
            fg: Rgba::WHITE,
            bg: Rgba::BLACK,
            attrs: Attr::NONE,
        }
    }

    /// Replace the colors.
    pub const fn with_colors(mut self, fg: Rgba, bg: Rgba) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Replace the attributes.
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// Check if the tile contributes nothing when composited.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.fg.is_transparent() && self.bg.is_transparent()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_contains() {
        let size = Size::new(3, 2);
        assert!(size.contains(Position::new(0, 0)));
        assert!(size.contains(Position::new(2, 1)));
        assert!(!size.contains(Position::new(3, 0)));
        assert!(!size.contains(Position::new(0, 2)));
        assert!(!size.contains(Position::new(-1, 0)));
        assert_eq!(size.area(), 6);
        assert!(Size::new(0, 5).is_empty());
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(2, 3).offset(Position::new(-5, 1));
        assert_eq!(p, Position::new(-3, 4));
    }

    #[test]
    fn test_screen_ids_unique() {
        let a = ScreenId::new();
        let b = ScreenId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_cell_is_transparent() {
        assert!(Cell::default().is_transparent());
        assert!(!Cell::glyph('x').is_transparent());
        let styled = Cell::glyph('a').with_attrs(Attr::BOLD | Attr::UNDERLINE);
        assert!(styled.attrs.contains(Attr::BOLD));
    }
}
