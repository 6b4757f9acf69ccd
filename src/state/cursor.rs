//! Cursor Controller - the single active cursor
//!
//! Tracks one cursor position and visibility flag for the whole session.
//! Last writer wins: every `request_cursor_at` supersedes the previous one,
//! and only `hide_cursor` or a newer request changes the state.
//!
//! # State Query
//!
//! - [`CursorController::position`] - Current (retained) position
//! - [`CursorController::is_visible`] - Whether the cursor should be drawn
//! - [`CursorController::owner`] - Emitter of the last request

use log::debug;
use spark_signals::{signal, Signal};

use crate::event::Emitter;
use crate::types::Position;

// =============================================================================
// State
// =============================================================================

/// Snapshot of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// Last requested position. Kept while hidden.
    pub position: Position,
    /// Whether the cursor should be rendered.
    pub visible: bool,
    /// Who made the last request.
    pub owner: Option<Emitter>,
}

impl CursorState {
    /// Hidden cursor at `position` with no owner.
    pub const fn hidden_at(position: Position) -> Self {
        Self {
            position,
            visible: false,
            owner: None,
        }
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::hidden_at(Position::ZERO)
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Arbitrates the single active cursor. Never fails.
pub struct CursorController {
    state: Signal<CursorState>,
}

impl Default for CursorController {
    fn default() -> Self {
        Self::new(Position::ZERO)
    }
}

impl std::fmt::Debug for CursorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CursorController").field(&self.state()).finish()
    }
}

impl CursorController {
    /// Create a hidden cursor at `initial`.
    pub fn new(initial: Position) -> Self {
        Self {
            state: signal(CursorState::hidden_at(initial)),
        }
    }

    /// Move the cursor to `position` and show it.
    pub fn request_cursor_at(&self, position: Position, emitter: Emitter) {
        debug!("cursor at {:?} requested by {:?}", position, emitter);
        self.state.set(CursorState {
            position,
            visible: true,
            owner: Some(emitter),
        });
    }

    /// Hide the cursor, keeping its position.
    pub fn hide_cursor(&self, emitter: Emitter) {
        debug!("cursor hidden by {:?}", emitter);
        let current = self.state();
        self.state.set(CursorState {
            visible: false,
            owner: Some(emitter),
            ..current
        });
    }

    /// Current cursor snapshot.
    pub fn state(&self) -> CursorState {
        self.state.get()
    }

    /// The cursor state signal, for effects and deriveds.
    pub fn state_signal(&self) -> Signal<CursorState> {
        self.state.clone()
    }

    /// Retained cursor position.
    pub fn position(&self) -> Position {
        self.state().position
    }

    /// Whether the cursor should be drawn.
    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    /// Emitter of the last request, if any.
    pub fn owner(&self) -> Option<Emitter> {
        self.state().owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::effect;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> CursorController {
        crate::testing::init_logger();
        CursorController::default()
    }

    #[test]
    fn test_initial_state() {
        let cursor = setup();
        assert!(!cursor.is_visible());
        assert_eq!(cursor.position(), Position::ZERO);
        assert_eq!(cursor.owner(), None);

        let offset = CursorController::new(Position::new(3, 4));
        assert_eq!(offset.position(), Position::new(3, 4));
    }

    #[test]
    fn test_request_shows_cursor() {
        let cursor = setup();
        let emitter = Emitter::unique();

        cursor.request_cursor_at(Position::new(10, 20), emitter);
        assert!(cursor.is_visible());
        assert_eq!(cursor.position(), Position::new(10, 20));
        assert_eq!(cursor.owner(), Some(emitter));
    }

    #[test]
    fn test_last_writer_wins_and_hide_retains_position() {
        let cursor = setup();
        let first = Emitter::unique();
        let second = Emitter::unique();

        cursor.request_cursor_at(Position::new(1, 1), first);
        cursor.request_cursor_at(Position::new(2, 2), second);
        assert_eq!(cursor.owner(), Some(second));

        cursor.hide_cursor(first);
        assert!(!cursor.is_visible());
        assert_eq!(cursor.position(), Position::new(2, 2));
    }

    #[test]
    fn test_request_after_hide_reshows() {
        let cursor = setup();
        let emitter = Emitter::unique();

        cursor.hide_cursor(emitter);
        cursor.request_cursor_at(Position::new(5, 0), emitter);
        assert!(cursor.is_visible());
        assert_eq!(cursor.state().position, Position::new(5, 0));
    }

    #[test]
    fn test_state_signal_drives_effects() {
        let cursor = setup();
        let emitter = Emitter::unique();

        let runs = Rc::new(Cell::new(0));
        let visible = Rc::new(Cell::new(false));
        let (runs_clone, visible_clone) = (runs.clone(), visible.clone());
        let state = cursor.state_signal();
        let _effect = effect(move || {
            visible_clone.set(state.get().visible);
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        cursor.request_cursor_at(Position::new(4, 4), emitter);
        assert_eq!(runs.get(), 2);
        assert!(visible.get());

        cursor.hide_cursor(emitter);
        assert_eq!(runs.get(), 3);
        assert!(!visible.get());
    }
}
