//! Focus System - Focus order and focused component
//!
//! [`FocusOrderList`] is a cyclic registry of focusable components:
//! - traversal order (attachment order unless reordered with `move_to`)
//! - `focused` signal (at most one focused component)
//! - Tab / Shift+Tab style cycling with `next` / `previous`
//!
//! The component tree keeps membership in sync with attach/detach. Focus
//! requests arriving on the bus are routed here by the session.
//!
//! # Example
//!
//! ```ignore
//! let mut focus = FocusOrderList::new();
//! focus.register(a);
//! focus.register(b);
//!
//! focus.request_focus(a)?;
//! assert_eq!(focus.next(), Some(b));
//! assert_eq!(focus.next(), Some(a)); // wraps
//! ```

use log::debug;
use spark_signals::{signal, Signal};

use crate::error::{CoreError, Result};
use crate::types::ComponentId;

// =============================================================================
// FOCUS ORDER LIST
// =============================================================================

/// Ordered, cyclic registry of focusable components.
pub struct FocusOrderList {
    entries: Vec<ComponentId>,
    focused: Signal<Option<ComponentId>>,
    wraps: bool,
}

impl Default for FocusOrderList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FocusOrderList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusOrderList")
            .field("entries", &self.entries)
            .field("focused", &self.focused())
            .field("wraps", &self.wraps)
            .finish()
    }
}

impl FocusOrderList {
    /// Create an empty, wrapping focus list.
    pub fn new() -> Self {
        Self::with_wrap(true)
    }

    /// Create an empty focus list. With `wraps == false`, traversal stops
    /// at either end instead of cycling.
    pub fn with_wrap(wraps: bool) -> Self {
        Self {
            entries: Vec::new(),
            focused: signal(None),
            wraps,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The currently focused component, if any.
    pub fn focused(&self) -> Option<ComponentId> {
        self.focused.get()
    }

    /// The focused-component signal, for effects and deriveds.
    ///
    /// Reading it does not borrow the list, so an effect tracking it stays
    /// valid while the list itself is being mutated.
    pub fn focused_signal(&self) -> Signal<Option<ComponentId>> {
        self.focused.clone()
    }

    /// Check if a specific component is focused.
    pub fn is_focused(&self, component: ComponentId) -> bool {
        self.focused() == Some(component)
    }

    /// Check if a component is registered.
    pub fn contains(&self, component: ComponentId) -> bool {
        self.entries.contains(&component)
    }

    /// Registered components in traversal order.
    pub fn entries(&self) -> &[ComponentId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Append a component to the traversal order.
    ///
    /// Idempotent: returns false if it was already registered.
    pub fn register(&mut self, component: ComponentId) -> bool {
        if self.contains(component) {
            return false;
        }
        self.entries.push(component);
        true
    }

    /// Remove a component from the traversal order.
    ///
    /// If it was focused, focus moves to the entry that followed it (or
    /// to none when the list becomes empty). Idempotent: returns false if
    /// it was not registered.
    pub fn unregister(&mut self, component: ComponentId) -> bool {
        let Some(pos) = self.position(component) else {
            return false;
        };
        self.entries.remove(pos);

        if self.is_focused(component) {
            let successor = if self.entries.is_empty() {
                None
            } else if pos < self.entries.len() {
                Some(self.entries[pos])
            } else if self.wraps {
                Some(self.entries[0])
            } else {
                self.entries.last().copied()
            };
            self.set_focus(successor);
        }
        true
    }

    /// Move a registered component to `index` in the traversal order.
    ///
    /// Out-of-range indices clamp to the end. Returns false if the
    /// component is not registered.
    pub fn move_to(&mut self, component: ComponentId, index: usize) -> bool {
        let Some(pos) = self.position(component) else {
            return false;
        };
        self.entries.remove(pos);
        let index = index.min(self.entries.len());
        self.entries.insert(index, component);
        true
    }

    // -------------------------------------------------------------------------
    // Focus handling
    // -------------------------------------------------------------------------

    /// Focus `component`, clearing focus from whatever held it.
    ///
    /// Fails with `NotFocusable` (and changes nothing) if the component is
    /// not registered.
    pub fn request_focus(&mut self, component: ComponentId) -> Result<()> {
        if !self.contains(component) {
            return Err(CoreError::NotFocusable(component));
        }
        self.set_focus(Some(component));
        Ok(())
    }

    /// Clear focus, but only if `component` is the one holding it.
    ///
    /// Returns true if focus was cleared.
    pub fn clear_focus(&mut self, component: ComponentId) -> bool {
        if self.is_focused(component) {
            self.set_focus(None);
            return true;
        }
        false
    }

    /// Move focus to the next entry and return it.
    ///
    /// With nothing focused, focuses the first entry. Returns `None` when
    /// the list is empty.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<ComponentId> {
        self.step(1)
    }

    /// Move focus to the previous entry and return it.
    ///
    /// With nothing focused, focuses the last entry. Returns `None` when
    /// the list is empty.
    pub fn previous(&mut self) -> Option<ComponentId> {
        self.step(-1)
    }

    /// Focus the first entry.
    pub fn focus_first(&mut self) -> Option<ComponentId> {
        let first = self.entries.first().copied();
        if first.is_some() {
            self.set_focus(first);
        }
        first
    }

    /// Focus the last entry.
    pub fn focus_last(&mut self) -> Option<ComponentId> {
        let last = self.entries.last().copied();
        if last.is_some() {
            self.set_focus(last);
        }
        last
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn position(&self, component: ComponentId) -> Option<usize> {
        self.entries.iter().position(|&c| c == component)
    }

    fn step(&mut self, direction: isize) -> Option<ComponentId> {
        if self.entries.is_empty() {
            return None;
        }

        let len = self.entries.len() as isize;
        let current = self.focused().and_then(|c| self.position(c));

        let target = match current {
            None if direction > 0 => 0,
            None => len - 1,
            Some(pos) => {
                let pos = pos as isize + direction;
                if self.wraps {
                    pos.rem_euclid(len)
                } else {
                    pos.clamp(0, len - 1)
                }
            }
        };

        let target = self.entries[target as usize];
        self.set_focus(Some(target));
        Some(target)
    }

    fn set_focus(&mut self, component: Option<ComponentId>) {
        let previous = self.focused();
        if previous == component {
            return;
        }
        debug!("focus {:?} -> {:?}", previous, component);
        self.focused.set(component);
    }
}

// =============================================================================
// TESTS
// =============================================================================
