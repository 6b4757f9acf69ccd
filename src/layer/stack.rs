//! Layer Stack - ordered raster layers with change diffing.
//!
//! Layers are kept in a total z-order (no ties). Compositing order is
//! ascending z: lowest drawn first, highest on top.
//!
//! Every mutation goes through [`LayerStack::mutate`] (or
//! [`LayerStack::edit`]), which compares the layer's new [`LayerState`]
//! with the last recorded one and only publishes `LayerChanged` when they
//! differ. Redundant redraw signals never reach the bus.
//!
//! # Example
//!
//! ```ignore
//! let mut stack = LayerStack::new(bus.clone(), ZOrderPolicy::Reject);
//! let id = stack.add_layer(Layer::with_size(Position::ZERO, Size::new(80, 24)), 0)?;
//! stack.mutate(id, LayerMutation::Fill(Cell::glyph('.')))?;   // LayerChanged
//! stack.mutate(id, LayerMutation::Fill(Cell::glyph('.')))?;   // suppressed
//!
//! for layer in stack.iter() {
//!     // bottom to top
//! }
//! ```

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::buffer::TileBuffer;
use super::surface::{Layer, LayerMutation, LayerState};
use crate::config::ZOrderPolicy;
use crate::error::{CoreError, Result};
use crate::event::{Emitter, Event, EventBus};
use crate::types::LayerId;

struct Entry {
    layer: Layer,
    z_order: i32,
    recorded: LayerState,
}

// =============================================================================
// LayerStack
// =============================================================================

/// Ordered collection of layers for one screen.
pub struct LayerStack {
    by_z: BTreeMap<i32, LayerId>,
    entries: HashMap<LayerId, Entry>,
    bus: EventBus,
    policy: ZOrderPolicy,
}

impl std::fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStack")
            .field("z_orders", &self.by_z)
            .field("policy", &self.policy)
            .finish()
    }
}

impl LayerStack {
    /// Create an empty stack publishing on `bus`.
    pub fn new(bus: EventBus, policy: ZOrderPolicy) -> Self {
        Self {
            by_z: BTreeMap::new(),
            entries: HashMap::new(),
            bus,
            policy,
        }
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Insert a layer at `z_order`. Publishes `LayerAdded`.
    ///
    /// With [`ZOrderPolicy::Reject`] an occupied slot fails with
    /// `DuplicateZOrder` and the stack is unchanged (the layer is dropped).
    /// With [`ZOrderPolicy::Shift`] the occupying run moves up by one.
    pub fn add_layer(&mut self, layer: Layer, z_order: i32) -> Result<LayerId> {
        if self.by_z.contains_key(&z_order) {
            match self.policy {
                ZOrderPolicy::Reject => return Err(CoreError::DuplicateZOrder(z_order)),
                ZOrderPolicy::Shift => self.shift_up_from(z_order)?,
            }
        }

        let id = layer.id();
        let recorded = layer.state();
        self.by_z.insert(z_order, id);
        self.entries.insert(
            id,
            Entry {
                layer,
                z_order,
                recorded,
            },
        );

        debug!("layer {:?} added at z={}", id, z_order);
        self.bus.publish(Event::LayerAdded {
            emitter: Emitter::from(id),
        });
        Ok(id)
    }

    /// Remove a layer and hand it back. Publishes `LayerRemoved`.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let entry = self.entries.remove(&id).ok_or(CoreError::LayerNotFound(id))?;
        self.by_z.remove(&entry.z_order);

        debug!("layer {:?} removed from z={}", id, entry.z_order);
        self.bus.publish(Event::LayerRemoved {
            emitter: Emitter::from(id),
        });
        Ok(entry.layer)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Apply a mutation and publish `LayerChanged` if the layer's state
    /// actually changed.
    ///
    /// Returns whether `LayerChanged` was published.
    pub fn mutate(&mut self, id: LayerId, mutation: LayerMutation) -> Result<bool> {
        let entry = self.entry_mut(id)?;
        entry.layer.apply(mutation);
        Ok(self.commit(id))
    }

    /// Edit the content buffer in place, then diff like [`mutate`](Self::mutate).
    pub fn edit<F>(&mut self, id: LayerId, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut TileBuffer),
    {
        let entry = self.entry_mut(id)?;
        edit(entry.layer.content_mut());
        Ok(self.commit(id))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.entries.get(&id).map(|e| &e.layer)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Z-order of a layer.
    pub fn z_order_of(&self, id: LayerId) -> Option<i32> {
        self.entries.get(&id).map(|e| e.z_order)
    }

    /// Check if a z-order slot is taken.
    pub fn is_occupied(&self, z_order: i32) -> bool {
        self.by_z.contains_key(&z_order)
    }

    /// The last state published (or recorded on insert) for a layer.
    pub fn state_of(&self, id: LayerId) -> Option<LayerState> {
        self.entries.get(&id).map(|e| e.recorded)
    }

    /// The topmost layer.
    pub fn top(&self) -> Option<&Layer> {
        self.iter().next_back()
    }

    /// Layers in compositing order, lowest z first.
    ///
    /// Lazy: walks the live stack, so calling it again after a mutation
    /// reflects the new membership.
    pub fn iter(&self) -> Layers<'_> {
        Layers {
            order: self.by_z.iter(),
            entries: &self.entries,
        }
    }

    /// Visible layers in compositing order.
    pub fn visible(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.iter().filter(|layer| layer.is_visible())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn entry_mut(&mut self, id: LayerId) -> Result<&mut Entry> {
        self.entries.get_mut(&id).ok_or(CoreError::LayerNotFound(id))
    }

    /// Diff against the recorded state and publish on change.
    fn commit(&mut self, id: LayerId) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };

        let state = entry.layer.state();
        if state == entry.recorded {
            debug!("layer {:?} unchanged, LayerChanged suppressed", id);
            return false;
        }
        entry.recorded = state;

        self.bus.publish(Event::LayerChanged {
            state,
            emitter: Emitter::from(id),
        });
        true
    }

    /// Move the contiguous run of occupied slots starting at `z_order` up by one.
    fn shift_up_from(&mut self, z_order: i32) -> Result<()> {
        let mut run = Vec::new();
        let mut current = z_order;
        while let Some(&id) = self.by_z.get(&current) {
            run.push((current, id));
            current = current
                .checked_add(1)
                .ok_or(CoreError::DuplicateZOrder(z_order))?;
        }

        for (old, id) in run.into_iter().rev() {
            self.by_z.remove(&old);
            self.by_z.insert(old + 1, id);
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.z_order = old + 1;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Iterator over a stack's layers in ascending z-order.
pub struct Layers<'a> {
    order: btree_map::Iter<'a, i32, LayerId>,
    entries: &'a HashMap<LayerId, Entry>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, id) = self.order.next()?;
        self.entries.get(id).map(|entry| &entry.layer)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl DoubleEndedIterator for Layers<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (_, id) = self.order.next_back()?;
        self.entries.get(id).map(|entry| &entry.layer)
    }
}

// `by_z` and `entries` always hold the same ids.
impl ExactSizeIterator for Layers<'_> {}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a Layer;
    type IntoIter = Layers<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
