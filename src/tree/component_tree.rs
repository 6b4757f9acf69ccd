//! Component Tree - attachment state machine.
//!
//! Owns every component created for a session and the parent/child links
//! between them:
//! - single ownership: a component has at most one parent
//! - `ComponentDetached` is always published before `ComponentRemoved`
//! - focusable components join the focus order on attach and leave it on detach
//! - detaching a container detaches its subtree first, bottom-up
//!
//! # Lifecycle
//!
//! ```text
//! create ──► (detached) ──attach──► (attached) ──detach──► (detached, childless)
//!                 │                      │
//!                 └────────remove────────┴──► dropped (children first)
//! ```
//!
//! Event handlers run while the tree is mutably borrowed, so a handler must
//! not call back into the tree. Renderers should mark themselves dirty and
//! read the tree on their next frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use super::component::{Component, ComponentProps};
use crate::error::{CoreError, Result};
use crate::event::{Emitter, Event, EventBus};
use crate::state::FocusOrderList;
use crate::types::{ComponentId, Position, Size};

// =============================================================================
// Component Tree
// =============================================================================

/// Arena of components plus their parent/child links.
pub struct ComponentTree {
    nodes: HashMap<ComponentId, Component>,
    next_id: u64,
    bus: EventBus,
    focus: Rc<RefCell<FocusOrderList>>,
    emitter: Emitter,
}

impl std::fmt::Debug for ComponentTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTree")
            .field("components", &self.nodes.len())
            .field("emitter", &self.emitter)
            .finish()
    }
}

impl ComponentTree {
    /// Create an empty tree publishing on `bus` and keeping `focus` in sync.
    pub fn new(bus: EventBus, focus: Rc<RefCell<FocusOrderList>>) -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
            bus,
            focus,
            emitter: Emitter::unique(),
        }
    }

    /// The emitter stamped on structural events.
    pub fn emitter(&self) -> Emitter {
        self.emitter
    }

    /// The focus order this tree maintains.
    pub fn focus_list(&self) -> Rc<RefCell<FocusOrderList>> {
        Rc::clone(&self.focus)
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Create a detached component.
    pub fn create(&mut self, props: ComponentProps) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Component::new(id, props));
        id
    }

    // -------------------------------------------------------------------------
    // Attach / Detach
    // -------------------------------------------------------------------------

    /// Attach `component` as the last child of `container`.
    ///
    /// Publishes `ComponentAdded`. On error nothing changes and nothing
    /// is published.
    pub fn attach(&mut self, container: ComponentId, component: ComponentId) -> Result<()> {
        let target = self.node(container)?;
        let is_container = target.is_container();
        let child = self.node(component)?;

        if let Some(parent) = child.parent {
            return Err(CoreError::AlreadyAttached { component, parent });
        }
        if !is_container {
            return Err(CoreError::NotAContainer(container));
        }
        if component == container || self.is_ancestor(component, container) {
            return Err(CoreError::CyclicAttachment {
                container,
                component,
            });
        }

        let focusable = child.focusable;
        self.node_mut(component)?.parent = Some(container);
        self.node_mut(container)?.children.push(component);
        if focusable {
            self.focus.borrow_mut().register(component);
        }

        debug!("attached {:?} to {:?}", component, container);
        self.bus.publish(Event::ComponentAdded {
            parent: container,
            component,
            emitter: self.emitter,
        });
        Ok(())
    }

    /// Detach `component` from `container`.
    ///
    /// The component's own children are detached from it first, depth-first,
    /// so nothing below a detached node stays linked or focusable. Each level
    /// publishes `ComponentDetached` while its link still exists, unlinks,
    /// leaves the focus order, then publishes `ComponentRemoved`.
    pub fn detach(&mut self, container: ComponentId, component: ComponentId) -> Result<()> {
        self.node(container)?;
        if self.node(component)?.parent != Some(container) {
            return Err(CoreError::NotAChild {
                container,
                component,
            });
        }

        self.detach_children(component)?;

        self.bus.publish(Event::ComponentDetached {
            parent: container,
            component,
            emitter: self.emitter,
        });

        self.node_mut(container)?.children.retain(|&c| c != component);
        self.node_mut(component)?.parent = None;
        self.focus.borrow_mut().unregister(component);

        debug!("detached {:?} from {:?}", component, container);
        self.bus.publish(Event::ComponentRemoved {
            parent: container,
            component,
            emitter: self.emitter,
        });
        Ok(())
    }

    /// Remove `component` and its whole subtree from the tree.
    ///
    /// Detaches the subtree bottom-up (see [`detach`](Self::detach)), then
    /// drops every node of it from the arena.
    pub fn remove(&mut self, component: ComponentId) -> Result<()> {
        let subtree = self.descendants_of(component);

        match self.node(component)?.parent {
            Some(parent) => self.detach(parent, component)?,
            None => self.detach_children(component)?,
        }

        let mut focus = self.focus.borrow_mut();
        for id in subtree.into_iter().chain(std::iter::once(component)) {
            focus.unregister(id);
            self.nodes.remove(&id);
        }
        debug!("removed {:?}", component);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Move a component. Publishes `ComponentMoved`.
    pub fn move_to(&mut self, component: ComponentId, position: Position) -> Result<()> {
        self.node_mut(component)?.position = position;
        self.bus.publish(Event::ComponentMoved {
            emitter: Emitter::from(component),
        });
        Ok(())
    }

    /// Resize a component. Publishes `ComponentMoved`.
    pub fn resize(&mut self, component: ComponentId, size: Size) -> Result<()> {
        self.node_mut(component)?.size = size;
        self.bus.publish(Event::ComponentMoved {
            emitter: Emitter::from(component),
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, component: ComponentId) -> Option<&Component> {
        self.nodes.get(&component)
    }

    pub fn contains(&self, component: ComponentId) -> bool {
        self.nodes.contains_key(&component)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a component, if attached.
    pub fn parent_of(&self, component: ComponentId) -> Option<ComponentId> {
        self.nodes.get(&component).and_then(|c| c.parent)
    }

    /// Children of a component in attachment order (empty if unknown).
    pub fn children_of(&self, component: ComponentId) -> &[ComponentId] {
        self.nodes
            .get(&component)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every descendant, depth-first pre-order.
    pub fn descendants_of(&self, component: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack: Vec<ComponentId> = self.children_of(component).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev().copied());
        }
        out
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn detach_children(&mut self, container: ComponentId) -> Result<()> {
        let children = self.node(container)?.children.clone();
        for child in children {
            self.detach(container, child)?;
        }
        Ok(())
    }

    fn node(&self, component: ComponentId) -> Result<&Component> {
        self.nodes
            .get(&component)
            .ok_or(CoreError::ComponentNotFound(component))
    }

    fn node_mut(&mut self, component: ComponentId) -> Result<&mut Component> {
        self.nodes
            .get_mut(&component)
            .ok_or(CoreError::ComponentNotFound(component))
    }

    /// Check if `ancestor` appears on the parent chain of `of`.
    fn is_ancestor(&self, ancestor: ComponentId, of: ComponentId) -> bool {
        let mut current = self.parent_of(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::testing::{self, kinds, record};
    use crate::tree::ComponentKind;

    fn setup() -> (ComponentTree, EventBus) {
        testing::init_logger();
        let bus = EventBus::new();
        let focus = Rc::new(RefCell::new(FocusOrderList::new()));
        (ComponentTree::new(bus.clone(), focus), bus)
    }

    fn container(tree: &mut ComponentTree) -> ComponentId {
        tree.create(ComponentProps::container(Position::ZERO, Size::new(10, 10)))
    }

    fn focusable(tree: &mut ComponentTree) -> ComponentId {
        tree.create(ComponentProps::leaf(Position::ZERO, Size::new(1, 1)).focusable())
    }

    #[test]
    fn test_create_starts_detached() {
        let (mut tree, _) = setup();
        let id = tree.create(ComponentProps {
            position: Position::new(2, 3),
            size: Size::new(4, 1),
            ..Default::default()
        });

        let component = tree.get(id).unwrap();
        assert_eq!(component.parent(), None);
        assert_eq!(component.position(), Position::new(2, 3));
        assert_eq!(component.kind(), ComponentKind::Leaf);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_attach_detach_scenario() {
        let (mut tree, bus) = setup();
        let events = record(&bus);
        let c = container(&mut tree);
        let x = focusable(&mut tree);

        tree.attach(c, x).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![Event::ComponentAdded {
                parent: c,
                component: x,
                emitter: tree.emitter(),
            }]
        );
        assert_eq!(tree.focus_list().borrow().entries(), &[x]);

        tree.focus_list().borrow_mut().request_focus(x).unwrap();
        assert_eq!(tree.focus_list().borrow().focused(), Some(x));

        events.borrow_mut().clear();
        tree.detach(c, x).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                Event::ComponentDetached {
                    parent: c,
                    component: x,
                    emitter: tree.emitter(),
                },
                Event::ComponentRemoved {
                    parent: c,
                    component: x,
                    emitter: tree.emitter(),
                },
            ]
        );

        assert_eq!(tree.parent_of(x), None);
        assert!(tree.children_of(c).is_empty());
        assert!(tree.focus_list().borrow().is_empty());
        assert_eq!(tree.focus_list().borrow().focused(), None);
    }

    #[test]
    fn test_detached_published_while_still_linked() {
        let (mut tree, bus) = setup();
        let c = container(&mut tree);
        let x = focusable(&mut tree);
        tree.attach(c, x).unwrap();

        // Snapshot focus membership at the time each event is seen
        let focus = tree.focus_list();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        bus.subscribe(
            EventKind::ComponentDetached.mask() | EventKind::ComponentRemoved.mask(),
            move |event| {
                let registered = focus.borrow().contains(x);
                seen_clone.borrow_mut().push((event.kind(), registered));
            },
        );

        tree.detach(c, x).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (EventKind::ComponentDetached, true),
                (EventKind::ComponentRemoved, false),
            ]
        );
    }

    #[test]
    fn test_attach_already_attached() {
        let (mut tree, bus) = setup();
        let a = container(&mut tree);
        let b = container(&mut tree);
        let x = focusable(&mut tree);
        tree.attach(a, x).unwrap();

        let events = record(&bus);
        let err = tree.attach(b, x).unwrap_err();
        assert_eq!(
            err,
            CoreError::AlreadyAttached {
                component: x,
                parent: a
            }
        );
        assert!(events.borrow().is_empty());
        assert_eq!(tree.parent_of(x), Some(a));
        assert!(tree.children_of(b).is_empty());

        // Re-attaching to the same parent also violates single ownership
        assert!(tree.attach(a, x).is_err());
        assert_eq!(tree.children_of(a), &[x]);
    }

    #[test]
    fn test_attach_to_leaf() {
        let (mut tree, bus) = setup();
        let leaf = focusable(&mut tree);
        let x = focusable(&mut tree);

        let events = record(&bus);
        assert_eq!(tree.attach(leaf, x), Err(CoreError::NotAContainer(leaf)));
        assert!(events.borrow().is_empty());
        assert!(tree.focus_list().borrow().is_empty());
    }

    #[test]
    fn test_attach_cycle_rejected() {
        let (mut tree, _) = setup();
        let outer = container(&mut tree);
        let inner = container(&mut tree);
        tree.attach(outer, inner).unwrap();

        assert!(matches!(
            tree.attach(inner, outer),
            Err(CoreError::CyclicAttachment { .. })
        ));
        assert!(matches!(
            tree.attach(outer, outer),
            Err(CoreError::CyclicAttachment { .. })
        ));
    }

    #[test]
    fn test_attach_unknown_component() {
        let (mut tree, _) = setup();
        let c = container(&mut tree);
        let ghost = ComponentId(999);
        assert_eq!(tree.attach(c, ghost), Err(CoreError::ComponentNotFound(ghost)));
        assert_eq!(tree.attach(ghost, c), Err(CoreError::ComponentNotFound(ghost)));
    }

    #[test]
    fn test_detach_not_a_child() {
        let (mut tree, bus) = setup();
        let a = container(&mut tree);
        let b = container(&mut tree);
        let x = focusable(&mut tree);
        tree.attach(a, x).unwrap();

        let events = record(&bus);
        assert_eq!(
            tree.detach(b, x),
            Err(CoreError::NotAChild {
                container: b,
                component: x
            })
        );
        assert!(events.borrow().is_empty());
        assert_eq!(tree.parent_of(x), Some(a));
        assert!(tree.focus_list().borrow().contains(x));
    }

    #[test]
    fn test_non_focusable_not_registered() {
        let (mut tree, _) = setup();
        let c = container(&mut tree);
        let label = tree.create(ComponentProps::leaf(Position::ZERO, Size::new(5, 1)));

        tree.attach(c, label).unwrap();
        assert!(tree.focus_list().borrow().is_empty());
    }

    #[test]
    fn test_focus_order_follows_attachment() {
        let (mut tree, _) = setup();
        let c = container(&mut tree);
        let ids: Vec<ComponentId> = (0..3).map(|_| focusable(&mut tree)).collect();
        for &id in &ids {
            tree.attach(c, id).unwrap();
        }
        assert_eq!(tree.focus_list().borrow().entries(), &ids[..]);

        // Re-attaching puts the component at the end
        tree.detach(c, ids[0]).unwrap();
        tree.attach(c, ids[0]).unwrap();
        assert_eq!(
            tree.focus_list().borrow().entries(),
            &[ids[1], ids[2], ids[0]]
        );
        assert_eq!(tree.children_of(c), &[ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_remove_cascades_children_first() {
        let (mut tree, bus) = setup();
        let root = container(&mut tree);
        let panel = container(&mut tree);
        let a = focusable(&mut tree);
        let b = focusable(&mut tree);
        tree.attach(root, panel).unwrap();
        tree.attach(panel, a).unwrap();
        tree.attach(panel, b).unwrap();

        let events = record(&bus);
        tree.remove(panel).unwrap();

        let pairs: Vec<(EventKind, ComponentId, ComponentId)> = events
            .borrow()
            .iter()
            .map(|event| match *event {
                Event::ComponentDetached {
                    parent, component, ..
                } => (EventKind::ComponentDetached, parent, component),
                Event::ComponentRemoved {
                    parent, component, ..
                } => (EventKind::ComponentRemoved, parent, component),
                ref other => panic!("unexpected {other:?}"),
            })
            .collect();

        assert_eq!(
            pairs,
            vec![
                (EventKind::ComponentDetached, panel, a),
                (EventKind::ComponentRemoved, panel, a),
                (EventKind::ComponentDetached, panel, b),
                (EventKind::ComponentRemoved, panel, b),
                (EventKind::ComponentDetached, root, panel),
                (EventKind::ComponentRemoved, root, panel),
            ]
        );

        assert!(!tree.contains(panel));
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.children_of(root).is_empty());
        assert!(tree.focus_list().borrow().is_empty());
    }

    #[test]
    fn test_detach_container_cascades_to_subtree() {
        let (mut tree, bus) = setup();
        let root = container(&mut tree);
        let panel = container(&mut tree);
        let inner = container(&mut tree);
        let x = focusable(&mut tree);
        let y = focusable(&mut tree);
        tree.attach(root, panel).unwrap();
        tree.attach(panel, inner).unwrap();
        tree.attach(inner, x).unwrap();
        tree.attach(panel, y).unwrap();
        tree.focus_list().borrow_mut().request_focus(x).unwrap();

        let events = record(&bus);
        tree.detach(root, panel).unwrap();

        let pairs: Vec<(EventKind, ComponentId, ComponentId)> = events
            .borrow()
            .iter()
            .map(|event| match *event {
                Event::ComponentDetached {
                    parent, component, ..
                } => (EventKind::ComponentDetached, parent, component),
                Event::ComponentRemoved {
                    parent, component, ..
                } => (EventKind::ComponentRemoved, parent, component),
                ref other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                (EventKind::ComponentDetached, inner, x),
                (EventKind::ComponentRemoved, inner, x),
                (EventKind::ComponentDetached, panel, inner),
                (EventKind::ComponentRemoved, panel, inner),
                (EventKind::ComponentDetached, panel, y),
                (EventKind::ComponentRemoved, panel, y),
                (EventKind::ComponentDetached, root, panel),
                (EventKind::ComponentRemoved, root, panel),
            ]
        );

        // Nothing below the detached panel is reachable by Tab
        let focus = tree.focus_list();
        assert!(focus.borrow().is_empty());
        assert_eq!(focus.borrow().focused(), None);
        assert_eq!(focus.borrow_mut().next(), None);

        // Every node survives, unlinked
        for id in [panel, inner, x, y] {
            assert!(tree.contains(id));
            assert_eq!(tree.parent_of(id), None);
        }
        assert!(tree.children_of(panel).is_empty());
        assert!(tree.children_of(root).is_empty());
    }

    #[test]
    fn test_detach_container_keeps_unrelated_focus() {
        let (mut tree, _) = setup();
        let root = container(&mut tree);
        let panel = container(&mut tree);
        let inside = focusable(&mut tree);
        let outside = focusable(&mut tree);
        tree.attach(root, panel).unwrap();
        tree.attach(panel, inside).unwrap();
        tree.attach(root, outside).unwrap();
        tree.focus_list().borrow_mut().request_focus(outside).unwrap();

        tree.detach(root, panel).unwrap();
        assert_eq!(tree.focus_list().borrow().entries(), &[outside]);
        assert_eq!(tree.focus_list().borrow().focused(), Some(outside));
    }

    #[test]
    fn test_remove_detached_root() {
        let (mut tree, bus) = setup();
        let root = container(&mut tree);
        let x = focusable(&mut tree);
        tree.attach(root, x).unwrap();

        let events = record(&bus);
        tree.remove(root).unwrap();
        assert_eq!(
            kinds(&events),
            vec![EventKind::ComponentDetached, EventKind::ComponentRemoved]
        );
        assert!(tree.is_empty());
        assert_eq!(tree.remove(root), Err(CoreError::ComponentNotFound(root)));
    }

    #[test]
    fn test_move_and_resize_publish_moved() {
        let (mut tree, bus) = setup();
        let x = focusable(&mut tree);
        let events = record(&bus);

        tree.move_to(x, Position::new(-3, 7)).unwrap();
        tree.resize(x, Size::new(6, 2)).unwrap();

        assert_eq!(tree.get(x).unwrap().position(), Position::new(-3, 7));
        assert_eq!(tree.get(x).unwrap().size(), Size::new(6, 2));
        assert_eq!(
            *events.borrow(),
            vec![
                Event::ComponentMoved {
                    emitter: Emitter::from(x)
                },
                Event::ComponentMoved {
                    emitter: Emitter::from(x)
                },
            ]
        );

        let ghost = ComponentId(500);
        assert_eq!(
            tree.move_to(ghost, Position::ZERO),
            Err(CoreError::ComponentNotFound(ghost))
        );
    }

    #[test]
    fn test_descendants_pre_order() {
        let (mut tree, _) = setup();
        let root = container(&mut tree);
        let left = container(&mut tree);
        let leaf_a = focusable(&mut tree);
        let leaf_b = focusable(&mut tree);
        tree.attach(root, left).unwrap();
        tree.attach(left, leaf_a).unwrap();
        tree.attach(root, leaf_b).unwrap();

        assert_eq!(tree.descendants_of(root), vec![left, leaf_a, leaf_b]);
        assert!(tree.descendants_of(leaf_b).is_empty());
    }
}
