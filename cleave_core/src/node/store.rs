// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with a behavior arena.

use alloc::string::String;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{BehaviorId, INVALID, NodeId};
use super::traverse::Children;
use crate::behavior::{Behavior, BehaviorRef};
use crate::classify::classify;
use crate::dirty;
use crate::error::DetachError;
use crate::layout::RectLayout;

/// Struct-of-arrays storage for nodes and the behaviors attached to them.
///
/// Nodes are addressed by [`NodeId`] handles and behaviors by
/// [`BehaviorId`] handles. Each lives in a slot of its own arena. Freed
/// slots are recycled via a free list, and generation counters prevent stale
/// handle access.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Node properties --
    pub(crate) name: Vec<String>,
    pub(crate) layout: Vec<RectLayout>,
    pub(crate) attached: Vec<Vec<BehaviorId>>,

    // -- Node allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Behavior arena --
    pub(crate) behavior: Vec<Option<Behavior>>,
    pub(crate) owner: Vec<u32>,
    pub(crate) behavior_generation: Vec<u32>,
    pub(crate) behavior_free: Vec<u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            name: Vec::new(),
            layout: Vec::new(),
            attached: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            behavior: Vec::new(),
            owner: Vec::new(),
            behavior_generation: Vec::new(),
            behavior_free: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new detached node and returns its handle.
    ///
    /// The node starts with a centered layout, no behaviors, and no parent.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.name[idx as usize] = name;
            self.layout[idx as usize] = RectLayout::CENTERED;
            self.attached[idx as usize].clear();
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.name.push(name);
            self.layout.push(RectLayout::CENTERED);
            self.attached.push(Vec::new());
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node and every behavior attached to it, freeing the slots
    /// for reuse.
    ///
    /// Behaviors are released without consulting requirements; the node
    /// they depend on is going away too.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        // Remove from parent's child list if attached.
        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.dirty.remove_dependency(idx, p, dirty::LAYOUT);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        for behavior in core::mem::take(&mut self.attached[idx as usize]) {
            self.release_behavior(behavior.idx);
        }

        // Remove dirty tracking dependencies.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        // A node created and destroyed within one drain window was never
        // reported; it leaves no trace in either lifecycle list.
        if let Some(pos) = self.pending_added.iter().position(|&i| i == idx) {
            self.pending_added.remove(pos);
        } else {
            self.pending_removed.push(idx);
        }
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Destroys `root` and its whole subtree, children first.
    pub fn destroy_subtree(&mut self, root: NodeId) {
        for node in self.post_order(root) {
            self.destroy_node(node);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Marks `child`'s subtree layout-dirty since it now resolves against a
    /// new parent rectangle.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent for LAYOUT.
        let _ = self.dirty.add_dependency(c, p, dirty::LAYOUT);

        self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent, leaving it as a detached
    /// root.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);

        self.dirty.remove_dependency(c, p, dirty::LAYOUT);

        self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        let _ = self.dirty.add_dependency(c, p, dirty::LAYOUT);

        self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(self.node_at(p))
        }
    }

    /// Returns an iterator over the direct children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Returns the child at position `index`, if there is one.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: u32) -> Option<NodeId> {
        self.children(id).nth(index as usize)
    }

    /// Returns the position of a node among its siblings.
    ///
    /// A node without a parent is at position 0.
    #[must_use]
    pub fn sibling_index(&self, id: NodeId) -> u32 {
        self.validate(id);
        let mut index = 0;
        let mut prev = self.prev_sibling[id.idx as usize];
        while prev != INVALID {
            index += 1;
            prev = self.prev_sibling[prev as usize];
        }
        index
    }

    /// Returns all live nodes without a parent.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.node_at(idx));
            }
        }
        roots
    }

    /// Returns `root` and all its descendants in depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.validate(root);
        let mut order = Vec::new();
        let mut stack = alloc::vec![root.idx];
        while let Some(idx) = stack.pop() {
            order.push(self.node_at(idx));
            let mark = stack.len();
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
            // Children were pushed first-to-last; pop them first-to-last.
            stack[mark..].reverse();
        }
        order
    }

    /// Returns `root` and all its descendants in depth-first post-order
    /// (children before their parent, siblings in order).
    #[must_use]
    pub fn post_order(&self, root: NodeId) -> Vec<NodeId> {
        self.validate(root);
        let mut order = Vec::new();
        let mut stack = alloc::vec![root.idx];
        while let Some(idx) = stack.pop() {
            order.push(self.node_at(idx));
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
        // A right-to-left pre-order, reversed, is a left-to-right post-order.
        order.reverse();
        order
    }

    // -- Node properties --

    /// Returns the name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Renames a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.validate(id);
        self.name[id.idx as usize] = name.into();
    }

    /// Returns the layout attributes of a node.
    #[must_use]
    pub fn layout(&self, id: NodeId) -> RectLayout {
        self.validate(id);
        self.layout[id.idx as usize]
    }

    /// Sets the layout attributes of a node.
    ///
    /// Marks the LAYOUT channel dirty with eager propagation to descendants.
    pub fn set_layout(&mut self, id: NodeId, layout: RectLayout) {
        self.validate(id);
        self.layout[id.idx as usize] = layout;
        self.dirty.mark_with(id.idx, dirty::LAYOUT, &EagerPolicy);
    }

    // -- Behavior API --

    /// Attaches a behavior to the end of a node's behavior list.
    ///
    /// # Panics
    ///
    /// Panics if the node handle is stale.
    pub fn attach(&mut self, node: NodeId, behavior: Behavior) -> BehaviorId {
        self.validate(node);
        let idx = if let Some(idx) = self.behavior_free.pop() {
            self.behavior_generation[idx as usize] += 1;
            self.behavior[idx as usize] = Some(behavior);
            self.owner[idx as usize] = node.idx;
            idx
        } else {
            let idx = u32::try_from(self.behavior.len()).expect("behavior arena overflow");
            self.behavior.push(Some(behavior));
            self.owner.push(node.idx);
            self.behavior_generation.push(0);
            idx
        };
        let id = BehaviorId {
            idx,
            generation: self.behavior_generation[idx as usize],
        };
        self.attached[node.idx as usize].push(id);
        self.dirty.mark(node.idx, dirty::BEHAVIORS);
        id
    }

    /// Detaches a behavior from its node and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::Required`] if another behavior on the same
    /// node requires this behavior's category and nothing else on the node
    /// provides it. The behavior stays attached in that case.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach(&mut self, id: BehaviorId) -> Result<Behavior, DetachError> {
        self.validate_behavior(id);
        let node = self.owner[id.idx as usize];
        let attached = &self.attached[node as usize];
        let category = classify(self.behavior(id));

        let provided_elsewhere = attached
            .iter()
            .filter(|other| **other != id)
            .any(|other| classify(self.behavior(*other)) == category);
        if !provided_elsewhere {
            if let Some(dependent) = attached.iter().copied().find(|other| {
                *other != id && self.behavior(*other).requirements().contains(&category)
            }) {
                return Err(DetachError::Required {
                    behavior: id,
                    required_by: dependent,
                });
            }
        }

        self.attached[node as usize].retain(|other| *other != id);
        self.dirty.mark(node, dirty::BEHAVIORS);
        Ok(self.release_behavior(id.idx))
    }

    /// Returns the behaviors attached to a node, in attach order.
    #[must_use]
    pub fn behaviors(&self, node: NodeId) -> &[BehaviorId] {
        self.validate(node);
        &self.attached[node.idx as usize]
    }

    /// Returns a behavior.
    #[must_use]
    pub fn behavior(&self, id: BehaviorId) -> &Behavior {
        self.validate_behavior(id);
        self.behavior[id.idx as usize]
            .as_ref()
            .expect("validated behavior slot is occupied")
    }

    /// Returns a behavior for mutation.
    ///
    /// Marks the owner's BEHAVIORS channel dirty.
    pub fn behavior_mut(&mut self, id: BehaviorId) -> &mut Behavior {
        self.validate_behavior(id);
        self.dirty.mark(self.owner[id.idx as usize], dirty::BEHAVIORS);
        self.behavior[id.idx as usize]
            .as_mut()
            .expect("validated behavior slot is occupied")
    }

    /// Writes reference slot `slot` of a behavior. Returns `false` if the
    /// behavior has no such slot.
    ///
    /// Marks the owner's REFERENCES channel dirty when the slot exists.
    pub fn set_reference(&mut self, id: BehaviorId, slot: usize, value: BehaviorRef) -> bool {
        self.validate_behavior(id);
        let written = self.behavior[id.idx as usize]
            .as_mut()
            .is_some_and(|behavior| behavior.set_reference(slot, value));
        if written {
            self.dirty.mark(self.owner[id.idx as usize], dirty::REFERENCES);
        }
        written
    }

    /// Returns the node a behavior is attached to.
    #[must_use]
    pub fn owner(&self, id: BehaviorId) -> NodeId {
        self.validate_behavior(id);
        self.node_at(self.owner[id.idx as usize])
    }

    /// Returns whether the given handle refers to an attached behavior.
    #[must_use]
    pub fn is_behavior_alive(&self, id: BehaviorId) -> bool {
        (id.idx as usize) < self.behavior.len()
            && self.behavior_generation[id.idx as usize] == id.generation
            && self.behavior[id.idx as usize].is_some()
    }

    // -- Internal helpers --

    /// Builds a handle for a live raw slot.
    pub(crate) fn node_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Panics if the handle is stale.
    fn validate_behavior(&self, id: BehaviorId) {
        assert!(self.is_behavior_alive(id), "stale BehaviorId: {id:?}");
    }

    /// Frees a behavior slot and returns its contents.
    fn release_behavior(&mut self, idx: u32) -> Behavior {
        self.behavior_generation[idx as usize] += 1;
        self.owner[idx as usize] = INVALID;
        self.behavior_free.push(idx);
        self.behavior[idx as usize]
            .take()
            .expect("released behavior slot is occupied")
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::behavior::{Custom, Image, InputField, Text};
    use crate::classify::{Capabilities, Category};

    #[test]
    fn create_and_destroy() {
        let mut store = NodeStore::new();
        let id = store.create_node("a");
        assert!(store.is_alive(id));
        store.destroy_node(id);
        assert!(!store.is_alive(id));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = NodeStore::new();
        let id1 = store.create_node("a");
        store.destroy_node(id1);
        let id2 = store.create_node("b");
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(store.name(id2), "b");
    }

    #[test]
    fn add_child_and_query() {
        let mut store = NodeStore::new();
        let parent = store.create_node("parent");
        let child1 = store.create_node("c1");
        let child2 = store.create_node("c2");

        store.add_child(parent, child1);
        store.add_child(parent, child2);

        assert_eq!(store.parent(child1), Some(parent));
        assert_eq!(store.parent(child2), Some(parent));

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
        assert_eq!(store.child_count(parent), 2);
        assert_eq!(store.child_at(parent, 1), Some(child2));
        assert_eq!(store.child_at(parent, 2), None);
        assert_eq!(store.sibling_index(child2), 1);
        assert_eq!(store.sibling_index(parent), 0);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = NodeStore::new();
        let parent = store.create_node("parent");
        let child = store.create_node("child");

        store.add_child(parent, child);
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn insert_before_works() {
        let mut store = NodeStore::new();
        let parent = store.create_node("p");
        let a = store.create_node("a");
        let b = store.create_node("b");
        let c = store.create_node("c");

        store.add_child(parent, a);
        store.add_child(parent, c);
        store.insert_before(b, c);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
    }

    #[test]
    fn traversal_orders() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let a = store.create_node("a");
        let a1 = store.create_node("a1");
        let a2 = store.create_node("a2");
        let b = store.create_node("b");
        store.add_child(root, a);
        store.add_child(a, a1);
        store.add_child(a, a2);
        store.add_child(root, b);

        assert_eq!(store.descendants(root), vec![root, a, a1, a2, b]);
        assert_eq!(store.post_order(root), vec![a1, a2, a, b, root]);
        assert_eq!(store.descendants(a2), vec![a2]);
    }

    #[test]
    fn roots_returns_parentless_nodes() {
        let mut store = NodeStore::new();
        let a = store.create_node("a");
        let b = store.create_node("b");
        let c = store.create_node("c");
        store.add_child(a, c);

        let roots = store.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    fn destroy_subtree_releases_behaviors() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let child = store.create_node("child");
        store.add_child(root, child);
        let image = store.attach(child, Behavior::Image(Image::default()));

        store.destroy_subtree(root);
        assert!(!store.is_alive(root));
        assert!(!store.is_alive(child));
        assert!(!store.is_behavior_alive(image));
    }

    #[test]
    fn attach_and_detach() {
        let mut store = NodeStore::new();
        let node = store.create_node("n");
        let rect = store.attach(node, Behavior::RectTransform);
        let text = store.attach(node, Behavior::Text(Text::new("hi")));
        assert_eq!(store.behaviors(node), &[rect, text]);
        assert_eq!(store.owner(text), node);

        let removed = store.detach(text).unwrap();
        assert_eq!(removed, Behavior::Text(Text::new("hi")));
        assert_eq!(store.behaviors(node), &[rect]);
        assert!(!store.is_behavior_alive(text));

        // The slot is reused with a new generation.
        let again = store.attach(node, Behavior::CanvasRenderer);
        assert_eq!(again.idx, text.idx);
        assert!(!store.is_behavior_alive(text));
    }

    #[test]
    fn detach_refused_while_required() {
        let mut store = NodeStore::new();
        let node = store.create_node("n");
        let image = store.attach(node, Behavior::Image(Image::default()));
        let effect = store.attach(
            node,
            Behavior::Custom(
                Custom::new("Shadow", Capabilities::IMAGE).requiring(Category::ImageRenderable),
            ),
        );

        // The effect itself is an image renderable, so the image is not the
        // only provider.
        assert!(store.detach(image).is_ok());

        // Now the effect is the only image renderable; a second dependent
        // keeps it pinned.
        let dependent = store.attach(
            node,
            Behavior::Custom(
                Custom::new("Glow", Capabilities::NONE).requiring(Category::ImageRenderable),
            ),
        );
        assert_eq!(
            store.detach(effect),
            Err(DetachError::Required {
                behavior: effect,
                required_by: dependent,
            })
        );
        assert!(store.is_behavior_alive(effect));
        assert!(store.detach(dependent).is_ok());
        assert!(store.detach(effect).is_ok());
    }

    #[test]
    fn set_reference_writes_slot() {
        let mut store = NodeStore::new();
        let node = store.create_node("n");
        let text = store.attach(node, Behavior::Text(Text::new("x")));
        let field = store.attach(node, Behavior::InputField(InputField::default()));

        assert!(store.set_reference(field, 1, Some(text)));
        assert!(!store.set_reference(field, 7, Some(text)));
        assert_eq!(store.behavior(field).reference(1), Some(Some(text)));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut store = NodeStore::new();
        let parent = store.create_node("p");
        let child = store.create_node("c");
        store.add_child(parent, child);
        store.destroy_node(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_layout() {
        let mut store = NodeStore::new();
        let id = store.create_node("n");
        store.destroy_node(id);
        let _ = store.layout(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let id = store.create_node("n");
        store.destroy_node(id);
        store.add_child(root, id);
    }

    #[test]
    #[should_panic(expected = "stale BehaviorId")]
    fn detached_handle_panics_on_behavior() {
        let mut store = NodeStore::new();
        let node = store.create_node("n");
        let id = store.attach(node, Behavior::CanvasRenderer);
        let _ = store.detach(id);
        let _ = store.behavior(id);
    }
}
