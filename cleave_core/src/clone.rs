// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deep subtree copies.
//!
//! [`clone_tree`] duplicates every node, layout record, and behavior of a
//! subtree into fresh slots of the same store. The copy is a new detached
//! root; the source is only read.
//!
//! References are remapped in a second pass: a reference whose target lies
//! inside the source subtree is pointed at the copy of that target, so each
//! copy refers to its own behaviors. References leaving the subtree are kept
//! as they are. Cloning the same source twice yields two trees with
//! identical [`Path`](crate::path::Path) sets.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::node::{BehaviorId, NodeId, NodeStore};

/// Correspondence between a source subtree and its copy.
#[derive(Clone, Debug, Default)]
pub struct CloneMap {
    nodes: BTreeMap<NodeId, NodeId>,
    behaviors: BTreeMap<BehaviorId, BehaviorId>,
}

impl CloneMap {
    /// Returns the copy of a source node.
    #[must_use]
    pub fn node(&self, source: NodeId) -> Option<NodeId> {
        self.nodes.get(&source).copied()
    }

    /// Returns the copy of a source behavior.
    #[must_use]
    pub fn behavior(&self, source: BehaviorId) -> Option<BehaviorId> {
        self.behaviors.get(&source).copied()
    }

    /// Returns the number of copied nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of copied behaviors.
    #[must_use]
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }
}

/// Deep-copies the subtree rooted at `root` and returns the copy's root.
///
/// # Panics
///
/// Panics if `root` is stale.
pub fn clone_tree(store: &mut NodeStore, root: NodeId) -> NodeId {
    let (copy, _) = clone_tree_mapped(store, root);
    copy
}

/// Like [`clone_tree`], but also returns the source-to-copy mapping.
pub fn clone_tree_mapped(store: &mut NodeStore, root: NodeId) -> (NodeId, CloneMap) {
    let mut map = CloneMap::default();
    let mut copy_root = None;

    // Pre-order, so every parent is copied before its children and appending
    // preserves sibling order.
    let mut stack = alloc::vec![(root, None)];
    while let Some((source, parent)) = stack.pop() {
        let name = String::from(store.name(source));
        let copy = store.create_node(name);
        store.set_layout(copy, store.layout(source));

        let attached: Vec<BehaviorId> = store.behaviors(source).to_vec();
        for behavior in attached {
            let duplicate = store.behavior(behavior).clone();
            let id = store.attach(copy, duplicate);
            map.behaviors.insert(behavior, id);
        }

        match parent {
            Some(parent) => store.add_child(parent, copy),
            None => copy_root = Some(copy),
        }
        map.nodes.insert(source, copy);

        let mark = stack.len();
        stack.extend(store.children(source).map(|child| (child, Some(copy))));
        stack[mark..].reverse();
    }

    // Point internal references at their copies.
    for &copy in map.behaviors.values() {
        let needs_remap = store
            .behavior(copy)
            .references()
            .iter()
            .any(|field| field.target.is_some_and(|t| map.behaviors.contains_key(&t)));
        if needs_remap {
            store.behavior_mut(copy).for_each_reference_mut(|target| {
                if let Some(mapped) = target.and_then(|t| map.behavior(t)) {
                    *target = Some(mapped);
                }
            });
        }
    }

    (copy_root.unwrap_or(root), map)
}
