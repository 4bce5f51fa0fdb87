// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-based node paths.
//!
//! A [`Path`] is the sequence of child positions leading from a root to a
//! node. Two trees produced by cloning the same source have identical path
//! sets, so a path taken in one tree addresses the structurally
//! corresponding node in the other. Node names never take part in
//! correlation; [`describe`] renders them for diagnostics only.
//!
//! Paths order lexicographically by their steps, which is the same as
//! depth-first pre-order over the tree they were taken from. Iterating a
//! [`PathIndex`] therefore visits nodes parent-first in sibling order.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::node::{NodeId, NodeStore};

/// A sequence of child indices from a root to a node.
///
/// The root itself has the empty path.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<u32>);

impl Path {
    /// The empty path, addressing the root.
    pub const ROOT: Self = Self(Vec::new());

    /// Creates a path from explicit steps.
    #[must_use]
    pub fn from_steps(steps: impl Into<Vec<u32>>) -> Self {
        Self(steps.into())
    }

    /// Returns the child indices, root first.
    #[must_use]
    pub fn steps(&self) -> &[u32] {
        &self.0
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path of the `index`th child of this path's node.
    #[must_use]
    pub fn child(&self, index: u32) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(index);
        Self(steps)
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

/// A two-way mapping between the paths and nodes of one subtree.
#[derive(Clone, Debug, Default)]
pub struct PathIndex {
    by_path: BTreeMap<Path, NodeId>,
    by_node: BTreeMap<NodeId, Path>,
}

impl PathIndex {
    /// Indexes every node of the subtree rooted at `root`.
    #[must_use]
    pub fn build(store: &NodeStore, root: NodeId) -> Self {
        let mut index = Self::default();
        let mut stack = alloc::vec![(root, Path::ROOT)];
        while let Some((node, path)) = stack.pop() {
            for (i, child) in store.children(node).enumerate() {
                let i = u32::try_from(i).expect("child index fits in u32");
                stack.push((child, path.child(i)));
            }
            index.by_node.insert(node, path.clone());
            index.by_path.insert(path, node);
        }
        index
    }

    /// Returns the node at `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Returns the path of `node`, or `None` if it is not in the subtree.
    #[must_use]
    pub fn path_of(&self, node: NodeId) -> Option<&Path> {
        self.by_node.get(&node)
    }

    /// Returns whether `node` is in the indexed subtree.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    /// Returns the number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Returns whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Iterates `(path, node)` pairs in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, NodeId)> + '_ {
        self.by_path.iter().map(|(path, node)| (path, *node))
    }

    /// Iterates the indexed paths in pre-order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.by_path.keys()
    }
}

/// Computes the path of `node` relative to `root`.
///
/// Returns `None` if `node` is not `root` or one of its descendants.
#[must_use]
pub fn path_of(store: &NodeStore, root: NodeId, node: NodeId) -> Option<Path> {
    let mut steps = Vec::new();
    let mut current = node;
    while current != root {
        steps.push(store.sibling_index(current));
        current = store.parent(current)?;
    }
    steps.reverse();
    Some(Path(steps))
}

/// Follows `path` down from `root`.
#[must_use]
pub fn resolve(store: &NodeStore, root: NodeId, path: &Path) -> Option<NodeId> {
    path.steps()
        .iter()
        .try_fold(root, |node, &step| store.child_at(node, step))
}

/// Renders the chain of node names along `path`, like `Root/Panel/Label`.
///
/// Steps that do not resolve are rendered as `#index?` and end the chain.
#[must_use]
pub fn describe(store: &NodeStore, root: NodeId, path: &Path) -> String {
    use fmt::Write as _;

    let mut out = String::from(store.name(root));
    let mut node = root;
    for &step in path.steps() {
        match store.child_at(node, step) {
            Some(child) => {
                out.push('/');
                out.push_str(store.name(child));
                node = child;
            }
            None => {
                let _ = write!(out, "/#{step}?");
                break;
            }
        }
    }
    out
}
