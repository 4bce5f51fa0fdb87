// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change draining for host persistence.
//!
//! Every store mutation marks a dirty channel (see [`dirty`](crate::dirty)).
//! [`NodeStore::drain_changes`] drains them all at once:
//!
//! 1. **LAYOUT**: drained with `affected()`, so a node whose ancestor's
//!    layout changed (or that was re-parented) is reported too.
//! 2. **BEHAVIORS** / **REFERENCES**: local-only; only owners of touched
//!    behaviors are reported.
//! 3. **TOPOLOGY**: drained; `topology_changed` records whether anything
//!    was marked.
//!
//! [`StoreChanges`] uses raw slot indices (`u32`) rather than [`NodeId`]
//! handles. Removed nodes no longer have a valid handle, and a host mirroring
//! the store usually keys its own records by slot.
//!
//! [`NodeId`]: super::NodeId

use alloc::vec::Vec;

use super::store::NodeStore;
use crate::dirty;

/// The set of changes accumulated since the previous
/// [`NodeStore::drain_changes`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreChanges {
    /// Nodes whose layout, or an ancestor's layout or parent, changed.
    pub layouts: Vec<u32>,
    /// Nodes that gained, lost, or mutated a behavior.
    pub behaviors: Vec<u32>,
    /// Nodes owning a behavior whose reference slot was written.
    pub references: Vec<u32>,
    /// Nodes created since the last drain and still alive.
    pub added: Vec<u32>,
    /// Nodes reported by an earlier drain and destroyed since.
    ///
    /// A slot can appear here and in `added` when its node was destroyed and
    /// the slot reused; apply removals first.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed.
    pub topology_changed: bool,
}

impl StoreChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.layouts.clear();
        self.behaviors.clear();
        self.references.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
            && self.behaviors.is_empty()
            && self.references.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl NodeStore {
    /// Drains every dirty channel and lifecycle list into a new
    /// [`StoreChanges`].
    pub fn drain_changes(&mut self) -> StoreChanges {
        let mut changes = StoreChanges::default();
        self.drain_changes_into(&mut changes);
        changes
    }

    /// Like [`drain_changes`](Self::drain_changes), but reuses a
    /// caller-provided buffer.
    pub fn drain_changes_into(&mut self, changes: &mut StoreChanges) {
        changes.clear();

        changes.layouts = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect();

        changes.behaviors = self
            .dirty
            .drain(dirty::BEHAVIORS)
            .deterministic()
            .run()
            .collect();

        changes.references = self
            .dirty
            .drain(dirty::REFERENCES)
            .deterministic()
            .run()
            .collect();

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        // Destroyed slots may have been dirtied before destruction.
        let is_stale = |idx: &u32| self.free_list.contains(idx);
        changes.layouts.retain(|idx| !is_stale(idx));
        changes.behaviors.retain(|idx| !is_stale(idx));
        changes.references.retain(|idx| !is_stale(idx));

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}
