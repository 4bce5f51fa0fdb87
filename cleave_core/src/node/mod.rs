// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is an element of a visual tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - A name and a [`RectLayout`](crate::layout::RectLayout) record.
//! - An ordered list of attached [`Behavior`](crate::behavior::Behavior)s,
//!   addressed by [`BehaviorId`] handles into a separate arena.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Mutations automatically mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)) and are collected by
//! [`NodeStore::drain_changes`]:
//!
//! - **LAYOUT** propagates to all descendants.
//! - **BEHAVIORS** / **REFERENCES** are local to the owning node.
//! - **TOPOLOGY** covers add/remove child and create/destroy node.

mod changes;
mod id;
mod store;
mod traverse;

pub use changes::StoreChanges;
pub use id::{AssetId, BehaviorId, INVALID, NodeId};
pub use store::NodeStore;
pub use traverse::Children;
