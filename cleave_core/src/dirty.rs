// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The node store uses multi-channel dirty tracking (via [`understory_dirty`])
//! so that a host can persist exactly what a partition touched. Each channel
//! represents an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`LAYOUT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. Changing a node's layout marks every descendant,
//!   since their resolved rectangles depend on it.
//!
//! - **Local-only**: [`BEHAVIORS`] and [`REFERENCES`] are marked with the
//!   default policy. Only the node that owns the attached or mutated
//!   behavior appears in the drain output.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on the parent for add/remove
//!   child and on the node itself for create/destroy.
//!
//! # Consumption
//!
//! Each [`NodeStore::drain_changes`](crate::node::NodeStore::drain_changes)
//! call drains all channels into a
//! [`StoreChanges`](crate::node::StoreChanges) record.

use understory_dirty::Channel;

/// Layout attributes changed; descendants are affected.
pub const LAYOUT: Channel = Channel::new(0);

/// A behavior was attached, detached, or mutably accessed.
pub const BEHAVIORS: Channel = Channel::new(1);

/// A reference slot on one of the node's behaviors was written.
pub const REFERENCES: Channel = Channel::new(2);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(3);
