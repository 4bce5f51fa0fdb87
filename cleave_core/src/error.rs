// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error and warning types.
//!
//! Only [`PartitionError`] aborts a partition. Everything else that can go
//! wrong along the way degrades locally and is reported as a [`Warning`] on
//! the result.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::node::{BehaviorId, NodeId};
use crate::path::Path;

/// Why a node cannot be partitioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidRootReason {
    /// The handle refers to a destroyed node.
    Dead,
    /// The node has no `RectTransform` behavior.
    NotVisual,
}

impl fmt::Display for InvalidRootReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dead => "node is not alive",
            Self::NotVisual => "node has no RectTransform",
        })
    }
}

/// A fatal partition error. No copy has been created when this is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// The source root is not a live visual element.
    #[error("invalid partition root {root:?}: {reason}")]
    InvalidRoot {
        /// The rejected source.
        root: NodeId,
        /// What is missing.
        reason: InvalidRootReason,
    },
}

/// Why [`NodeStore::detach`](crate::node::NodeStore::detach) refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DetachError {
    /// Another behavior on the node requires this one's category.
    #[error("{behavior:?} is required by {required_by:?}")]
    Required {
        /// The behavior that stays attached.
        behavior: BehaviorId,
        /// The behavior declaring the requirement.
        required_by: BehaviorId,
    },
}

/// A non-fatal anomaly recorded during a partition.
///
/// Paths are relative to the root of the copy the anomaly occurred in. Both
/// copies share the source's path structure, so they also address the
/// source node.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Warning {
    /// A reference to a text renderable had no counterpart in the text copy
    /// and was cleared.
    #[error("reference `{field}` on {holder:?} has no counterpart at {path}; cleared")]
    UnresolvedReference {
        /// The image-copy behavior holding the reference.
        holder: BehaviorId,
        /// Name of the reference field.
        field: String,
        /// Path of the referenced node.
        path: Path,
    },
    /// A behavior outside the keep-set could not be detached.
    #[error("cannot remove {behavior:?} at {path}: required by {required_by:?}")]
    BehaviorRemovalDenied {
        /// The behavior left in place.
        behavior: BehaviorId,
        /// The behavior whose requirement pinned it.
        required_by: BehaviorId,
        /// Path of the owning node.
        path: Path,
    },
    /// A custom behavior declared several capabilities and was classified as
    /// `Other`.
    #[error("composite behavior `{type_name}` at {path} treated as Other")]
    CompositeBehavior {
        /// The host type name.
        type_name: String,
        /// Path of the owning node.
        path: Path,
    },
}
