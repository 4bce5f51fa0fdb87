// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting visual-element trees into parallel image and text trees.
//!
//! `cleave_core` takes a tree of UI nodes carrying renderable, layout, and
//! input behaviors and produces two structurally parallel copies: one that
//! keeps the image renderables (and the controls driving them), and one that
//! keeps only text renderables and layout. References from the image copy to
//! text renderables are redirected into the text copy by structural path,
//! and nodes left empty by pruning are collapsed bottom-up. It is `no_std`
//! compatible (with `alloc`) and uses struct-of-arrays storage with
//! generational handles.
//!
//! # Architecture
//!
//! ```text
//!   source root
//!       │
//!       ▼
//!   clone_tree() ×2 ──► image copy, text copy
//!                             │
//!                 ┌───────────┘
//!                 ▼
//!   PathIndex::build() ×2 ──► rewrite_with_indices()
//!                                      │
//!                 ┌────────────────────┘
//!                 ▼
//!   prune(image, IMAGE_COPY), prune(text, TEXT_COPY)
//!                 │
//!                 ▼
//!   disable_interaction(text) ──► PartitionResult
//! ```
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles, plus
//! a behavior arena. This is the host object model the engine operates on.
//!
//! **[`behavior`]**: The closed behavior catalog. Every variant exposes its
//! reference fields by slot.
//!
//! **[`classify`]**: Maps behaviors to categories and defines keep-sets.
//!
//! **[`clone`]**, **[`path`]**, **[`rewrite`]**, **[`prune`]**: The stages
//! of a partition, each usable on its own.
//!
//! **[`partition`]**: [`partition`](partition::partition) and
//! [`partition_with`](partition::partition_with) run the stages in order.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`, so a
//! host can persist exactly what changed
//! (see [`NodeStore::drain_changes`](node::NodeStore::drain_changes)).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! partition instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use cleave_core::behavior::{Behavior, Image, Text};
//! use cleave_core::node::NodeStore;
//! use cleave_core::partition::partition;
//!
//! let mut store = NodeStore::new();
//! let button = store.create_node("Button");
//! store.attach(button, Behavior::RectTransform);
//! store.attach(button, Behavior::Image(Image::default()));
//! let label = store.create_node("Label");
//! store.add_child(button, label);
//! store.attach(label, Behavior::RectTransform);
//! store.attach(label, Behavior::Text(Text::new("OK")));
//!
//! let result = partition(&mut store, button).unwrap();
//! // The label held only text, so the image copy has no children left.
//! assert_eq!(store.child_count(result.image_root), 0);
//! assert_eq!(store.child_count(result.text_root), 1);
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-reference,
//!   per-behavior, and per-node events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod behavior;
pub mod classify;
pub mod clone;
pub mod dirty;
pub mod error;
pub mod layout;
pub mod node;
pub mod partition;
pub mod path;
pub mod prune;
pub mod rewrite;
pub mod trace;

pub use error::{PartitionError, Warning};
pub use partition::{PartitionConfig, PartitionResult, partition, partition_with};
