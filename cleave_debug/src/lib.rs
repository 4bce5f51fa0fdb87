// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for cleave diagnostics.
//!
//! This crate provides [`TraceSink`](cleave_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json`]: JSON export of recorded events and of node-tree snapshots.

pub mod json;
pub mod pretty;
pub mod recorder;
