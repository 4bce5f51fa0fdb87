// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for partitions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! partition instrumentation calls at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Events carry raw slot indices rather than handles so sinks can record
//! them without borrowing the store.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-item
//!   [`ReferenceRewrittenEvent`], [`BehaviorRemovedEvent`], and
//!   [`NodeCollapsedEvent`] plus the corresponding `TraceSink` methods.

#[cfg(feature = "trace-rich")]
use crate::classify::Category;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which stage of a partition is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionPhase {
    /// Deep-copying the source twice.
    Clone,
    /// Dropping behaviors whose type could not be resolved.
    StripMissing,
    /// Building path indices for both copies.
    Index,
    /// Redirecting image-copy references into the text copy.
    Rewrite,
    /// Pruning the image copy.
    PruneImage,
    /// Pruning the text copy.
    PruneText,
    /// Turning off input handling on the text copy.
    DisableInteraction,
}

impl PartitionPhase {
    /// Every phase, in execution order.
    pub const ALL: [Self; 7] = [
        Self::Clone,
        Self::StripMissing,
        Self::Index,
        Self::Rewrite,
        Self::PruneImage,
        Self::PruneText,
        Self::DisableInteraction,
    ];

    /// Returns the phase's stable numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks a phase up by [`code`](Self::code).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        if (code as usize) < Self::ALL.len() {
            Some(Self::ALL[code as usize])
        } else {
            None
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::StripMissing => "strip-missing",
            Self::Index => "index",
            Self::Rewrite => "rewrite",
            Self::PruneImage => "prune-image",
            Self::PruneText => "prune-text",
            Self::DisableInteraction => "disable-interaction",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a partition phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Which phase is starting.
    pub phase: PartitionPhase,
}

/// Marks the end of a partition phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Which phase is ending.
    pub phase: PartitionPhase,
    /// How many items the phase produced or changed (nodes cloned,
    /// behaviors removed, references rewritten...).
    pub items: u32,
}

/// Emitted when a reference had no counterpart and was cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceClearedEvent {
    /// Slot index of the behavior holding the reference.
    pub holder: u32,
    /// Reference slot on the holder.
    pub slot: u32,
    /// Slot index of the node the reference used to point into.
    pub target_node: u32,
}

/// Emitted when a behavior outside the keep-set could not be detached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalDeniedEvent {
    /// Slot index of the behavior left in place.
    pub behavior: u32,
    /// Slot index of the behavior requiring it.
    pub required_by: u32,
    /// Slot index of the owning node.
    pub node: u32,
}

/// Final counts of a partition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionSummary {
    /// Slot index of the image copy's root.
    pub image_root: u32,
    /// Slot index of the text copy's root.
    pub text_root: u32,
    /// Behaviors removed from the image copy.
    pub image_removed_behaviors: u32,
    /// Nodes collapsed in the image copy.
    pub image_collapsed_nodes: u32,
    /// Behaviors removed from the text copy.
    pub text_removed_behaviors: u32,
    /// Nodes collapsed in the text copy.
    pub text_collapsed_nodes: u32,
    /// References redirected into the text copy.
    pub references_rewritten: u32,
    /// References cleared for lack of a counterpart.
    pub references_cleared: u32,
    /// Behaviors whose input handling was turned off.
    pub interaction_disabled: u32,
    /// Unresolved behaviors dropped from both copies.
    pub missing_removed: u32,
    /// Number of warnings on the result.
    pub warnings: u32,
}

/// Emitted for every reference redirected into the text copy.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceRewrittenEvent {
    /// Slot index of the behavior holding the reference.
    pub holder: u32,
    /// Reference slot on the holder.
    pub slot: u32,
    /// Slot index of the previous target behavior.
    pub from: u32,
    /// Slot index of the new target behavior.
    pub to: u32,
}

/// Emitted for every behavior detached while pruning.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BehaviorRemovedEvent {
    /// Slot index of the owning node.
    pub node: u32,
    /// Category of the removed behavior.
    pub category: Category,
}

/// Emitted for every node collapsed while pruning.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeCollapsedEvent {
    /// Slot index of the collapsed node.
    pub node: u32,
    /// One-based collapse pass.
    pub pass: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a partition.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the beginning of a phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a reference is cleared.
    fn on_reference_cleared(&mut self, e: &ReferenceClearedEvent) {
        _ = e;
    }

    /// Called when a behavior removal is refused.
    fn on_removal_denied(&mut self, e: &RemovalDeniedEvent) {
        _ = e;
    }

    /// Called once with the final counts.
    fn on_partition_summary(&mut self, s: &PartitionSummary) {
        _ = s;
    }

    /// Called for every rewritten reference (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_reference_rewritten(&mut self, e: &ReferenceRewrittenEvent) {
        _ = e;
    }

    /// Called for every removed behavior (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_behavior_removed(&mut self, e: &BehaviorRemovedEvent) {
        _ = e;
    }

    /// Called for every collapsed node (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_collapsed(&mut self, e: &NodeCollapsedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, phase: PartitionPhase) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(&PhaseBeginEvent { phase });
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = phase;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, phase: PartitionPhase, items: usize) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(&PhaseEndEvent {
                phase,
                items: saturate(items),
            });
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (phase, items);
        }
    }

    /// Emits a [`ReferenceClearedEvent`].
    #[inline]
    pub fn reference_cleared(&mut self, e: &ReferenceClearedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reference_cleared(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RemovalDeniedEvent`].
    #[inline]
    pub fn removal_denied(&mut self, e: &RemovalDeniedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_removal_denied(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PartitionSummary`].
    #[inline]
    pub fn partition_summary(&mut self, s: &PartitionSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_partition_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`ReferenceRewrittenEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn reference_rewritten(&mut self, e: &ReferenceRewrittenEvent) {
        if let Some(s) = &mut self.sink {
            s.on_reference_rewritten(e);
        }
    }

    /// Emits a [`BehaviorRemovedEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn behavior_removed(&mut self, e: &BehaviorRemovedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_behavior_removed(e);
        }
    }

    /// Emits a [`NodeCollapsedEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_collapsed(&mut self, e: &NodeCollapsedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_collapsed(e);
        }
    }
}

/// Clamps a count into an event field.
pub(crate) fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
