// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use cleave_core::trace::{
    BehaviorRemovedEvent, NodeCollapsedEvent, PartitionSummary, PhaseBeginEvent, PhaseEndEvent,
    ReferenceClearedEvent, ReferenceRewrittenEvent, RemovalDeniedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(self.writer, "[phase:begin] {}", e.phase.name());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] {} items={}",
            e.phase.name(),
            e.items,
        );
    }

    fn on_reference_cleared(&mut self, e: &ReferenceClearedEvent) {
        let _ = writeln!(
            self.writer,
            "[ref:cleared] holder=#{} slot={} target_node=#{}",
            e.holder, e.slot, e.target_node,
        );
    }

    fn on_removal_denied(&mut self, e: &RemovalDeniedEvent) {
        let _ = writeln!(
            self.writer,
            "[remove:denied] behavior=#{} required_by=#{} node=#{}",
            e.behavior, e.required_by, e.node,
        );
    }

    fn on_partition_summary(&mut self, s: &PartitionSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] image=#{} (-{} behaviors, -{} nodes) text=#{} (-{} behaviors, -{} nodes) \
             rewritten={} cleared={} inert={} missing={} warnings={}",
            s.image_root,
            s.image_removed_behaviors,
            s.image_collapsed_nodes,
            s.text_root,
            s.text_removed_behaviors,
            s.text_collapsed_nodes,
            s.references_rewritten,
            s.references_cleared,
            s.interaction_disabled,
            s.missing_removed,
            s.warnings,
        );
    }

    fn on_reference_rewritten(&mut self, e: &ReferenceRewrittenEvent) {
        let _ = writeln!(
            self.writer,
            "[ref:rewritten] holder=#{} slot={} #{} -> #{}",
            e.holder, e.slot, e.from, e.to,
        );
    }

    fn on_behavior_removed(&mut self, e: &BehaviorRemovedEvent) {
        let _ = writeln!(
            self.writer,
            "[behavior:removed] node=#{} category={:?}",
            e.node, e.category,
        );
    }

    fn on_node_collapsed(&mut self, e: &NodeCollapsedEvent) {
        let _ = writeln!(
            self.writer,
            "[node:collapsed] node=#{} pass={}",
            e.node, e.pass,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleave_core::behavior::{Behavior, Text};
    use cleave_core::node::NodeStore;
    use cleave_core::partition::{PartitionConfig, partition_with};
    use cleave_core::trace::{PartitionPhase, Tracer};

    #[test]
    fn pretty_print_phase_end() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase_end(&PhaseEndEvent {
            phase: PartitionPhase::Rewrite,
            items: 3,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[phase:end] rewrite"), "got: {output}");
        assert!(output.contains("items=3"), "got: {output}");
    }

    #[test]
    fn pretty_print_whole_partition() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        store.attach(root, Behavior::RectTransform);
        let label = store.create_node("label");
        store.add_child(root, label);
        store.attach(label, Behavior::Text(Text::new("hi")));

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let mut tracer = Tracer::new(&mut sink);
        partition_with(&mut store, root, &PartitionConfig::new(), &mut tracer).unwrap();
        drop(tracer);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[phase:begin] clone"), "got: {output}");
        assert!(output.contains("[node:collapsed]"), "got: {output}");
        assert!(output.lines().last().unwrap().starts_with("[summary]"), "got: {output}");
    }
}
