// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records: a one-byte tag followed by
//! the event's fields. [`decode`] reads them back as an iterator of
//! [`RecordedEvent`]. Decoding stops at the first unknown tag or truncated
//! record.

use cleave_core::classify::Category;
use cleave_core::trace::{
    BehaviorRemovedEvent, NodeCollapsedEvent, PartitionPhase, PartitionSummary, PhaseBeginEvent,
    PhaseEndEvent, ReferenceClearedEvent, ReferenceRewrittenEvent, RemovalDeniedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_REFERENCE_CLEARED: u8 = 3;
const TAG_REMOVAL_DENIED: u8 = 4;
const TAG_PARTITION_SUMMARY: u8 = 5;
const TAG_REFERENCE_REWRITTEN: u8 = 6;
const TAG_BEHAVIOR_REMOVED: u8 = 7;
const TAG_NODE_COLLAPSED: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: PartitionPhase) {
        self.write_u8(p.code());
    }

    fn write_category(&mut self, c: Category) {
        self.write_u8(match c {
            Category::Structural => 0,
            Category::ImageRenderable => 1,
            Category::TextRenderable => 2,
            Category::LayoutOrClip => 3,
            Category::Interactive => 4,
            Category::Other => 5,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_phase(e.phase);
        self.write_u32(e.items);
    }

    fn on_reference_cleared(&mut self, e: &ReferenceClearedEvent) {
        self.write_u8(TAG_REFERENCE_CLEARED);
        self.write_u32(e.holder);
        self.write_u32(e.slot);
        self.write_u32(e.target_node);
    }

    fn on_removal_denied(&mut self, e: &RemovalDeniedEvent) {
        self.write_u8(TAG_REMOVAL_DENIED);
        self.write_u32(e.behavior);
        self.write_u32(e.required_by);
        self.write_u32(e.node);
    }

    fn on_partition_summary(&mut self, s: &PartitionSummary) {
        self.write_u8(TAG_PARTITION_SUMMARY);
        self.write_u32(s.image_root);
        self.write_u32(s.text_root);
        self.write_u32(s.image_removed_behaviors);
        self.write_u32(s.image_collapsed_nodes);
        self.write_u32(s.text_removed_behaviors);
        self.write_u32(s.text_collapsed_nodes);
        self.write_u32(s.references_rewritten);
        self.write_u32(s.references_cleared);
        self.write_u32(s.interaction_disabled);
        self.write_u32(s.missing_removed);
        self.write_u32(s.warnings);
    }

    fn on_reference_rewritten(&mut self, e: &ReferenceRewrittenEvent) {
        self.write_u8(TAG_REFERENCE_REWRITTEN);
        self.write_u32(e.holder);
        self.write_u32(e.slot);
        self.write_u32(e.from);
        self.write_u32(e.to);
    }

    fn on_behavior_removed(&mut self, e: &BehaviorRemovedEvent) {
        self.write_u8(TAG_BEHAVIOR_REMOVED);
        self.write_u32(e.node);
        self.write_category(e.category);
    }

    fn on_node_collapsed(&mut self, e: &NodeCollapsedEvent) {
        self.write_u8(TAG_NODE_COLLAPSED);
        self.write_u32(e.node);
        self.write_u32(e.pass);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`ReferenceClearedEvent`].
    ReferenceCleared(ReferenceClearedEvent),
    /// A [`RemovalDeniedEvent`].
    RemovalDenied(RemovalDeniedEvent),
    /// A [`PartitionSummary`].
    PartitionSummary(PartitionSummary),
    /// A [`ReferenceRewrittenEvent`].
    ReferenceRewritten(ReferenceRewrittenEvent),
    /// A [`BehaviorRemovedEvent`].
    BehaviorRemoved(BehaviorRemovedEvent),
    /// A [`NodeCollapsedEvent`].
    NodeCollapsed(NodeCollapsedEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_phase(&mut self) -> Option<PartitionPhase> {
        PartitionPhase::from_code(self.read_u8()?)
    }

    fn read_category(&mut self) -> Option<Category> {
        Some(match self.read_u8()? {
            0 => Category::Structural,
            1 => Category::ImageRenderable,
            2 => Category::TextRenderable,
            3 => Category::LayoutOrClip,
            4 => Category::Interactive,
            _ => Category::Other,
        })
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            phase: self.read_phase()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            phase: self.read_phase()?,
            items: self.read_u32()?,
        }))
    }

    fn decode_reference_cleared(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReferenceCleared(ReferenceClearedEvent {
            holder: self.read_u32()?,
            slot: self.read_u32()?,
            target_node: self.read_u32()?,
        }))
    }

    fn decode_removal_denied(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RemovalDenied(RemovalDeniedEvent {
            behavior: self.read_u32()?,
            required_by: self.read_u32()?,
            node: self.read_u32()?,
        }))
    }

    fn decode_partition_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PartitionSummary(PartitionSummary {
            image_root: self.read_u32()?,
            text_root: self.read_u32()?,
            image_removed_behaviors: self.read_u32()?,
            image_collapsed_nodes: self.read_u32()?,
            text_removed_behaviors: self.read_u32()?,
            text_collapsed_nodes: self.read_u32()?,
            references_rewritten: self.read_u32()?,
            references_cleared: self.read_u32()?,
            interaction_disabled: self.read_u32()?,
            missing_removed: self.read_u32()?,
            warnings: self.read_u32()?,
        }))
    }

    fn decode_reference_rewritten(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReferenceRewritten(ReferenceRewrittenEvent {
            holder: self.read_u32()?,
            slot: self.read_u32()?,
            from: self.read_u32()?,
            to: self.read_u32()?,
        }))
    }

    fn decode_behavior_removed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::BehaviorRemoved(BehaviorRemovedEvent {
            node: self.read_u32()?,
            category: self.read_category()?,
        }))
    }

    fn decode_node_collapsed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NodeCollapsed(NodeCollapsedEvent {
            node: self.read_u32()?,
            pass: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_REFERENCE_CLEARED => self.decode_reference_cleared(),
            TAG_REMOVAL_DENIED => self.decode_removal_denied(),
            TAG_PARTITION_SUMMARY => self.decode_partition_summary(),
            TAG_REFERENCE_REWRITTEN => self.decode_reference_rewritten(),
            TAG_BEHAVIOR_REMOVED => self.decode_behavior_removed(),
            TAG_NODE_COLLAPSED => self.decode_node_collapsed(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cleave_core::behavior::{Behavior, Custom, FieldValue, Image, Text};
    use cleave_core::classify::Capabilities;
    use cleave_core::node::NodeStore;
    use cleave_core::partition::{PartitionConfig, partition_with};
    use cleave_core::trace::Tracer;

    #[test]
    fn round_trip_phase_events() {
        let mut rec = RecorderSink::new();
        let begin = PhaseBeginEvent {
            phase: PartitionPhase::PruneText,
        };
        let end = PhaseEndEvent {
            phase: PartitionPhase::PruneText,
            items: 9,
        };
        rec.on_phase_begin(&begin);
        rec.on_phase_end(&end);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::PhaseBegin(begin), RecordedEvent::PhaseEnd(end)]
        );
    }

    #[test]
    fn round_trip_partition_summary() {
        let mut rec = RecorderSink::new();
        let orig = PartitionSummary {
            image_root: 4,
            text_root: 9,
            image_removed_behaviors: 3,
            text_collapsed_nodes: 1,
            references_rewritten: 2,
            warnings: 1,
            ..PartitionSummary::default()
        };
        rec.on_partition_summary(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::PartitionSummary(s)] => assert_eq!(s, &orig),
            other => panic!("expected PartitionSummary, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_node_collapsed(&NodeCollapsedEvent { node: 1, pass: 1 });
        rec.on_behavior_removed(&BehaviorRemovedEvent {
            node: 2,
            category: Category::TextRenderable,
        });
        let bytes = rec.into_bytes();

        assert_eq!(decode(&bytes).count(), 2);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 1);
        assert_eq!(decode(&[0xFF, 0, 0]).count(), 0);
    }

    #[test]
    fn records_a_whole_partition() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        store.attach(root, Behavior::RectTransform);
        store.attach(root, Behavior::Image(Image::default()));
        let label = store.create_node("label");
        store.add_child(root, label);
        let text = store.attach(label, Behavior::Text(Text::new("hi")));
        store.attach(
            root,
            Behavior::Custom(
                Custom::new("Binder", Capabilities::LAYOUT)
                    .with_field("label", FieldValue::Reference(Some(text))),
            ),
        );

        let mut rec = RecorderSink::new();
        let mut tracer = Tracer::new(&mut rec);
        let result =
            partition_with(&mut store, root, &PartitionConfig::new(), &mut tracer).unwrap();
        drop(tracer);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let begins = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::PhaseBegin(_)))
            .count();
        assert_eq!(begins, PartitionPhase::ALL.len());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RecordedEvent::ReferenceRewritten(r) if r.from != r.to))
        );
        match events.last() {
            Some(RecordedEvent::PartitionSummary(s)) => {
                assert_eq!(s, &result.summary());
                assert_eq!(s.references_rewritten, 1);
            }
            other => panic!("expected PartitionSummary last, got {other:?}"),
        }
    }
}
