// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recordings and tree snapshots.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array of event objects. [`tree_snapshot`] renders a
//! subtree of a [`NodeStore`] (names, layouts, behaviors, and references as
//! paths) so two trees can be diffed textually.

use std::io::{self, Write};

use serde_json::{Value, json};

use cleave_core::classify::classify;
use cleave_core::node::{BehaviorId, NodeId, NodeStore};
use cleave_core::path::PathIndex;

use crate::recorder::{RecordedEvent, decode};

/// Converts recorded events into a JSON array.
///
/// Every element carries an `"event"` kind plus the event's fields. Slot
/// indices are emitted as plain numbers.
#[must_use]
pub fn events_to_json(bytes: &[u8]) -> Value {
    let events: Vec<Value> = decode(bytes).map(event_to_json).collect();
    Value::Array(events)
}

/// Writes recorded events as pretty-printed JSON.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &events_to_json(bytes))?;
    Ok(())
}

fn event_to_json(recorded: RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::PhaseBegin(e) => json!({
            "event": "phase_begin",
            "phase": e.phase.name(),
        }),
        RecordedEvent::PhaseEnd(e) => json!({
            "event": "phase_end",
            "phase": e.phase.name(),
            "items": e.items,
        }),
        RecordedEvent::ReferenceCleared(e) => json!({
            "event": "reference_cleared",
            "holder": e.holder,
            "slot": e.slot,
            "target_node": e.target_node,
        }),
        RecordedEvent::RemovalDenied(e) => json!({
            "event": "removal_denied",
            "behavior": e.behavior,
            "required_by": e.required_by,
            "node": e.node,
        }),
        RecordedEvent::PartitionSummary(s) => json!({
            "event": "partition_summary",
            "image_root": s.image_root,
            "text_root": s.text_root,
            "image": {
                "removed_behaviors": s.image_removed_behaviors,
                "collapsed_nodes": s.image_collapsed_nodes,
            },
            "text": {
                "removed_behaviors": s.text_removed_behaviors,
                "collapsed_nodes": s.text_collapsed_nodes,
            },
            "references_rewritten": s.references_rewritten,
            "references_cleared": s.references_cleared,
            "interaction_disabled": s.interaction_disabled,
            "missing_removed": s.missing_removed,
            "warnings": s.warnings,
        }),
        RecordedEvent::ReferenceRewritten(e) => json!({
            "event": "reference_rewritten",
            "holder": e.holder,
            "slot": e.slot,
            "from": e.from,
            "to": e.to,
        }),
        RecordedEvent::BehaviorRemoved(e) => json!({
            "event": "behavior_removed",
            "node": e.node,
            "category": format!("{:?}", e.category),
        }),
        RecordedEvent::NodeCollapsed(e) => json!({
            "event": "node_collapsed",
            "node": e.node,
            "pass": e.pass,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tree snapshots
// ---------------------------------------------------------------------------

/// Renders the subtree under `root` as nested JSON objects.
///
/// Reference targets are rendered as `"<path>#<ordinal>"`, where `path` is
/// the target owner's path relative to `root` and `ordinal` is the target's
/// position among the owner's behaviors. Targets outside the subtree render
/// as `"external"`, dead targets as `"dead"`, and empty slots as `null`.
#[must_use]
pub fn tree_snapshot(store: &NodeStore, root: NodeId) -> Value {
    let index = PathIndex::build(store, root);
    snapshot_node(store, &index, root)
}

fn snapshot_node(store: &NodeStore, index: &PathIndex, node: NodeId) -> Value {
    let layout = store.layout(node);
    let behaviors: Vec<Value> = store
        .behaviors(node)
        .iter()
        .map(|&id| {
            let behavior = store.behavior(id);
            let references: Vec<Value> = behavior
                .references()
                .iter()
                .map(|field| {
                    json!({
                        "name": field.name,
                        "target": field.target.map(|t| describe_target(store, index, t)),
                    })
                })
                .collect();
            json!({
                "type": behavior.type_name(),
                "category": format!("{:?}", classify(behavior)),
                "interactive": behavior.is_interactive(),
                "references": references,
            })
        })
        .collect();
    let children: Vec<Value> = store
        .children(node)
        .map(|child| snapshot_node(store, index, child))
        .collect();

    json!({
        "name": store.name(node),
        "layout": {
            "anchor_min": [layout.anchor_min.x, layout.anchor_min.y],
            "anchor_max": [layout.anchor_max.x, layout.anchor_max.y],
            "anchored_position": [layout.anchored_position.x, layout.anchored_position.y],
            "size_delta": [layout.size_delta.x, layout.size_delta.y],
            "pivot": [layout.pivot.x, layout.pivot.y],
            "local_scale": [layout.local_scale.x, layout.local_scale.y],
            "local_rotation": layout.local_rotation,
        },
        "behaviors": behaviors,
        "children": children,
    })
}

fn describe_target(store: &NodeStore, index: &PathIndex, target: BehaviorId) -> String {
    if !store.is_behavior_alive(target) {
        return "dead".into();
    }
    let owner = store.owner(target);
    let Some(path) = index.path_of(owner) else {
        return "external".into();
    };
    let ordinal = store
        .behaviors(owner)
        .iter()
        .position(|&b| b == target)
        .unwrap_or_default();
    format!("{path}#{ordinal}")
}
