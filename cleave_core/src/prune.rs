// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keep-set pruning and empty-node collapse.
//!
//! [`prune`] runs two phases over one copy:
//!
//! 1. [`strip_behaviors`] detaches every behavior whose category is not in
//!    the keep-set. A behavior the store refuses to detach is skipped and
//!    reported; the partition carries on.
//! 2. [`collapse_empty`] repeatedly walks the tree bottom-up and removes
//!    nodes with no children and only structural behaviors, until a full
//!    pass removes nothing. The root is never removed.
//!
//! Finally any reference left pointing at a detached behavior is cleared,
//! so nothing in the pruned copy dangles.

use alloc::vec::Vec;

use crate::behavior::Behavior;
use crate::classify::{Category, KeepSet, classify};
use crate::error::{DetachError, Warning};
use crate::node::{BehaviorId, NodeId, NodeStore};
use crate::path::path_of;
use crate::trace::{RemovalDeniedEvent, Tracer};

/// Counts from pruning one copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneStats {
    /// Behaviors detached because their category was not kept.
    pub removed_behaviors: usize,
    /// Nodes removed by the collapse phase.
    pub collapsed_nodes: usize,
    /// Collapse passes run, including the final one that removed nothing.
    pub passes: usize,
    /// References cleared because their target was removed.
    pub references_dropped: usize,
}

/// Prunes the subtree at `root` down to `keep`.
///
/// Returns the counts and a [`Warning::BehaviorRemovalDenied`] for every
/// behavior that could not be detached.
pub fn prune(
    store: &mut NodeStore,
    root: NodeId,
    keep: KeepSet,
    tracer: &mut Tracer<'_>,
) -> (PruneStats, Vec<Warning>) {
    let (removed_behaviors, denied) = strip_behaviors(store, root, keep, tracer);
    let (collapsed_nodes, passes) = collapse_empty(store, root, tracer);
    let references_dropped = drop_dangling_references(store, root);
    let stats = PruneStats {
        removed_behaviors,
        collapsed_nodes,
        passes,
        references_dropped,
    };
    (stats, denied)
}

/// Detaches every behavior in the subtree whose category is not in `keep`.
///
/// On each node, behaviors are tried last-attached first, and refused ones
/// are retried for as long as a round detaches something, so a dependent is
/// removed before the behavior it depends on. Returns the number detached
/// and a warning per behavior that stayed.
pub fn strip_behaviors(
    store: &mut NodeStore,
    root: NodeId,
    keep: KeepSet,
    tracer: &mut Tracer<'_>,
) -> (usize, Vec<Warning>) {
    let mut removed = 0;
    let mut denied = Vec::new();

    for node in store.descendants(root) {
        let mut pending: Vec<BehaviorId> = store
            .behaviors(node)
            .iter()
            .copied()
            .filter(|b| !keep.keeps(store.behavior(*b)))
            .collect();

        let mut refusals = Vec::new();
        while !pending.is_empty() {
            refusals.clear();
            let before = pending.len();
            for &behavior in pending.iter().rev() {
                let category = classify(store.behavior(behavior));
                match store.detach(behavior) {
                    Ok(_) => {
                        removed += 1;
                        #[cfg(feature = "trace-rich")]
                        tracer.behavior_removed(&crate::trace::BehaviorRemovedEvent {
                            node: node.index(),
                            category,
                        });
                        #[cfg(not(feature = "trace-rich"))]
                        let _ = category;
                    }
                    Err(DetachError::Required { required_by, .. }) => {
                        refusals.push((behavior, required_by));
                    }
                }
            }
            pending.retain(|b| store.is_behavior_alive(*b));
            if pending.len() == before {
                break;
            }
        }

        for &(behavior, required_by) in refusals.iter().rev() {
            if !store.is_behavior_alive(behavior) {
                continue;
            }
            tracer.removal_denied(&RemovalDeniedEvent {
                behavior: behavior.index(),
                required_by: required_by.index(),
                node: node.index(),
            });
            denied.push(Warning::BehaviorRemovalDenied {
                behavior,
                required_by,
                path: path_of(store, root, node).unwrap_or_default(),
            });
        }
    }

    (removed, denied)
}

/// Removes empty nodes bottom-up until a pass removes nothing.
///
/// Returns the number of nodes removed and the number of passes, counting
/// the final pass that found nothing.
pub fn collapse_empty(
    store: &mut NodeStore,
    root: NodeId,
    tracer: &mut Tracer<'_>,
) -> (usize, usize) {
    let mut collapsed = 0;
    let mut passes = 0;
    loop {
        passes += 1;
        let mut removed_this_pass = 0;
        for node in store.post_order(root) {
            if node == root || !is_collapsible(store, node) {
                continue;
            }
            store.remove_from_parent(node);
            store.destroy_node(node);
            removed_this_pass += 1;
            #[cfg(feature = "trace-rich")]
            tracer.node_collapsed(&crate::trace::NodeCollapsedEvent {
                node: node.index(),
                pass: crate::trace::saturate(passes),
            });
        }
        collapsed += removed_this_pass;
        if removed_this_pass == 0 {
            break;
        }
    }
    #[cfg(not(feature = "trace-rich"))]
    let _ = tracer;
    (collapsed, passes)
}

/// Returns whether `node` has no children and only structural behaviors.
#[must_use]
pub fn is_collapsible(store: &NodeStore, node: NodeId) -> bool {
    store.child_count(node) == 0
        && store
            .behaviors(node)
            .iter()
            .all(|b| classify(store.behavior(*b)) == Category::Structural)
}

/// Detaches every [`Behavior::Missing`] in the subtree and returns how many
/// were removed.
///
/// A missing behavior pinned by a requirement stays attached and is not
/// counted.
pub fn strip_missing(store: &mut NodeStore, root: NodeId) -> usize {
    let mut removed = 0;
    for node in store.descendants(root) {
        let missing: Vec<BehaviorId> = store
            .behaviors(node)
            .iter()
            .copied()
            .filter(|b| matches!(store.behavior(*b), Behavior::Missing(_)))
            .collect();
        for behavior in missing.into_iter().rev() {
            if store.detach(behavior).is_ok() {
                removed += 1;
            }
        }
    }
    removed
}

/// Clears every reference in the subtree whose target no longer exists and
/// returns how many were cleared.
pub fn drop_dangling_references(store: &mut NodeStore, root: NodeId) -> usize {
    let mut dangling = Vec::new();
    for node in store.descendants(root) {
        for &holder in store.behaviors(node) {
            for field in store.behavior(holder).references() {
                if field.target.is_some_and(|t| !store.is_behavior_alive(t)) {
                    dangling.push((holder, field.slot));
                }
            }
        }
    }
    for &(holder, slot) in &dangling {
        store.set_reference(holder, slot, None);
    }
    dangling.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Custom, FieldValue, Image, LayoutGroup, Missing, Text};
    use crate::classify::Capabilities;
    use crate::path::Path;

    #[test]
    fn text_only_node_collapses_under_image_keep_set() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        store.attach(root, Behavior::RectTransform);
        let label = store.create_node("label");
        store.add_child(root, label);
        store.attach(label, Behavior::RectTransform);
        store.attach(label, Behavior::Text(Text::new("hello")));

        let (stats, warnings) = prune(&mut store, root, KeepSet::IMAGE_COPY, &mut Tracer::none());

        assert!(warnings.is_empty());
        assert!(!store.is_alive(label), "text-only node should collapse");
        assert_eq!(stats.removed_behaviors, 1);
        assert_eq!(stats.collapsed_nodes, 1);
        assert!(store.is_alive(root));
    }

    #[test]
    fn collapse_cascades_to_empty_parents() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let group = store.create_node("group");
        let leaf = store.create_node("leaf");
        let kept = store.create_node("kept");
        store.add_child(root, group);
        store.add_child(group, leaf);
        store.add_child(root, kept);
        store.attach(kept, Behavior::Image(Image::default()));

        let (collapsed, passes) = collapse_empty(&mut store, root, &mut Tracer::none());
        assert_eq!(collapsed, 2);
        assert_eq!(passes, 2);
        assert_eq!(store.children(root).collect::<Vec<_>>(), [kept]);

        // A second run at the fixed point removes nothing.
        assert_eq!(collapse_empty(&mut store, root, &mut Tracer::none()), (0, 1));
    }

    #[test]
    fn root_survives_when_everything_is_pruned() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        store.attach(root, Behavior::Text(Text::new("x")));
        let child = store.create_node("child");
        store.add_child(root, child);

        let (stats, _) = prune(&mut store, root, KeepSet::IMAGE_COPY, &mut Tracer::none());
        assert!(store.is_alive(root));
        assert!(store.behaviors(root).is_empty());
        assert_eq!(store.child_count(root), 0);
        assert_eq!(stats.collapsed_nodes, 1);
    }

    #[test]
    fn layout_behaviors_keep_a_leaf_alive() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let row = store.create_node("row");
        store.add_child(root, row);
        store.attach(row, Behavior::LayoutGroup(LayoutGroup::default()));

        let (stats, _) = prune(&mut store, root, KeepSet::TEXT_COPY, &mut Tracer::none());
        assert_eq!(stats.collapsed_nodes, 0);
        assert!(store.is_alive(row));
        assert!(!is_collapsible(&store, row));
    }

    #[test]
    fn dependent_is_removed_before_its_requirement() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        store.attach(root, Behavior::Image(Image::default()));
        store.attach(
            root,
            Behavior::Custom(
                Custom::new("Shadow", Capabilities::INTERACTIVE)
                    .requiring(Category::ImageRenderable),
            ),
        );

        // Both go: the shadow is tried first, then the image is free.
        let (removed, denied) =
            strip_behaviors(&mut store, root, KeepSet::TEXT_COPY, &mut Tracer::none());
        assert_eq!(removed, 2);
        assert!(denied.is_empty());
    }

    #[test]
    fn pinned_behavior_is_reported() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let child = store.create_node("child");
        store.add_child(root, child);
        let text = store.attach(child, Behavior::Text(Text::new("x")));
        let outline = store.attach(
            child,
            Behavior::Custom(
                Custom::new("Outline", Capabilities::LAYOUT).requiring(Category::TextRenderable),
            ),
        );

        let (stats, warnings) = prune(&mut store, root, KeepSet::IMAGE_COPY, &mut Tracer::none());
        assert_eq!(stats.removed_behaviors, 0);
        assert!(store.is_behavior_alive(text));
        assert_eq!(
            warnings,
            [Warning::BehaviorRemovalDenied {
                behavior: text,
                required_by: outline,
                path: Path::from_steps([0]),
            }]
        );
        // The node keeps a non-structural behavior, so it stays.
        assert!(store.is_alive(child));
    }

    #[test]
    fn strip_missing_counts_removed() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let child = store.create_node("child");
        store.add_child(root, child);
        store.attach(root, Behavior::Missing(Missing::default()));
        store.attach(child, Behavior::RectTransform);
        store.attach(
            child,
            Behavior::Missing(Missing {
                last_known_type: Some("OldScript".into()),
            }),
        );
        assert_eq!(strip_missing(&mut store, root), 2);
        assert_eq!(store.behaviors(child).len(), 1);
        assert_eq!(strip_missing(&mut store, root), 0);
    }

    #[test]
    fn references_to_removed_behaviors_are_dropped() {
        let mut store = NodeStore::new();
        let root = store.create_node("root");
        let image = store.attach(root, Behavior::Image(Image::default()));
        let binder = store.attach(
            root,
            Behavior::Custom(
                Custom::new("Binder", Capabilities::LAYOUT)
                    .with_field("icon", FieldValue::Reference(Some(image))),
            ),
        );

        let (stats, _) = prune(&mut store, root, KeepSet::TEXT_COPY, &mut Tracer::none());
        assert_eq!(stats.references_dropped, 1);
        assert_eq!(store.behavior(binder).reference(0), Some(None));
    }
}
