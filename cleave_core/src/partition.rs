// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The end-to-end split of a source tree into an image tree and a text tree.
//!
//! [`partition_with`] runs, in order:
//!
//! 1. **Clone**: two deep copies of the source.
//! 2. **StripMissing**: drop unresolved behaviors from both copies
//!    (optional, see [`PartitionConfig::strip_missing`]).
//! 3. **Index**: path indices for both copies; composite behaviors are
//!    reported here.
//! 4. **Rewrite**: image-copy references to text renderables are redirected
//!    into the text copy.
//! 5. **PruneImage** / **PruneText**: each copy is pruned to its keep-set.
//! 6. **DisableInteraction**: the text copy stops handling input.
//!
//! The source is never modified. The host decides what to do with the two
//! copies: [`PartitionResult::assemble`] parents them under a new node in the
//! source's place, and [`PartitionResult::discard`] destroys them.

use alloc::string::String;
use alloc::vec::Vec;

use crate::behavior::Behavior;
use crate::classify::{KeepSet, is_composite};
use crate::clone::clone_tree;
use crate::error::{InvalidRootReason, PartitionError, Warning};
use crate::node::{NodeId, NodeStore};
use crate::path::PathIndex;
use crate::prune::{PruneStats, drop_dangling_references, prune, strip_missing};
use crate::rewrite::rewrite_with_indices;
use crate::trace::{PartitionPhase, PartitionSummary, Tracer, saturate};

/// Partition settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Categories retained in the image copy.
    pub image_keep: KeepSet,
    /// Categories retained in the text copy.
    pub text_keep: KeepSet,
    /// Whether unresolved behaviors are dropped from both copies.
    pub strip_missing: bool,
    /// Name given to the image copy by [`PartitionResult::assemble`].
    pub image_layer_name: &'static str,
    /// Name given to the text copy by [`PartitionResult::assemble`].
    pub text_layer_name: &'static str,
    /// Whether [`PartitionResult::assemble`] resets the copies' local
    /// offset, rotation, and scale.
    pub reset_layer_transforms: bool,
}

impl PartitionConfig {
    /// The default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            image_keep: KeepSet::IMAGE_COPY,
            text_keep: KeepSet::TEXT_COPY,
            strip_missing: true,
            image_layer_name: "ImageLayer",
            text_layer_name: "TextLayer",
            reset_layer_transforms: true,
        }
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The two pruned copies and what it took to produce them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionResult {
    /// Root of the copy holding image renderables.
    pub image_root: NodeId,
    /// Root of the copy holding text renderables.
    pub text_root: NodeId,
    /// Pruning counts for the image copy.
    pub image: PruneStats,
    /// Pruning counts for the text copy.
    pub text: PruneStats,
    /// Image-copy references redirected into the text copy.
    pub references_rewritten: usize,
    /// Image-copy references cleared for lack of a counterpart.
    pub references_cleared: usize,
    /// Behaviors on the text copy whose input handling was turned off.
    pub interaction_disabled: usize,
    /// Unresolved behaviors dropped from both copies together.
    pub missing_removed: usize,
    /// Non-fatal anomalies, in the order they were found.
    pub warnings: Vec<Warning>,
}

impl PartitionResult {
    /// Parents both copies under a new node standing in for `source`.
    ///
    /// The new node takes the source's name and layout and a
    /// [`Behavior::RectTransform`]. The copies are renamed to the configured
    /// layer names and appended image first. If `source` has a parent, the
    /// new node is inserted directly before it. `source` itself is left in
    /// place for the host to remove.
    ///
    /// # Panics
    ///
    /// Panics if `source` or either copy is stale, or if a copy already has
    /// a parent.
    pub fn assemble(
        &self,
        store: &mut NodeStore,
        source: NodeId,
        config: &PartitionConfig,
    ) -> NodeId {
        let name = String::from(store.name(source));
        let merged = store.create_node(name);
        store.set_layout(merged, store.layout(source));
        store.attach(merged, Behavior::RectTransform);

        for (layer, layer_name) in [
            (self.image_root, config.image_layer_name),
            (self.text_root, config.text_layer_name),
        ] {
            store.set_name(layer, layer_name);
            if config.reset_layer_transforms {
                let mut layout = store.layout(layer);
                layout.reset_local_transform();
                store.set_layout(layer, layout);
            }
            store.add_child(merged, layer);
        }

        if store.parent(source).is_some() {
            store.insert_before(merged, source);
        }
        merged
    }

    /// Destroys both copies.
    pub fn discard(self, store: &mut NodeStore) {
        for root in [self.image_root, self.text_root] {
            if store.is_alive(root) {
                if store.parent(root).is_some() {
                    store.remove_from_parent(root);
                }
                store.destroy_subtree(root);
            }
        }
    }

    /// Returns the final counts as a trace summary.
    #[must_use]
    pub fn summary(&self) -> PartitionSummary {
        PartitionSummary {
            image_root: self.image_root.index(),
            text_root: self.text_root.index(),
            image_removed_behaviors: saturate(self.image.removed_behaviors),
            image_collapsed_nodes: saturate(self.image.collapsed_nodes),
            text_removed_behaviors: saturate(self.text.removed_behaviors),
            text_collapsed_nodes: saturate(self.text.collapsed_nodes),
            references_rewritten: saturate(self.references_rewritten),
            references_cleared: saturate(self.references_cleared),
            interaction_disabled: saturate(self.interaction_disabled),
            missing_removed: saturate(self.missing_removed),
            warnings: saturate(self.warnings.len()),
        }
    }
}

/// Splits `source` with the default configuration and no tracing.
///
/// # Errors
///
/// See [`partition_with`].
pub fn partition(
    store: &mut NodeStore,
    source: NodeId,
) -> Result<PartitionResult, PartitionError> {
    partition_with(store, source, &PartitionConfig::new(), &mut Tracer::none())
}

/// Splits `source` into an image copy and a text copy.
///
/// # Errors
///
/// Returns [`PartitionError::InvalidRoot`] if `source` is dead or has no
/// [`Behavior::RectTransform`]. Nothing has been created in that case.
pub fn partition_with(
    store: &mut NodeStore,
    source: NodeId,
    config: &PartitionConfig,
    tracer: &mut Tracer<'_>,
) -> Result<PartitionResult, PartitionError> {
    check_root(store, source)?;
    let mut warnings = Vec::new();

    tracer.phase_begin(PartitionPhase::Clone);
    let image_root = clone_tree(store, source);
    let text_root = clone_tree(store, source);
    tracer.phase_end(PartitionPhase::Clone, 2 * store.descendants(image_root).len());

    let mut missing_removed = 0;
    if config.strip_missing {
        tracer.phase_begin(PartitionPhase::StripMissing);
        missing_removed += strip_missing(store, image_root);
        missing_removed += strip_missing(store, text_root);
        tracer.phase_end(PartitionPhase::StripMissing, missing_removed);
    }

    tracer.phase_begin(PartitionPhase::Index);
    let image_index = PathIndex::build(store, image_root);
    let text_index = PathIndex::build(store, text_root);
    for (path, node) in image_index.iter() {
        for &behavior in store.behaviors(node) {
            let behavior = store.behavior(behavior);
            if is_composite(behavior) {
                warnings.push(Warning::CompositeBehavior {
                    type_name: String::from(behavior.type_name()),
                    path: path.clone(),
                });
            }
        }
    }
    tracer.phase_end(PartitionPhase::Index, image_index.len() + text_index.len());

    tracer.phase_begin(PartitionPhase::Rewrite);
    let rewrite = rewrite_with_indices(store, &image_index, &text_index, tracer);
    warnings.extend(rewrite.warnings);
    tracer.phase_end(PartitionPhase::Rewrite, rewrite.rewritten + rewrite.cleared);

    tracer.phase_begin(PartitionPhase::PruneImage);
    let (mut image, denied) = prune(store, image_root, config.image_keep, tracer);
    warnings.extend(denied);
    tracer.phase_end(PartitionPhase::PruneImage, image.removed_behaviors);

    tracer.phase_begin(PartitionPhase::PruneText);
    let (text, denied) = prune(store, text_root, config.text_keep, tracer);
    warnings.extend(denied);
    // Image-copy references into the text copy may have lost their target.
    image.references_dropped += drop_dangling_references(store, image_root);
    tracer.phase_end(PartitionPhase::PruneText, text.removed_behaviors);

    tracer.phase_begin(PartitionPhase::DisableInteraction);
    let interaction_disabled = disable_interaction(store, text_root);
    tracer.phase_end(PartitionPhase::DisableInteraction, interaction_disabled);

    let result = PartitionResult {
        image_root,
        text_root,
        image,
        text,
        references_rewritten: rewrite.rewritten,
        references_cleared: rewrite.cleared,
        interaction_disabled,
        missing_removed,
        warnings,
    };
    tracer.partition_summary(&result.summary());
    Ok(result)
}

/// Turns off input handling on every behavior in the subtree and returns how
/// many behaviors changed.
pub fn disable_interaction(store: &mut NodeStore, root: NodeId) -> usize {
    let mut changed = 0;
    for node in store.descendants(root) {
        let attached = store.behaviors(node).to_vec();
        for behavior in attached {
            if store.behavior(behavior).is_interactive()
                && store.behavior_mut(behavior).disable_interaction()
            {
                changed += 1;
            }
        }
    }
    changed
}

fn check_root(store: &NodeStore, source: NodeId) -> Result<(), PartitionError> {
    let reason = if !store.is_alive(source) {
        InvalidRootReason::Dead
    } else if !store
        .behaviors(source)
        .iter()
        .any(|b| matches!(store.behavior(*b), Behavior::RectTransform))
    {
        InvalidRootReason::NotVisual
    } else {
        return Ok(());
    };
    Err(PartitionError::InvalidRoot {
        root: source,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{
        Custom, FieldValue, Image, InputField, LayoutGroup, Missing, Selectable, SelectableKind,
        Text,
    };
    use crate::classify::{Capabilities, Category, classify};
    use crate::layout::RectLayout;
    use crate::path::{Path, path_of};
    use kurbo::Vec2;

    fn visual(store: &mut NodeStore, name: &str) -> NodeId {
        let node = store.create_node(name);
        store.attach(node, Behavior::RectTransform);
        node
    }

    fn categories(store: &NodeStore, node: NodeId) -> Vec<Category> {
        store
            .behaviors(node)
            .iter()
            .map(|b| classify(store.behavior(*b)))
            .collect()
    }

    #[test]
    fn split_scenario_with_layout_reference() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "root");
        let child1 = visual(&mut store, "child1");
        let child2 = visual(&mut store, "child2");
        store.add_child(root, child1);
        store.add_child(root, child2);
        store.attach(child1, Behavior::Image(Image::default()));
        let text = store.attach(child1, Behavior::Text(Text::new("label")));
        store.attach(
            child2,
            Behavior::Custom(
                Custom::new("Follower", Capabilities::LAYOUT)
                    .with_field("follow", FieldValue::Reference(Some(text))),
            ),
        );

        let result = partition(&mut store, root).unwrap();
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);

        let image1 = store.child_at(result.image_root, 0).unwrap();
        let text1 = store.child_at(result.text_root, 0).unwrap();
        let text2 = store.child_at(result.text_root, 1).unwrap();
        assert_eq!(
            categories(&store, image1),
            [Category::Structural, Category::ImageRenderable]
        );
        assert_eq!(
            categories(&store, text1),
            [Category::Structural, Category::TextRenderable]
        );

        let text_renderable = store.behaviors(text1)[1];
        let follower = store.behaviors(text2)[1];
        assert_eq!(
            store.behavior(follower).reference(0),
            Some(Some(text_renderable))
        );

        // The image copy's follower was redirected into the text copy too.
        let image2 = store.child_at(result.image_root, 1).unwrap();
        let image_follower = store.behaviors(image2)[1];
        assert_eq!(
            store.behavior(image_follower).reference(0),
            Some(Some(text_renderable))
        );
        assert_eq!(result.references_rewritten, 1);
        assert_eq!(result.references_cleared, 0);

        // Source untouched.
        assert_eq!(store.behaviors(child1).len(), 3);
        assert_eq!(store.behavior(store.behaviors(child2)[1]).reference(0), Some(Some(text)));
    }

    #[test]
    fn text_only_node_collapses_in_image_copy() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "root");
        let label = visual(&mut store, "label");
        store.add_child(root, label);
        store.attach(label, Behavior::Text(Text::new("hi")));

        let result = partition(&mut store, root).unwrap();
        assert_eq!(store.child_count(result.image_root), 0);
        assert_eq!(result.image.collapsed_nodes, 1);
        assert_eq!(store.child_count(result.text_root), 1);
        assert_eq!(result.text.collapsed_nodes, 0);
    }

    #[test]
    fn input_field_points_at_text_copy_and_text_copy_is_inert() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "field");
        let background = store.attach(root, Behavior::Image(Image::default()));
        let label = visual(&mut store, "text");
        let placeholder = visual(&mut store, "placeholder");
        store.add_child(root, label);
        store.add_child(root, placeholder);
        let text = store.attach(label, Behavior::Text(Text::new("")));
        let hint = store.attach(placeholder, Behavior::Text(Text::new("Enter name")));
        store.attach(
            root,
            Behavior::InputField(InputField {
                target_graphic: Some(background),
                text_component: Some(text),
                placeholder: Some(hint),
                ..InputField::default()
            }),
        );

        let result = partition(&mut store, root).unwrap();
        assert_eq!(result.references_rewritten, 2);

        let field = store.behaviors(result.image_root)[2];
        let text_label = store.child_at(result.text_root, 0).unwrap();
        let text_hint = store.child_at(result.text_root, 1).unwrap();
        let refs = store.behavior(field).references();
        assert_eq!(refs[0].target, Some(store.behaviors(result.image_root)[1]));
        assert_eq!(refs[1].target, Some(store.behaviors(text_label)[1]));
        assert_eq!(refs[2].target, Some(store.behaviors(text_hint)[1]));

        // Image copy keeps the control; text copy keeps only inert text.
        assert_eq!(store.child_count(result.image_root), 0);
        for node in store.descendants(result.text_root) {
            for &b in store.behaviors(node) {
                assert!(!store.behavior(b).is_interactive());
            }
        }
        assert_eq!(result.interaction_disabled, 2);
    }

    #[test]
    fn invalid_roots_are_rejected() {
        let mut store = NodeStore::new();
        let bare = store.create_node("bare");
        assert_eq!(
            partition(&mut store, bare),
            Err(PartitionError::InvalidRoot {
                root: bare,
                reason: InvalidRootReason::NotVisual,
            })
        );
        let dead = visual(&mut store, "dead");
        store.destroy_node(dead);
        assert_eq!(
            partition(&mut store, dead).map(|_| ()),
            Err(PartitionError::InvalidRoot {
                root: dead,
                reason: InvalidRootReason::Dead,
            })
        );
        // Nothing was created.
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn composite_and_missing_behaviors_are_reported() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "root");
        let icon = visual(&mut store, "icon");
        store.add_child(root, icon);
        store.attach(
            icon,
            Behavior::Custom(Custom::new(
                "IconLabel",
                Capabilities::IMAGE | Capabilities::TEXT,
            )),
        );
        store.attach(root, Behavior::Missing(Missing::default()));

        let result = partition(&mut store, root).unwrap();
        assert_eq!(result.missing_removed, 2);
        assert_eq!(
            result.warnings,
            [Warning::CompositeBehavior {
                type_name: "IconLabel".into(),
                path: Path::from_steps([0]),
            }]
        );
        // Classified as Other, so dropped from both copies.
        assert_eq!(result.image.collapsed_nodes, 1);
        assert_eq!(result.text.collapsed_nodes, 1);
    }

    #[test]
    fn assemble_replaces_source_position() {
        let mut store = NodeStore::new();
        let canvas = visual(&mut store, "Canvas");
        let before = visual(&mut store, "before");
        let source = visual(&mut store, "Button");
        store.add_child(canvas, before);
        store.add_child(canvas, source);
        store.set_layout(
            source,
            RectLayout::sized(160.0, 30.0).with_position(Vec2::new(5.0, 5.0)),
        );
        let bg = store.attach(source, Behavior::Image(Image::default()));
        store.attach(
            source,
            Behavior::Selectable(Selectable {
                target_graphic: Some(bg),
                ..Selectable::new(SelectableKind::Button)
            }),
        );
        let caption = visual(&mut store, "Caption");
        store.add_child(source, caption);
        store.attach(caption, Behavior::Text(Text::new("OK")));

        let config = PartitionConfig::new();
        let result = partition_with(&mut store, source, &config, &mut Tracer::none()).unwrap();
        let merged = result.assemble(&mut store, source, &config);

        assert_eq!(store.name(merged), "Button");
        assert_eq!(store.layout(merged), store.layout(source));
        assert_eq!(store.children(canvas).collect::<Vec<_>>(), [before, merged, source]);
        assert_eq!(
            store.children(merged).collect::<Vec<_>>(),
            [result.image_root, result.text_root]
        );
        assert_eq!(store.name(result.image_root), "ImageLayer");
        assert_eq!(store.name(result.text_root), "TextLayer");
        assert_eq!(store.layout(result.text_root).anchored_position, Vec2::ZERO);
        assert_eq!(
            path_of(&store, merged, store.child_at(result.text_root, 0).unwrap()),
            Some(Path::from_steps([1, 0]))
        );
    }

    #[test]
    fn discard_destroys_both_copies() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "root");
        let child = visual(&mut store, "child");
        store.add_child(root, child);
        store.attach(child, Behavior::LayoutGroup(LayoutGroup::default()));

        let before = store.node_count();
        let result = partition(&mut store, root).unwrap();
        assert_eq!(store.node_count(), before + 4);
        result.discard(&mut store);
        assert_eq!(store.node_count(), before);
    }

    #[test]
    fn config_defaults() {
        let config = PartitionConfig::default();
        assert_eq!(config, PartitionConfig::new());
        assert_eq!(config.image_layer_name, "ImageLayer");
        assert!(config.strip_missing);
        assert!(config.reset_layer_transforms);
    }

    #[test]
    fn pinned_text_in_image_copy_is_warned() {
        let mut store = NodeStore::new();
        let root = visual(&mut store, "root");
        let label = visual(&mut store, "label");
        store.add_child(root, label);
        store.attach(label, Behavior::Text(Text::new("shadowed")));
        store.attach(
            label,
            Behavior::Custom(
                Custom::new("Outline", Capabilities::LAYOUT).requiring(Category::TextRenderable),
            ),
        );

        let result = partition(&mut store, root).unwrap();
        let image_label = store.child_at(result.image_root, 0).unwrap();
        let attached = store.behaviors(image_label).to_vec();
        assert_eq!(
            result.warnings,
            [Warning::BehaviorRemovalDenied {
                behavior: attached[1],
                required_by: attached[2],
                path: Path::from_steps([0]),
            }]
        );
        assert_eq!(result.image.removed_behaviors, 0);
        assert_eq!(result.image.collapsed_nodes, 0);
        assert_eq!(classify(store.behavior(attached[1])), Category::TextRenderable);
    }
}
