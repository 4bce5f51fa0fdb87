// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redirecting image-copy references into the text copy.
//!
//! After cloning, a behavior in the image copy that points at a text
//! renderable points at the image copy's own instance, which pruning is about
//! to remove. [`rewrite_with_indices`] takes the path of the referenced node,
//! looks the same path up in the text copy, and retargets the reference at
//! the matching text renderable there. A reference with no counterpart is
//! cleared and reported.
//!
//! This must run while both copies are still structurally identical, before
//! either is pruned.

use alloc::string::String;
use alloc::vec::Vec;

use crate::behavior::BehaviorRef;
use crate::classify::{Category, classify};
use crate::error::Warning;
use crate::node::{BehaviorId, NodeId, NodeStore};
use crate::path::PathIndex;
use crate::trace::{ReferenceClearedEvent, Tracer};

/// What a rewrite did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// References redirected into the text copy.
    pub rewritten: usize,
    /// References cleared for lack of a counterpart.
    pub cleared: usize,
    /// One [`Warning::UnresolvedReference`] per cleared reference.
    pub warnings: Vec<Warning>,
}

/// A reference slot scheduled for rewriting.
struct Pending {
    holder: BehaviorId,
    slot: usize,
    field: String,
    target: BehaviorId,
}

/// Indexes both copies and rewrites the image copy's references.
pub fn rewrite(
    store: &mut NodeStore,
    image_root: NodeId,
    text_root: NodeId,
    tracer: &mut Tracer<'_>,
) -> RewriteOutcome {
    let image_index = PathIndex::build(store, image_root);
    let text_index = PathIndex::build(store, text_root);
    rewrite_with_indices(store, &image_index, &text_index, tracer)
}

/// Rewrites every reference in the image copy that targets a text renderable
/// inside the image copy.
///
/// References to targets outside the image copy, or to anything other than
/// a text renderable, are left untouched.
pub fn rewrite_with_indices(
    store: &mut NodeStore,
    image_index: &PathIndex,
    text_index: &PathIndex,
    tracer: &mut Tracer<'_>,
) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();

    for pending in collect_pending(store, image_index) {
        let owner = store.owner(pending.target);
        let Some(path) = image_index.path_of(owner) else {
            continue;
        };

        let matched = text_index
            .get(path)
            .and_then(|node| counterpart(store, owner, node, pending.target));

        match matched {
            Some(replacement) => {
                store.set_reference(pending.holder, pending.slot, Some(replacement));
                outcome.rewritten += 1;
                #[cfg(feature = "trace-rich")]
                tracer.reference_rewritten(&crate::trace::ReferenceRewrittenEvent {
                    holder: pending.holder.index(),
                    slot: crate::trace::saturate(pending.slot),
                    from: pending.target.index(),
                    to: replacement.index(),
                });
            }
            None => {
                store.set_reference(pending.holder, pending.slot, None);
                outcome.cleared += 1;
                tracer.reference_cleared(&ReferenceClearedEvent {
                    holder: pending.holder.index(),
                    slot: crate::trace::saturate(pending.slot),
                    target_node: owner.index(),
                });
                outcome.warnings.push(Warning::UnresolvedReference {
                    holder: pending.holder,
                    field: pending.field,
                    path: path.clone(),
                });
            }
        }
    }

    outcome
}

/// Lists every live reference in the indexed subtree whose target is a text
/// renderable, in pre-order of the holders.
fn collect_pending(store: &NodeStore, index: &PathIndex) -> Vec<Pending> {
    let mut pending = Vec::new();
    for (_, node) in index.iter() {
        for &holder in store.behaviors(node) {
            for field in store.behavior(holder).references() {
                let Some(target) = field.target else {
                    continue;
                };
                if store.is_behavior_alive(target)
                    && classify(store.behavior(target)) == Category::TextRenderable
                {
                    pending.push(Pending {
                        holder,
                        slot: field.slot,
                        field: String::from(field.name),
                        target,
                    });
                }
            }
        }
    }
    pending
}

/// Picks the behavior on `counterpart_node` matching `target` on `node`.
///
/// The match is the same-category behavior at the same ordinal among
/// same-category behaviors, falling back to the first one.
fn counterpart(
    store: &NodeStore,
    node: NodeId,
    counterpart_node: NodeId,
    target: BehaviorId,
) -> BehaviorRef {
    let category = classify(store.behavior(target));
    let ordinal = store
        .behaviors(node)
        .iter()
        .filter(|b| classify(store.behavior(**b)) == category)
        .position(|b| *b == target)
        .unwrap_or(0);

    let candidates: Vec<BehaviorId> = store
        .behaviors(counterpart_node)
        .iter()
        .copied()
        .filter(|b| classify(store.behavior(*b)) == category)
        .collect();
    candidates
        .get(ordinal)
        .or_else(|| candidates.first())
        .copied()
}
