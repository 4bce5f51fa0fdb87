// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behavior classification and keep-sets.
//!
//! [`classify`] maps every [`Behavior`] onto exactly one [`Category`]. The
//! mapping is a closed table over the built-in variants; [`Custom`]
//! behaviors are classified from their declared [`Capabilities`].
//!
//! A [`KeepSet`] is the category whitelist applied when pruning one of the
//! two partition copies. [`Category::Structural`] is always retained, since
//! removing it would take away a node's ability to exist in the tree.
//!
//! [`Custom`]: crate::behavior::Custom

use core::ops::BitOr;

use crate::behavior::Behavior;

/// The semantic category of a behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Tree-shape and render plumbing (rect transforms, canvases).
    Structural,
    /// Draws an image.
    ImageRenderable,
    /// Draws text.
    TextRenderable,
    /// Positions, sizes, groups, or clips nodes.
    LayoutOrClip,
    /// Handles user input.
    Interactive,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Structural,
        Self::ImageRenderable,
        Self::TextRenderable,
        Self::LayoutOrClip,
        Self::Interactive,
        Self::Other,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// What a host-described behavior does.
///
/// A behavior with exactly one capability is classified by it. Zero
/// capabilities, or more than one, classify as [`Category::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No declared capability.
    pub const NONE: Self = Self(0);
    /// Tree-shape or render plumbing.
    pub const STRUCTURAL: Self = Self(Category::Structural.bit());
    /// Draws an image.
    pub const IMAGE: Self = Self(Category::ImageRenderable.bit());
    /// Draws text.
    pub const TEXT: Self = Self(Category::TextRenderable.bit());
    /// Layout, grouping, or clipping.
    pub const LAYOUT: Self = Self(Category::LayoutOrClip.bit());
    /// Handles input.
    pub const INTERACTIVE: Self = Self(Category::Interactive.bit());

    /// Returns whether every capability in `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the number of declared capabilities.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A whitelist of categories retained when pruning a copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeepSet(u8);

impl KeepSet {
    /// Retains only structural behaviors.
    pub const STRUCTURAL_ONLY: Self = Self(Category::Structural.bit());

    /// Keep-set for the image copy: images, layout/clip, and input.
    pub const IMAGE_COPY: Self = Self::STRUCTURAL_ONLY
        .with(Category::ImageRenderable)
        .with(Category::LayoutOrClip)
        .with(Category::Interactive);

    /// Keep-set for the text copy: text and layout/clip.
    pub const TEXT_COPY: Self = Self::STRUCTURAL_ONLY
        .with(Category::TextRenderable)
        .with(Category::LayoutOrClip);

    /// Returns a copy that also retains `category`.
    #[must_use]
    pub const fn with(self, category: Category) -> Self {
        Self(self.0 | category.bit())
    }

    /// Returns a copy that no longer retains `category`.
    ///
    /// Removing [`Category::Structural`] has no effect.
    #[must_use]
    pub const fn without(self, category: Category) -> Self {
        Self((self.0 & !category.bit()) | Category::Structural.bit())
    }

    /// Returns whether behaviors of `category` are retained.
    #[must_use]
    pub const fn contains(self, category: Category) -> bool {
        matches!(category, Category::Structural) || self.0 & category.bit() != 0
    }

    /// Returns whether `behavior` is retained.
    #[must_use]
    pub fn keeps(self, behavior: &Behavior) -> bool {
        self.contains(classify(behavior))
    }
}

impl core::fmt::Debug for KeepSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(Category::ALL.iter().filter(|c| self.contains(**c)))
            .finish()
    }
}

/// Returns the category of `behavior`.
#[must_use]
pub fn classify(behavior: &Behavior) -> Category {
    match behavior {
        Behavior::RectTransform | Behavior::CanvasRenderer | Behavior::Canvas(_) => {
            Category::Structural
        }
        Behavior::Image(_) | Behavior::RawImage(_) => Category::ImageRenderable,
        Behavior::Text(_) => Category::TextRenderable,
        Behavior::Mask(_)
        | Behavior::RectMask(_)
        | Behavior::LayoutGroup(_)
        | Behavior::ContentSizeFitter(_)
        | Behavior::LayoutElement(_)
        | Behavior::CanvasGroup(_) => Category::LayoutOrClip,
        Behavior::Selectable(_) | Behavior::InputField(_) => Category::Interactive,
        Behavior::Missing(_) => Category::Other,
        Behavior::Custom(c) => classify_capabilities(c.capabilities),
    }
}

/// Returns whether `behavior` declares more than one capability.
///
/// Composite behaviors classify as [`Category::Other`] and are reported by
/// the partition as a warning.
#[must_use]
pub fn is_composite(behavior: &Behavior) -> bool {
    matches!(behavior, Behavior::Custom(c) if c.capabilities.count() > 1)
}

fn classify_capabilities(caps: Capabilities) -> Category {
    if caps.count() != 1 {
        return Category::Other;
    }
    Category::ALL
        .into_iter()
        .find(|c| caps.contains(Capabilities(c.bit())))
        .unwrap_or(Category::Other)
}
