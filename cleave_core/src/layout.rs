// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle layout attributes carried by every node.
//!
//! These mirror the anchor/pivot model common to retained UI trees: a node is
//! positioned relative to an anchor rectangle inside its parent, offset by
//! `anchored_position`, grown by `size_delta`, and scaled/rotated about its
//! pivot. Cleave never resolves these into world rectangles; it only copies
//! them between trees.

use kurbo::{Point, Vec2};

/// Layout attribute record for a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectLayout {
    /// Lower-left anchor in normalized parent space.
    pub anchor_min: Point,
    /// Upper-right anchor in normalized parent space.
    pub anchor_max: Point,
    /// Offset of the pivot from the anchor reference point.
    pub anchored_position: Vec2,
    /// Size relative to the distance between the anchors.
    pub size_delta: Vec2,
    /// Pivot in normalized local space.
    pub pivot: Point,
    /// Local scale along x and y.
    pub local_scale: Vec2,
    /// Local rotation around the z axis, in radians.
    pub local_rotation: f64,
}

impl RectLayout {
    /// Anchors and pivot at the parent's center, zero size, unit scale.
    pub const CENTERED: Self = Self {
        anchor_min: Point::new(0.5, 0.5),
        anchor_max: Point::new(0.5, 0.5),
        anchored_position: Vec2::ZERO,
        size_delta: Vec2::ZERO,
        pivot: Point::new(0.5, 0.5),
        local_scale: Vec2::new(1.0, 1.0),
        local_rotation: 0.0,
    };

    /// Anchors spanning the whole parent rectangle.
    pub const STRETCH: Self = Self {
        anchor_min: Point::ZERO,
        anchor_max: Point::new(1.0, 1.0),
        ..Self::CENTERED
    };

    /// Creates a centered layout with the given size.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            size_delta: Vec2::new(width, height),
            ..Self::CENTERED
        }
    }

    /// Returns a copy with `anchored_position` replaced.
    #[must_use]
    pub const fn with_position(mut self, position: Vec2) -> Self {
        self.anchored_position = position;
        self
    }

    /// Zeroes the local offset and rotation and restores unit scale.
    ///
    /// Anchors, pivot, and size are kept.
    pub fn reset_local_transform(&mut self) {
        self.anchored_position = Vec2::ZERO;
        self.local_rotation = 0.0;
        self.local_scale = Vec2::new(1.0, 1.0);
    }
}

impl Default for RectLayout {
    fn default() -> Self {
        Self::CENTERED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_anchors_and_size() {
        let mut layout = RectLayout {
            local_scale: Vec2::new(2.0, 3.0),
            local_rotation: 1.25,
            ..RectLayout::STRETCH.with_position(Vec2::new(10.0, -4.0))
        };
        layout.size_delta = Vec2::new(-20.0, -20.0);

        layout.reset_local_transform();

        assert_eq!(layout.anchored_position, Vec2::ZERO);
        assert_eq!(layout.local_scale, Vec2::new(1.0, 1.0));
        assert_eq!(layout.local_rotation, 0.0);
        assert_eq!(layout.anchor_max, Point::new(1.0, 1.0));
        assert_eq!(layout.size_delta, Vec2::new(-20.0, -20.0));
    }

    #[test]
    fn default_is_centered() {
        assert_eq!(RectLayout::default(), RectLayout::CENTERED);
        assert_eq!(RectLayout::sized(100.0, 40.0).pivot, Point::new(0.5, 0.5));
    }
}
