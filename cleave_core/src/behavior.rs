// Copyright 2026 the Cleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The behavior catalog.
//!
//! A [`Behavior`] is a typed component attached to exactly one node. The set
//! of kinds is closed: built-in variants cover the usual renderables, layout
//! controllers, masks, and input widgets, and [`Custom`] lets a host describe
//! anything else by declaring its capabilities and fields.
//!
//! # Reference fields
//!
//! Some behaviors point at other behaviors (a button's target graphic, an
//! input field's text component). Each variant exposes those fields through
//! [`Behavior::references`] and [`Behavior::set_reference`], addressed by a
//! stable slot index. This is the only way the engine reads or writes a
//! behavior's fields, and only reference-typed fields are ever visited.

use alloc::string::String;
use alloc::vec::Vec;

use crate::classify::{Capabilities, Category};
use crate::node::{AssetId, BehaviorId};

/// A reference field value: either empty or a handle to another behavior.
pub type BehaviorRef = Option<BehaviorId>;

/// A component attached to a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Marks a node as a rectangle-laid-out visual element.
    ///
    /// The layout values themselves live on the node (see
    /// [`NodeStore::layout`](crate::node::NodeStore::layout)).
    RectTransform,
    /// Render plumbing that feeds graphics on the node to the canvas.
    CanvasRenderer,
    /// A canvas root.
    Canvas(Canvas),
    /// A sprite-backed image.
    Image(Image),
    /// A texture-backed image.
    RawImage(RawImage),
    /// A text renderer.
    Text(Text),
    /// A stencil mask driven by the node's graphic.
    Mask(Mask),
    /// A rectangular clip of the node's descendants.
    RectMask(RectMask),
    /// Arranges child nodes along an axis or in a grid.
    LayoutGroup(LayoutGroup),
    /// Resizes the node to fit its content.
    ContentSizeFitter(ContentSizeFitter),
    /// Layout size hints for the node.
    LayoutElement(LayoutElement),
    /// Group alpha and input gating for a subtree.
    CanvasGroup(CanvasGroup),
    /// A button, toggle, slider, or other selectable control.
    Selectable(Selectable),
    /// A text entry control.
    InputField(InputField),
    /// A behavior whose type the host could not resolve.
    Missing(Missing),
    /// A host-described behavior.
    Custom(Custom),
}

/// Canvas root settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    /// Draw order relative to other canvases.
    pub sort_order: i32,
    /// Whether this canvas overrides the sorting of its parent canvas.
    pub override_sorting: bool,
}

/// A sprite-backed image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Image {
    /// The sprite to draw, if any.
    pub sprite: Option<AssetId>,
    /// Tint color as linear RGBA.
    pub color: [f32; 4],
    /// Whether the image receives pointer input.
    pub raycast_target: bool,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            sprite: None,
            color: [1.0; 4],
            raycast_target: true,
        }
    }
}

/// A texture-backed image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawImage {
    /// The texture to draw, if any.
    pub texture: Option<AssetId>,
    /// Tint color as linear RGBA.
    pub color: [f32; 4],
    /// Whether the image receives pointer input.
    pub raycast_target: bool,
}

impl Default for RawImage {
    fn default() -> Self {
        Self {
            texture: None,
            color: [1.0; 4],
            raycast_target: true,
        }
    }
}

/// A text renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// The string to draw.
    pub content: String,
    /// Font asset, if any.
    pub font: Option<AssetId>,
    /// Font size in points.
    pub font_size: f32,
    /// Text color as linear RGBA.
    pub color: [f32; 4],
    /// Whether the text receives pointer input.
    pub raycast_target: bool,
}

impl Text {
    /// Creates a text renderer with default styling.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self {
            content: String::new(),
            font: None,
            font_size: 14.0,
            color: [0.0, 0.0, 0.0, 1.0],
            raycast_target: true,
        }
    }
}

/// A stencil mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    /// Whether the masking graphic is drawn as well as used for clipping.
    pub show_mask_graphic: bool,
}

/// A rectangular clip with per-edge softness.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectMask {
    /// Insets applied to the clip rectangle as (left, bottom, right, top).
    pub padding: [f32; 4],
    /// Edge softness in pixels.
    pub softness: [i32; 2],
}

/// Arrangement strategy for a [`LayoutGroup`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutAxis {
    /// Children laid out left to right.
    #[default]
    Horizontal,
    /// Children laid out top to bottom.
    Vertical,
    /// Children laid out in fixed-size cells.
    Grid,
}

/// Arranges child nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutGroup {
    /// Arrangement strategy.
    pub axis: LayoutAxis,
    /// Gap between children.
    pub spacing: f32,
    /// Insets as (left, right, top, bottom).
    pub padding: [i32; 4],
}

/// How a [`ContentSizeFitter`] sizes one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FitMode {
    /// The axis is left alone.
    #[default]
    Unconstrained,
    /// The axis takes the content's minimum size.
    MinSize,
    /// The axis takes the content's preferred size.
    PreferredSize,
}

/// Resizes the node to fit its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentSizeFitter {
    /// Horizontal fit mode.
    pub horizontal: FitMode,
    /// Vertical fit mode.
    pub vertical: FitMode,
}

/// Size hints consumed by a parent layout group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutElement {
    /// Whether the parent layout group skips this node.
    pub ignore_layout: bool,
    /// Minimum size, if overridden.
    pub min_size: Option<[f32; 2]>,
    /// Preferred size, if overridden.
    pub preferred_size: Option<[f32; 2]>,
}

/// Group alpha and input gating for a subtree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGroup {
    /// Alpha multiplier for the subtree.
    pub alpha: f32,
    /// Whether controls in the subtree accept input.
    pub interactable: bool,
    /// Whether the subtree blocks pointer rays.
    pub blocks_raycasts: bool,
}

impl Default for CanvasGroup {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            interactable: true,
            blocks_raycasts: true,
        }
    }
}

/// Which control a [`Selectable`] is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectableKind {
    /// A push button.
    #[default]
    Button,
    /// An on/off toggle.
    Toggle,
    /// A draggable slider.
    Slider,
    /// A scrollbar.
    Scrollbar,
}

/// A button, toggle, slider, or scrollbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selectable {
    /// Which control this is.
    pub kind: SelectableKind,
    /// Whether the control accepts input.
    pub interactable: bool,
    /// The graphic tinted on hover/press.
    pub target_graphic: BehaviorRef,
    /// A secondary graphic (a toggle's checkmark, a slider's fill).
    pub graphic: BehaviorRef,
}

impl Selectable {
    /// Creates an interactable control of the given kind with no graphics.
    #[must_use]
    pub const fn new(kind: SelectableKind) -> Self {
        Self {
            kind,
            interactable: true,
            target_graphic: None,
            graphic: None,
        }
    }
}

/// A text entry control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputField {
    /// Whether the field accepts input.
    pub interactable: bool,
    /// Maximum number of characters, zero for unlimited.
    pub character_limit: u32,
    /// The graphic tinted on hover/press.
    pub target_graphic: BehaviorRef,
    /// The text renderer showing the entered string.
    pub text_component: BehaviorRef,
    /// The renderer shown while the field is empty.
    pub placeholder: BehaviorRef,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            interactable: true,
            character_limit: 0,
            target_graphic: None,
            text_component: None,
            placeholder: None,
        }
    }
}

/// A behavior whose script or type could not be resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Missing {
    /// The type name the host last saw, if it kept one.
    pub last_known_type: Option<String>,
}

/// The value of a [`Custom`] behavior field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A reference to another behavior.
    Reference(BehaviorRef),
    /// A reference to a host asset.
    Asset(Option<AssetId>),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A flag.
    Flag(bool),
}

/// A named field of a [`Custom`] behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FieldValue,
}

impl Field {
    /// Creates a named field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A behavior described by the host.
///
/// The host declares what the behavior can do through [`Capabilities`];
/// the classifier derives a category from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Custom {
    /// Host type name, used in diagnostics.
    pub type_name: String,
    /// What the behavior does.
    pub capabilities: Capabilities,
    /// Named fields, in declaration order.
    pub fields: Vec<Field>,
    /// Categories that must stay present on the same node while this
    /// behavior is attached.
    pub requires: Vec<Category>,
    /// Whether the behavior intercepts pointer input.
    pub blocks_input: bool,
}

impl Custom {
    /// Creates a custom behavior with no fields or requirements.
    #[must_use]
    pub fn new(type_name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            type_name: type_name.into(),
            capabilities,
            fields: Vec::new(),
            requires: Vec::new(),
            blocks_input: false,
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    /// Declares a dependency on a category present on the same node.
    #[must_use]
    pub fn requiring(mut self, category: Category) -> Self {
        self.requires.push(category);
        self
    }
}

/// One reference-typed field as seen by [`Behavior::references`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceField<'a> {
    /// Slot index, stable for the lifetime of the behavior's shape.
    pub slot: usize,
    /// Field name.
    pub name: &'a str,
    /// Current value.
    pub target: BehaviorRef,
}

impl Behavior {
    /// Returns a short type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::RectTransform => "RectTransform",
            Self::CanvasRenderer => "CanvasRenderer",
            Self::Canvas(_) => "Canvas",
            Self::Image(_) => "Image",
            Self::RawImage(_) => "RawImage",
            Self::Text(_) => "Text",
            Self::Mask(_) => "Mask",
            Self::RectMask(_) => "RectMask",
            Self::LayoutGroup(_) => "LayoutGroup",
            Self::ContentSizeFitter(_) => "ContentSizeFitter",
            Self::LayoutElement(_) => "LayoutElement",
            Self::CanvasGroup(_) => "CanvasGroup",
            Self::Selectable(s) => match s.kind {
                SelectableKind::Button => "Button",
                SelectableKind::Toggle => "Toggle",
                SelectableKind::Slider => "Slider",
                SelectableKind::Scrollbar => "Scrollbar",
            },
            Self::InputField(_) => "InputField",
            Self::Missing(_) => "Missing",
            Self::Custom(c) => c.type_name.as_str(),
        }
    }

    /// Returns every reference-typed field in slot order.
    #[must_use]
    pub fn references(&self) -> Vec<ReferenceField<'_>> {
        fn push<'a>(out: &mut Vec<ReferenceField<'a>>, name: &'a str, target: BehaviorRef) {
            let slot = out.len();
            out.push(ReferenceField { slot, name, target });
        }

        let mut out = Vec::new();
        match self {
            Self::Selectable(s) => {
                push(&mut out, "target_graphic", s.target_graphic);
                push(&mut out, "graphic", s.graphic);
            }
            Self::InputField(f) => {
                push(&mut out, "target_graphic", f.target_graphic);
                push(&mut out, "text_component", f.text_component);
                push(&mut out, "placeholder", f.placeholder);
            }
            Self::Custom(c) => {
                for field in &c.fields {
                    if let FieldValue::Reference(target) = field.value {
                        push(&mut out, &field.name, target);
                    }
                }
            }
            _ => {}
        }
        out
    }

    /// Returns the value of reference slot `slot`, or `None` if the slot
    /// does not exist.
    #[must_use]
    pub fn reference(&self, slot: usize) -> Option<BehaviorRef> {
        self.references().get(slot).map(|field| field.target)
    }

    /// Writes reference slot `slot`. Returns `false` if the slot does not
    /// exist.
    pub fn set_reference(&mut self, slot: usize, value: BehaviorRef) -> bool {
        match self.reference_slot_mut(slot) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }

    /// Applies `f` to every reference slot.
    pub fn for_each_reference_mut(&mut self, mut f: impl FnMut(&mut BehaviorRef)) {
        match self {
            Self::Selectable(s) => {
                f(&mut s.target_graphic);
                f(&mut s.graphic);
            }
            Self::InputField(i) => {
                f(&mut i.target_graphic);
                f(&mut i.text_component);
                f(&mut i.placeholder);
            }
            Self::Custom(c) => {
                for field in &mut c.fields {
                    if let FieldValue::Reference(target) = &mut field.value {
                        f(target);
                    }
                }
            }
            _ => {}
        }
    }

    /// Clears every input-blocking flag. Returns whether anything changed.
    pub fn disable_interaction(&mut self) -> bool {
        fn clear(flag: &mut bool) -> bool {
            core::mem::replace(flag, false)
        }
        match self {
            Self::Image(i) => clear(&mut i.raycast_target),
            Self::RawImage(i) => clear(&mut i.raycast_target),
            Self::Text(t) => clear(&mut t.raycast_target),
            Self::CanvasGroup(g) => clear(&mut g.interactable) | clear(&mut g.blocks_raycasts),
            Self::Selectable(s) => clear(&mut s.interactable),
            Self::InputField(i) => clear(&mut i.interactable),
            Self::Custom(c) => clear(&mut c.blocks_input),
            _ => false,
        }
    }

    /// Returns whether the behavior currently accepts or blocks input.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match self {
            Self::Image(i) => i.raycast_target,
            Self::RawImage(i) => i.raycast_target,
            Self::Text(t) => t.raycast_target,
            Self::CanvasGroup(g) => g.interactable || g.blocks_raycasts,
            Self::Selectable(s) => s.interactable,
            Self::InputField(i) => i.interactable,
            Self::Custom(c) => c.blocks_input,
            _ => false,
        }
    }

    /// Categories this behavior needs present on its node.
    #[must_use]
    pub fn requirements(&self) -> &[Category] {
        match self {
            Self::Custom(c) => &c.requires,
            _ => &[],
        }
    }

    fn reference_slot_mut(&mut self, slot: usize) -> Option<&mut BehaviorRef> {
        match self {
            Self::Selectable(s) => match slot {
                0 => Some(&mut s.target_graphic),
                1 => Some(&mut s.graphic),
                _ => None,
            },
            Self::InputField(i) => match slot {
                0 => Some(&mut i.target_graphic),
                1 => Some(&mut i.text_component),
                2 => Some(&mut i.placeholder),
                _ => None,
            },
            Self::Custom(c) => c
                .fields
                .iter_mut()
                .filter_map(|field| match &mut field.value {
                    FieldValue::Reference(target) => Some(target),
                    _ => None,
                })
                .nth(slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(idx: u32) -> BehaviorId {
        BehaviorId { idx, generation: 0 }
    }

    #[test]
    fn input_field_exposes_three_slots() {
        let field = Behavior::InputField(InputField {
            text_component: Some(id(4)),
            ..InputField::default()
        });
        let refs = field.references();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[1].name, "text_component");
        assert_eq!(refs[1].target, Some(id(4)));
        assert_eq!(field.reference(2), Some(None));
        assert_eq!(field.reference(3), None);
    }

    #[test]
    fn custom_slots_skip_non_reference_fields() {
        let mut custom = Behavior::Custom(
            Custom::new("Tooltip", Capabilities::LAYOUT)
                .with_field("delay", FieldValue::Number(0.5))
                .with_field("label", FieldValue::Reference(Some(id(1))))
                .with_field("title", FieldValue::Text("hi".into()))
                .with_field("icon", FieldValue::Reference(None)),
        );

        let refs = custom.references();
        assert_eq!(refs.len(), 2);
        assert_eq!((refs[0].slot, refs[0].name), (0, "label"));
        assert_eq!((refs[1].slot, refs[1].name), (1, "icon"));

        assert!(custom.set_reference(1, Some(id(9))));
        assert!(!custom.set_reference(2, Some(id(9))));
        assert_eq!(custom.reference(1), Some(Some(id(9))));

        let Behavior::Custom(c) = &custom else {
            unreachable!("constructed as custom");
        };
        assert_eq!(c.fields[0].value, FieldValue::Number(0.5));
        assert_eq!(c.fields[2].value, FieldValue::Text("hi".into()));
    }

    #[test]
    fn behaviors_without_references_report_none() {
        let image = Behavior::Image(Image::default());
        assert!(image.references().is_empty());
        let mut text = Behavior::Text(Text::new("x"));
        assert!(!text.set_reference(0, None));
    }

    #[test]
    fn for_each_reference_mut_visits_every_slot() {
        let mut toggle = Behavior::Selectable(Selectable {
            target_graphic: Some(id(1)),
            graphic: Some(id(2)),
            ..Selectable::new(SelectableKind::Toggle)
        });
        let mut seen = 0;
        toggle.for_each_reference_mut(|r| {
            seen += 1;
            *r = None;
        });
        assert_eq!(seen, 2);
        assert!(toggle.references().iter().all(|r| r.target.is_none()));
        assert_eq!(toggle.type_name(), "Toggle");
    }

    #[test]
    fn disable_interaction_reports_changes_once() {
        let mut group = Behavior::CanvasGroup(CanvasGroup::default());
        assert!(group.is_interactive());
        assert!(group.disable_interaction());
        assert!(!group.is_interactive());
        assert!(!group.disable_interaction());

        let mut mask = Behavior::Mask(Mask::default());
        assert!(!mask.disable_interaction());
    }
}
