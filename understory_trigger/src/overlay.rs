// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator interfaces: what the trigger hands to the overlay, and what it asks of the host.

use kurbo::{Point, Rect};
use understory_placement::AlignDescriptor;

/// What the popup aligns against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnchorTarget {
    /// The anchor element's bounding box.
    Element(Rect),
    /// A captured pointer position.
    Point(Point),
}

impl AnchorTarget {
    /// The target as a rectangle (zero-sized for points).
    pub fn rect(self) -> Rect {
        match self {
            Self::Element(r) => r,
            Self::Point(p) => Rect::from_points(p, p),
        }
    }
}

/// Locates the anchor element at alignment time.
///
/// Returning `None` means the anchor is not currently in the document (detached, not laid out
/// yet). Alignment is then skipped for that cycle and retried on the next realignment.
pub trait AnchorLookup {
    /// Current bounds of the anchor in page coordinates.
    fn anchor_bounds(&self) -> Option<Rect>;
}

impl AnchorLookup for Option<Rect> {
    fn anchor_bounds(&self) -> Option<Rect> {
        *self
    }
}

impl AnchorLookup for Rect {
    fn anchor_bounds(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<F: Fn() -> Option<Rect>> AnchorLookup for F {
    fn anchor_bounds(&self) -> Option<Rect> {
        self()
    }
}

/// Everything the overlay needs for one render.
///
/// Styling fields are passed through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct PopupProps<'a> {
    /// Whether the popup is visible.
    pub visible: bool,
    /// Resolved alignment descriptor.
    pub align: &'a AlignDescriptor,
    /// What to align against, when it could be located.
    pub target: Option<AnchorTarget>,
    /// Class prefix, e.g. `understory-popup`.
    pub prefix_cls: &'a str,
    /// Consumer class names plus the class derived from the last reported alignment.
    pub class_name: &'a str,
    /// Render a modal backdrop.
    pub mask: bool,
    /// Stacking order.
    pub z_index: Option<i32>,
    /// Stretch the popup to the target's width/height (`"width"`, `"minHeight"`, ...).
    pub stretch: Option<&'a str>,
    /// Transition name for the popup.
    pub transition_name: Option<&'a str>,
    /// Transition name for the mask.
    pub mask_transition_name: Option<&'a str>,
    /// Animation name for the popup.
    pub animation: Option<&'a str>,
    /// Animation name for the mask.
    pub mask_animation: Option<&'a str>,
}

/// The externally rendered popup.
///
/// The overlay measures and positions itself. After aligning it reports the descriptor it
/// actually applied through [`Trigger::on_align_complete`](crate::trigger::Trigger::on_align_complete).
pub trait Overlay {
    /// Render with `props`.
    fn render(&mut self, props: &PopupProps<'_>);

    /// Re-measure and align against `target` now.
    fn force_align(&mut self, target: AnchorTarget, align: &AlignDescriptor);
}

/// Where a document-level pointer press landed, relative to the trigger.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DocumentHit {
    /// Inside the anchor element.
    pub in_anchor: bool,
    /// Inside the popup.
    pub in_popup: bool,
}

impl DocumentHit {
    /// Outside both the anchor and the popup.
    pub const OUTSIDE: Self = Self {
        in_anchor: false,
        in_popup: false,
    };
}

bitflags::bitflags! {
    /// Document and window listeners the host should attach while the popup is visible.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DocumentListeners: u8 {
        /// Pointer presses anywhere in the document (outside-click dismissal).
        const CLICK       = 0b0000_0001;
        /// Document scroll (closes context menus).
        const SCROLL      = 0b0000_0010;
        /// Window blur (closes context menus).
        const WINDOW_BLUR = 0b0000_0100;
    }
}
