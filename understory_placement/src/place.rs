// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric placement of a popup box against a target box.
//!
//! This is the naive half of alignment: it puts the popup's reference point on the target's
//! reference point and applies the offsets. Overflow adjustment (flipping, shifting into the
//! viewport) is left to the overlay, which knows its viewport.

use kurbo::{Rect, Size, Vec2};

use crate::types::{AlignDescriptor, AlignPoint};

/// Compute the popup rectangle for `popup` aligned against `target` using `align`.
///
/// Missing points default to `["tl", "bl"]` (popup below the target, left edges aligned).
/// A point target is expressed as a zero-sized rectangle.
///
/// ```
/// use kurbo::{Rect, Size};
/// use understory_placement::{place, presets::tooltip};
///
/// let table = tooltip();
/// let bottom = &table.get("bottomLeft").unwrap().align;
/// let r = place(Size::new(80.0, 20.0), Rect::new(10.0, 10.0, 50.0, 30.0), bottom);
/// assert_eq!(r, Rect::new(10.0, 34.0, 90.0, 54.0));
/// ```
pub fn place(popup: Size, target: Rect, align: &AlignDescriptor) -> Rect {
    let [popup_point, target_point] = align
        .points
        .unwrap_or([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT]);
    let offset = align.offset.unwrap_or(Vec2::ZERO);
    let target_offset = align.target_offset.unwrap_or(Vec2::ZERO);

    let anchor = target_point.on_rect(target) - target_offset;
    let local = popup_point.on_rect(Rect::from_origin_size((0.0, 0.0), popup));
    let origin = anchor - local.to_vec2() + offset;
    Rect::from_origin_size(origin, popup)
}
