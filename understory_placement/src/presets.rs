// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made placement tables.

use kurbo::Vec2;

use crate::table::BuiltinPlacements;
use crate::types::{AlignDescriptor, AlignPoint, Overflow};

/// Gap between a tooltip and its target.
pub const TOOLTIP_GAP: f64 = 4.0;

/// The twelve classic tooltip placements.
///
/// Names follow the `side` + `Alignment` convention (`top`, `topLeft`, `leftBottom`, ...).
/// Each entry allows overflow adjustment on both axes and sits [`TOOLTIP_GAP`] away from the target.
///
/// ```
/// use understory_placement::presets::tooltip;
/// use understory_placement::AlignPoint;
///
/// let table = tooltip();
/// let top = table.get("top").unwrap();
/// assert_eq!(top.align.points, Some([AlignPoint::BOTTOM_CENTER, AlignPoint::TOP_CENTER]));
/// ```
pub fn tooltip() -> BuiltinPlacements {
    use AlignPoint as P;
    let g = TOOLTIP_GAP;
    let rows: [(&str, [AlignPoint; 2], Vec2); 12] = [
        ("left", [P::CENTER_RIGHT, P::CENTER_LEFT], Vec2::new(-g, 0.0)),
        ("right", [P::CENTER_LEFT, P::CENTER_RIGHT], Vec2::new(g, 0.0)),
        ("top", [P::BOTTOM_CENTER, P::TOP_CENTER], Vec2::new(0.0, -g)),
        ("bottom", [P::TOP_CENTER, P::BOTTOM_CENTER], Vec2::new(0.0, g)),
        ("topLeft", [P::BOTTOM_LEFT, P::TOP_LEFT], Vec2::new(0.0, -g)),
        ("leftTop", [P::TOP_RIGHT, P::TOP_LEFT], Vec2::new(-g, 0.0)),
        ("topRight", [P::BOTTOM_RIGHT, P::TOP_RIGHT], Vec2::new(0.0, -g)),
        ("rightTop", [P::TOP_LEFT, P::TOP_RIGHT], Vec2::new(g, 0.0)),
        ("bottomRight", [P::TOP_RIGHT, P::BOTTOM_RIGHT], Vec2::new(0.0, g)),
        ("rightBottom", [P::BOTTOM_LEFT, P::BOTTOM_RIGHT], Vec2::new(g, 0.0)),
        ("bottomLeft", [P::TOP_LEFT, P::BOTTOM_LEFT], Vec2::new(0.0, g)),
        ("leftBottom", [P::BOTTOM_RIGHT, P::BOTTOM_LEFT], Vec2::new(-g, 0.0)),
    ];
    let mut table = BuiltinPlacements::new();
    for (name, points, offset) in rows {
        table.insert(
            name,
            AlignDescriptor {
                points: Some(points),
                offset: Some(offset),
                target_offset: Some(Vec2::ZERO),
                overflow: Some(Overflow::AUTO_ADJUST),
                ..Default::default()
            },
        );
    }
    table
}
