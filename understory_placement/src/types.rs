// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment types: reference points, overflow hints, and the descriptor itself.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect, Vec2};

/// Vertical component of an [`AlignPoint`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VerticalEdge {
    /// Top edge (`t`).
    Top,
    /// Vertical center (`c`).
    Center,
    /// Bottom edge (`b`).
    Bottom,
}

/// Horizontal component of an [`AlignPoint`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HorizontalEdge {
    /// Left edge (`l`).
    Left,
    /// Horizontal center (`c`).
    Center,
    /// Right edge (`r`).
    Right,
}

/// A reference point on a box, written as two letters: vertical then horizontal.
///
/// `"tl"` is the top-left corner, `"bc"` the middle of the bottom edge and `"cc"` the center.
/// Descriptors pair two of these: the first on the popup, the second on the target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct AlignPoint {
    /// Vertical component.
    pub vertical: VerticalEdge,
    /// Horizontal component.
    pub horizontal: HorizontalEdge,
}

impl AlignPoint {
    /// `tl`
    pub const TOP_LEFT: Self = Self::new(VerticalEdge::Top, HorizontalEdge::Left);
    /// `tc`
    pub const TOP_CENTER: Self = Self::new(VerticalEdge::Top, HorizontalEdge::Center);
    /// `tr`
    pub const TOP_RIGHT: Self = Self::new(VerticalEdge::Top, HorizontalEdge::Right);
    /// `cl`
    pub const CENTER_LEFT: Self = Self::new(VerticalEdge::Center, HorizontalEdge::Left);
    /// `cc`
    pub const CENTER: Self = Self::new(VerticalEdge::Center, HorizontalEdge::Center);
    /// `cr`
    pub const CENTER_RIGHT: Self = Self::new(VerticalEdge::Center, HorizontalEdge::Right);
    /// `bl`
    pub const BOTTOM_LEFT: Self = Self::new(VerticalEdge::Bottom, HorizontalEdge::Left);
    /// `bc`
    pub const BOTTOM_CENTER: Self = Self::new(VerticalEdge::Bottom, HorizontalEdge::Center);
    /// `br`
    pub const BOTTOM_RIGHT: Self = Self::new(VerticalEdge::Bottom, HorizontalEdge::Right);

    /// Build a point from its components.
    pub const fn new(vertical: VerticalEdge, horizontal: HorizontalEdge) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Locate this reference point on `rect`.
    pub fn on_rect(self, rect: Rect) -> Point {
        let x = match self.horizontal {
            HorizontalEdge::Left => rect.x0,
            HorizontalEdge::Center => rect.x0 + rect.width() / 2.0,
            HorizontalEdge::Right => rect.x1,
        };
        let y = match self.vertical {
            VerticalEdge::Top => rect.y0,
            VerticalEdge::Center => rect.y0 + rect.height() / 2.0,
            VerticalEdge::Bottom => rect.y1,
        };
        Point::new(x, y)
    }
}

impl fmt::Display for AlignPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            VerticalEdge::Top => 't',
            VerticalEdge::Center => 'c',
            VerticalEdge::Bottom => 'b',
        };
        let h = match self.horizontal {
            HorizontalEdge::Left => 'l',
            HorizontalEdge::Center => 'c',
            HorizontalEdge::Right => 'r',
        };
        write!(f, "{v}{h}")
    }
}

/// Error returned when parsing an [`AlignPoint`] from text.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid align point {input:?}: expected [tcb][lcr], e.g. \"tl\" or \"bc\"")]
pub struct ParsePointError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for AlignPoint {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePointError { input: s.into() };
        let mut chars = s.chars();
        let (Some(v), Some(h), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        let vertical = match v {
            't' => VerticalEdge::Top,
            'c' => VerticalEdge::Center,
            'b' => VerticalEdge::Bottom,
            _ => return Err(err()),
        };
        let horizontal = match h {
            'l' => HorizontalEdge::Left,
            'c' => HorizontalEdge::Center,
            'r' => HorizontalEdge::Right,
            _ => return Err(err()),
        };
        Ok(Self::new(vertical, horizontal))
    }
}

impl TryFrom<String> for AlignPoint {
    type Error = ParsePointError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AlignPoint> for String {
    fn from(p: AlignPoint) -> Self {
        use alloc::string::ToString;
        p.to_string()
    }
}

/// Overflow hints: whether the overlay may shift or flip to stay inside the viewport.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Overflow {
    /// Allow horizontal adjustment.
    pub adjust_x: Option<bool>,
    /// Allow vertical adjustment.
    pub adjust_y: Option<bool>,
    /// Measure overflow against the viewport instead of the scroll container.
    pub always_by_viewport: Option<bool>,
}

impl Overflow {
    /// Allow adjustment on both axes.
    pub const AUTO_ADJUST: Self = Self {
        adjust_x: Some(true),
        adjust_y: Some(true),
        always_by_viewport: None,
    };
}

/// Concrete alignment instructions for an overlay.
///
/// Every field is optional so that a partial descriptor can act as an override.
/// The overlay decides the defaults for fields left unset.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AlignDescriptor {
    /// `[popup point, target point]`: the popup point is placed on the target point.
    pub points: Option<[AlignPoint; 2]>,
    /// Offset applied to the popup after aligning the points.
    pub offset: Option<Vec2>,
    /// Offset subtracted from the target point.
    pub target_offset: Option<Vec2>,
    /// Overflow adjustment hints.
    pub overflow: Option<Overflow>,
    /// Position with `right` instead of `left`.
    pub use_css_right: Option<bool>,
    /// Position with `bottom` instead of `top`.
    pub use_css_bottom: Option<bool>,
    /// Position with a transform instead of offsets.
    pub use_css_transform: Option<bool>,
    /// Skip realignment when the target only moved by sub-pixel amounts.
    pub ignore_shake: Option<bool>,
}

impl AlignDescriptor {
    /// Merge `overrides` on top of `self`, field by field.
    ///
    /// Fields set in `overrides` win; unset fields keep the value from `self`.
    /// `overflow` is one field: an override replaces the preset's hints wholesale.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        Self {
            points: overrides.points.or(self.points),
            offset: overrides.offset.or(self.offset),
            target_offset: overrides.target_offset.or(self.target_offset),
            overflow: overrides.overflow.or(self.overflow),
            use_css_right: overrides.use_css_right.or(self.use_css_right),
            use_css_bottom: overrides.use_css_bottom.or(self.use_css_bottom),
            use_css_transform: overrides.use_css_transform.or(self.use_css_transform),
            ignore_shake: overrides.ignore_shake.or(self.ignore_shake),
        }
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
