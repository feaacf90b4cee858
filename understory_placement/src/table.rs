// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement table and resolver.
//!
//! ## Overview
//!
//! [`BuiltinPlacements`] is an ordered table of named [`Placement`]s.
//! [`resolve`] picks one by name and merges the caller's override on top.
//! [`placement_class_name`] runs the other direction: given the points an overlay actually used,
//! it finds the placement those points belong to.
//!
//! Table order matters only for [`placement_class_name`], where the first matching entry wins.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{AlignDescriptor, AlignPoint};

/// Which kind of anchor a popup aligns to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AlignSource {
    /// Align to the anchor element's bounding box.
    #[default]
    Element,
    /// Align to a captured pointer position.
    Point,
}

/// A named placement preset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Placement {
    /// Name used to select this placement, e.g. `"bottomLeft"`.
    pub name: String,
    /// Descriptor used when aligning to an element.
    pub align: AlignDescriptor,
    /// Descriptor used when aligning to a point; falls back to `align` when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub point_align: Option<AlignDescriptor>,
}

impl Placement {
    /// Descriptor for the given alignment source.
    pub fn for_source(&self, source: AlignSource) -> &AlignDescriptor {
        match (source, &self.point_align) {
            (AlignSource::Point, Some(point)) => point,
            _ => &self.align,
        }
    }
}

/// Ordered table of named placements.
///
/// Inserting a name that already exists replaces the entry in place, keeping its position.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BuiltinPlacements {
    entries: Vec<Placement>,
}

impl BuiltinPlacements {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an element-oriented placement.
    pub fn insert(&mut self, name: impl Into<String>, align: AlignDescriptor) {
        self.insert_placement(Placement {
            name: name.into(),
            align,
            point_align: None,
        });
    }

    /// Insert a placement with separate element and point descriptors.
    pub fn insert_with_point(
        &mut self,
        name: impl Into<String>,
        align: AlignDescriptor,
        point_align: AlignDescriptor,
    ) {
        self.insert_placement(Placement {
            name: name.into(),
            align,
            point_align: Some(point_align),
        });
    }

    /// Insert a fully specified placement.
    pub fn insert_placement(&mut self, placement: Placement) {
        if let Some(slot) = self.entries.iter_mut().find(|p| p.name == placement.name) {
            *slot = placement;
        } else {
            self.entries.push(placement);
        }
    }

    /// Look up a placement by name.
    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.entries.iter().find(|p| p.name == name)
    }

    /// Iterate placements in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter()
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table holds no placements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Method form of [`resolve`].
    pub fn resolve(
        &self,
        placement: Option<&str>,
        user_align: &AlignDescriptor,
        source: AlignSource,
    ) -> AlignDescriptor {
        resolve(placement, self, user_align, source)
    }
}

impl FromIterator<Placement> for BuiltinPlacements {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        let mut table = Self::new();
        for p in iter {
            table.insert_placement(p);
        }
        table
    }
}

/// Resolve a placement name into a concrete descriptor.
///
/// - If `placement` is `None` or not in `table`, returns `user_align` unchanged.
/// - Otherwise starts from the table entry (the point descriptor when `source` is
///   [`AlignSource::Point`] and one exists) and merges `user_align` on top, field by field.
pub fn resolve(
    placement: Option<&str>,
    table: &BuiltinPlacements,
    user_align: &AlignDescriptor,
    source: AlignSource,
) -> AlignDescriptor {
    match placement.and_then(|name| table.get(name)) {
        Some(entry) => entry.for_source(source).merged(user_align),
        None => user_align.clone(),
    }
}

fn points_eq(a: &[AlignPoint; 2], b: &[AlignPoint; 2], source: AlignSource) -> bool {
    match source {
        // The target side of a point-aligned popup is the pointer, so only the popup side counts.
        AlignSource::Point => a[0] == b[0],
        AlignSource::Element => a == b,
    }
}

/// Derive `"{prefix}-placement-{name}"` for the placement whose points match `reported`.
///
/// `reported` is the descriptor the overlay actually applied after layout.
/// Returns `None` when the report carries no points or no placement matches.
/// The result is cosmetic and never feeds back into alignment.
pub fn placement_class_name(
    table: &BuiltinPlacements,
    prefix: &str,
    reported: &AlignDescriptor,
    source: AlignSource,
) -> Option<String> {
    let reported_points = reported.points.as_ref()?;
    table
        .iter()
        .find(|p| {
            p.for_source(source)
                .points
                .as_ref()
                .is_some_and(|pts| points_eq(pts, reported_points, source))
        })
        .map(|p| format!("{prefix}-placement-{}", p.name))
}
