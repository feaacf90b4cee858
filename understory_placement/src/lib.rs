// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: named popup placements and alignment descriptors.
//!
//! ## Overview
//!
//! A popup is positioned by an [`AlignDescriptor`]: a pair of reference points (one on the popup,
//! one on the target), offsets, and overflow hints.
//! Writing descriptors by hand for every popup is tedious, so toolkits keep a table of named
//! presets ("top", "bottomLeft", ...) and let callers pick one by name, optionally tweaking
//! individual fields.
//!
//! This crate provides that table ([`BuiltinPlacements`]) and the resolver that turns a placement
//! name plus user overrides into a concrete descriptor ([`resolve`]).
//! It does not measure or lay out anything; the overlay consuming the descriptor does that.
//!
//! ## Merging
//!
//! Resolution merges field by field: each field set in the user override replaces the preset's
//! field, and every field the override leaves unset keeps the preset value.
//! An unknown or absent placement name yields the user override unchanged.
//!
//! ```
//! use kurbo::Vec2;
//! use understory_placement::{AlignDescriptor, AlignPoint, AlignSource, BuiltinPlacements, resolve};
//!
//! let mut table = BuiltinPlacements::new();
//! table.insert(
//!     "bottomLeft",
//!     AlignDescriptor {
//!         points: Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT]),
//!         offset: Some(Vec2::ZERO),
//!         ..Default::default()
//!     },
//! );
//!
//! let user = AlignDescriptor { offset: Some(Vec2::new(10.0, 0.0)), ..Default::default() };
//! let align = resolve(Some("bottomLeft"), &table, &user, AlignSource::Element);
//! assert_eq!(align.offset, Some(Vec2::new(10.0, 0.0)));
//! assert_eq!(align.points, Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT]));
//! ```
//!
//! ## Point alignment
//!
//! Popups such as context menus are aligned to a captured pointer position rather than to an
//! element's box. A [`Placement`] may carry a separate point-oriented descriptor, selected by
//! passing [`AlignSource::Point`]; the choice is explicit and never inferred from the data.
//!
//! ## Class names
//!
//! After layout the overlay reports which points it actually used (it may have flipped to avoid
//! overflow). [`placement_class_name`] maps that report back to a placement name for styling.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` so tables can be loaded from configuration.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod place;
pub mod presets;
pub mod table;
pub mod types;

pub use place::place;
pub use table::{AlignSource, BuiltinPlacements, Placement, placement_class_name, resolve};
pub use types::{
    AlignDescriptor, AlignPoint, HorizontalEdge, Overflow, ParsePointError, VerticalEdge,
};
