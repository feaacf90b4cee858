// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics.
//!
//! Resolve a named placement with a user override, lay the popup out, and map a flipped
//! alignment back to a class name.
//!
//! Run:
//! - `cargo run -p understory_examples --example placement_basics`

use kurbo::{Rect, Size, Vec2};
use understory_placement::presets::tooltip;
use understory_placement::{AlignDescriptor, AlignSource, place, placement_class_name};

fn main() {
    let table = tooltip();
    let target = Rect::new(100.0, 100.0, 180.0, 124.0);
    let popup = Size::new(120.0, 40.0);

    // Override the offset: 8px right, keeping the 4px gap.
    let user = AlignDescriptor {
        offset: Some(Vec2::new(8.0, 4.0)),
        ..Default::default()
    };
    let align = table.resolve(Some("bottomLeft"), &user, AlignSource::Element);
    println!("== Resolved ==\n  {align:?}");

    let rect = place(popup, target, &align);
    println!("== Placed ==\n  {rect:?}");
    assert_eq!(rect, Rect::new(108.0, 128.0, 228.0, 168.0));

    // The overlay found no room below and flipped to the top.
    let flipped = table.resolve(Some("topLeft"), &AlignDescriptor::default(), AlignSource::Element);
    let class = placement_class_name(&table, "understory-popup", &flipped, AlignSource::Element);
    println!("== Class ==\n  {class:?}");
    assert_eq!(class.as_deref(), Some("understory-popup-placement-topLeft"));

    // Unknown names pass the override through unchanged.
    assert_eq!(table.resolve(Some("diagonal"), &user, AlignSource::Element), user);
}
