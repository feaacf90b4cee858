// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use understory_placement::presets::tooltip;
use understory_placement::{
    AlignDescriptor, AlignSource, BuiltinPlacements, place, placement_class_name,
};

/// A table padded with `extra` synthetic entries ahead of the tooltip presets.
fn padded_table(extra: usize) -> BuiltinPlacements {
    let mut table = BuiltinPlacements::new();
    for i in 0..extra {
        table.insert(
            format!("custom{i}"),
            AlignDescriptor {
                offset: Some(Vec2::new(i as f64, 0.0)),
                ..Default::default()
            },
        );
    }
    for p in tooltip().iter() {
        table.insert_placement(p.clone());
    }
    table
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let user = AlignDescriptor {
        offset: Some(Vec2::new(2.0, 2.0)),
        ..Default::default()
    };
    for &extra in &[0usize, 64, 512] {
        let table = padded_table(extra);
        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("by_name_extra{}", extra), |b| {
            b.iter(|| {
                black_box(table.resolve(
                    black_box(Some("leftBottom")),
                    &user,
                    AlignSource::Element,
                ))
            });
        });
        let reported = table.get("leftBottom").map(|p| p.align.clone()).unwrap_or_default();
        group.bench_function(format!("class_name_extra{}", extra), |b| {
            b.iter(|| {
                black_box(placement_class_name(
                    &table,
                    "understory-popup",
                    black_box(&reported),
                    AlignSource::Element,
                ))
            });
        });
    }
    group.finish();
}

fn bench_place(c: &mut Criterion) {
    let table = tooltip();
    let target = Rect::new(100.0, 100.0, 180.0, 124.0);
    let popup = Size::new(120.0, 40.0);
    let aligns: Vec<AlignDescriptor> = table.iter().map(|p| p.align.clone()).collect();

    let mut group = c.benchmark_group("place");
    group.throughput(Throughput::Elements(aligns.len() as u64));
    group.bench_function("tooltip_presets", |b| {
        b.iter(|| {
            for a in &aligns {
                black_box(place(popup, black_box(target), a));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_place);
criterion_main!(benches);
