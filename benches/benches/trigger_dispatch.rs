// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_placement::AlignDescriptor;
use understory_trigger::action::ActionSet;
use understory_trigger::binder::{AnchorEvent, EventKind};
use understory_trigger::config::{TriggerCallbacks, TriggerConfig};
use understory_trigger::overlay::{AnchorTarget, Overlay, PopupProps};
use understory_trigger::trigger::Trigger;

struct NullOverlay;

impl Overlay for NullOverlay {
    fn render(&mut self, props: &PopupProps<'_>) {
        black_box(props.visible);
    }

    fn force_align(&mut self, target: AnchorTarget, align: &AlignDescriptor) {
        black_box((target, align));
    }
}

fn hover_trigger() -> Trigger {
    Trigger::new(
        TriggerConfig {
            action: ActionSet::HOVER | ActionSet::FOCUS,
            align_point: true,
            ..Default::default()
        },
        TriggerCallbacks::new(),
    )
}

/// Pointer sweeps: enter, move `n` times, leave, with a poll per event.
fn bench_hover_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover_sweep");
    for &n in &[16usize, 256] {
        let enter = AnchorEvent::at(EventKind::MouseEnter, (0.0, 0.0));
        let events: Vec<AnchorEvent> = std::iter::once(enter)
            .chain((0..n).map(|i| AnchorEvent::at(EventKind::MouseMove, (i as f64, 1.0))))
            .chain(std::iter::once(AnchorEvent::new(EventKind::MouseLeave)))
            .collect();
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(format!("events_n{}", n), |b| {
            b.iter_batched(
                hover_trigger,
                |mut trigger| {
                    for (i, e) in events.iter().enumerate() {
                        let now = Duration::from_millis(i as u64);
                        black_box(trigger.handle_anchor_event(e, now));
                        trigger.poll(now);
                    }
                    trigger.poll(Duration::from_secs(10));
                    trigger
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_render_realign(c: &mut Criterion) {
    let anchor = kurbo::Rect::new(0.0, 0.0, 40.0, 20.0);
    let mut group = c.benchmark_group("render");
    group.bench_function("move_and_render", |b| {
        let mut trigger = hover_trigger();
        let mut overlay = NullOverlay;
        let enter = AnchorEvent::at(EventKind::MouseEnter, (1.0, 1.0));
        trigger.handle_anchor_event(&enter, Duration::ZERO);
        let mut x = 0.0;
        b.iter(|| {
            x += 1.0;
            let moved = AnchorEvent::at(EventKind::MouseMove, (x, 1.0));
            trigger.handle_anchor_event(&moved, Duration::ZERO);
            black_box(trigger.render(&mut overlay, &anchor));
        });
    });
    group.finish();
}

criterion_group!(benches, bench_hover_sweep, bench_render_realign);
criterion_main!(benches);
