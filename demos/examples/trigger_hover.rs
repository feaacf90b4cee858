// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltip with delays.
//!
//! Drives a hover trigger with a virtual clock: a delayed show, a leave that is bridged by
//! moving onto the popup, and the final hide. A small overlay lays the popup out with
//! `understory_placement::place` and reports the applied alignment back.
//!
//! Run:
//! - `cargo run -p understory_examples --example trigger_hover`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Rect, Size};
use understory_placement::presets::tooltip;
use understory_placement::{AlignDescriptor, place};
use understory_trigger::action::ActionSet;
use understory_trigger::binder::{AnchorEvent, EventKind};
use understory_trigger::config::{TriggerCallbacks, TriggerConfig};
use understory_trigger::lifecycle::MountState;
use understory_trigger::overlay::{AnchorTarget, Overlay, PopupProps};
use understory_trigger::trigger::Trigger;
use understory_trigger::visibility::DelayConfig;

/// Lays the popup out and remembers the alignment it applied.
#[derive(Default)]
struct TooltipOverlay {
    size: Size,
    rect: Option<Rect>,
    applied: Option<AlignDescriptor>,
}

impl Overlay for TooltipOverlay {
    fn render(&mut self, props: &PopupProps<'_>) {
        println!("  render visible={} class={:?}", props.visible, props.class_name);
    }

    fn force_align(&mut self, target: AnchorTarget, align: &AlignDescriptor) {
        let rect = place(self.size, target.rect(), align);
        println!("  aligned to {rect:?}");
        self.rect = Some(rect);
        self.applied = Some(align.clone());
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn main() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    let mut tooltip_trigger = Trigger::new(
        TriggerConfig {
            action: ActionSet::HOVER,
            popup_placement: Some("top".into()),
            builtin_placements: tooltip(),
            delays: DelayConfig {
                mouse_enter: ms(300),
                ..Default::default()
            },
            ..Default::default()
        },
        TriggerCallbacks::new().on_visible_change(move |v| l.borrow_mut().push(v)),
    );
    let anchor = Rect::new(100.0, 100.0, 160.0, 120.0);
    let mut overlay = TooltipOverlay {
        size: Size::new(80.0, 24.0),
        ..Default::default()
    };

    println!("== Enter at t=0 ==");
    let enter = AnchorEvent::at(EventKind::MouseEnter, (110.0, 110.0));
    tooltip_trigger.handle_anchor_event(&enter, ms(0));
    println!("  next deadline: {:?}", tooltip_trigger.next_deadline());
    tooltip_trigger.poll(ms(16));
    assert!(!tooltip_trigger.is_visible());

    println!("== t=300 ==");
    tooltip_trigger.poll(ms(300));
    let state = tooltip_trigger.render(&mut overlay, &anchor);
    assert_eq!(state, MountState::Visible);
    if let Some(applied) = overlay.applied.take() {
        tooltip_trigger.on_align_complete(&applied);
    }
    println!("  class: {:?}", tooltip_trigger.class_name());
    assert_eq!(overlay.rect, Some(Rect::new(90.0, 72.0, 170.0, 96.0)));

    println!("== Leave anchor, reach popup ==");
    tooltip_trigger.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(1000));
    tooltip_trigger.on_popup_mouse_enter();
    tooltip_trigger.poll(ms(1200));
    assert!(tooltip_trigger.is_visible());

    println!("== Leave popup ==");
    tooltip_trigger.on_popup_mouse_leave(false, ms(2000));
    tooltip_trigger.poll(ms(2100));
    assert_eq!(tooltip_trigger.render(&mut overlay, &anchor), MountState::Tracked);

    println!("== Notifications ==\n  {:?}", log.borrow());
    assert_eq!(*log.borrow(), vec![true, false]);
}
