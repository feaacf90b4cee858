// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu with a nested submenu.
//!
//! The menu opens at the pointer and is aligned to that point. A click-triggered submenu lives
//! inside the menu; pressing inside the submenu must not dismiss the outer menu as an outside
//! click, which the linked popup mouse-down flags take care of.
//!
//! Run:
//! - `cargo run -p understory_examples --example trigger_context_menu`

use std::time::Duration;

use kurbo::{Point, Rect};
use understory_placement::AlignDescriptor;
use understory_trigger::action::ActionSet;
use understory_trigger::binder::{AnchorEvent, EventKind};
use understory_trigger::config::{TriggerCallbacks, TriggerConfig};
use understory_trigger::overlay::{
    AnchorTarget, DocumentHit, DocumentListeners, Overlay, PopupProps,
};
use understory_trigger::trigger::Trigger;

struct PrintOverlay(&'static str);

impl Overlay for PrintOverlay {
    fn render(&mut self, props: &PopupProps<'_>) {
        println!("  [{}] render visible={}", self.0, props.visible);
    }

    fn force_align(&mut self, target: AnchorTarget, _align: &AlignDescriptor) {
        println!("  [{}] align to {target:?}", self.0);
    }
}

fn main() {
    let t = Duration::from_millis;
    let mut menu = Trigger::new(TriggerConfig::context_menu(), TriggerCallbacks::new());
    let mut submenu = Trigger::new(
        TriggerConfig {
            action: ActionSet::CLICK,
            parent: Some(menu.popup_mouse_down()),
            ..Default::default()
        },
        TriggerCallbacks::new(),
    );
    let canvas = Rect::new(0.0, 0.0, 800.0, 600.0);
    let item = Rect::new(200.0, 160.0, 320.0, 184.0);
    let mut menu_overlay = PrintOverlay("menu");
    let mut sub_overlay = PrintOverlay("submenu");

    println!("== Right click ==");
    let response =
        menu.handle_anchor_event(&AnchorEvent::at(EventKind::ContextMenu, (180.0, 150.0)), t(0));
    assert!(response.prevent_default);
    menu.render(&mut menu_overlay, &canvas);
    assert_eq!(menu.point(), Some(Point::new(180.0, 150.0)));
    assert!(menu.document_listeners().contains(DocumentListeners::SCROLL));

    println!("== Open submenu ==");
    submenu.handle_anchor_event(&AnchorEvent::new(EventKind::MouseDown), t(100));
    menu.on_document_click(DocumentHit {
        in_anchor: false,
        in_popup: true,
    });
    submenu.handle_anchor_event(&AnchorEvent::new(EventKind::Click), t(110));
    submenu.render(&mut sub_overlay, &item);
    menu.poll(t(120));
    submenu.poll(t(120));

    println!("== Press inside submenu ==");
    // The submenu popup is outside the menu's box, so the menu sees an outside press.
    submenu.on_popup_mouse_down();
    menu.on_document_click(DocumentHit::OUTSIDE);
    submenu.on_document_click(DocumentHit {
        in_anchor: false,
        in_popup: true,
    });
    assert!(menu.is_visible() && submenu.is_visible());
    menu.poll(t(200));
    submenu.poll(t(200));

    println!("== Scroll ==");
    menu.on_document_scroll();
    submenu.on_document_scroll();
    menu.render(&mut menu_overlay, &canvas);
    assert!(!menu.is_visible());
    // Scrolling does not close a click-driven popup.
    assert!(submenu.is_visible());
}
