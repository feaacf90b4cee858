// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event binding: which anchor events the trigger handles, and how.
//!
//! ## Overview
//!
//! Every anchor event kind maps to a pair of handlers:
//!
//! - **external** handlers supplied by the consumer, held in [`AnchorHandlers`]: the anchor's own
//!   handler and a trigger-level handler;
//! - an **internal** handler chosen by [`EventBinder`] from the configured actions.
//!
//! The order is fixed: external handlers run first (anchor's own, then trigger-level), then the
//! internal handler. External handlers only see a shared reference to the event, so the internal
//! handler always receives it unmodified. Neither side can suppress the other.
//!
//! ## Popup mouse-down
//!
//! A mouse-down inside the popup must not be mistaken for an outside click by the trigger (or by
//! any trigger whose popup contains this one). [`PopupMouseDown`] is a shared flag with an
//! explicit link to the parent trigger's flag; marking it marks the whole chain.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::Point;

use crate::action::ActionConfig;

/// Kinds of events delivered to the anchor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventKind {
    /// Primary click.
    Click,
    /// Primary button pressed.
    MouseDown,
    /// Touch started.
    TouchStart,
    /// Pointer entered the anchor.
    MouseEnter,
    /// Pointer left the anchor.
    MouseLeave,
    /// Pointer moved over the anchor.
    MouseMove,
    /// Anchor gained focus.
    Focus,
    /// Anchor lost focus.
    Blur,
    /// Secondary click / context-menu gesture.
    ContextMenu,
}

impl EventKind {
    /// All event kinds.
    pub const ALL: [Self; 9] = [
        Self::Click,
        Self::MouseDown,
        Self::TouchStart,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::MouseMove,
        Self::Focus,
        Self::Blur,
        Self::ContextMenu,
    ];

    /// The mask bit for this kind.
    pub fn mask(self) -> EventMask {
        match self {
            Self::Click => EventMask::CLICK,
            Self::MouseDown => EventMask::MOUSE_DOWN,
            Self::TouchStart => EventMask::TOUCH_START,
            Self::MouseEnter => EventMask::MOUSE_ENTER,
            Self::MouseLeave => EventMask::MOUSE_LEAVE,
            Self::MouseMove => EventMask::MOUSE_MOVE,
            Self::Focus => EventMask::FOCUS,
            Self::Blur => EventMask::BLUR,
            Self::ContextMenu => EventMask::CONTEXT_MENU,
        }
    }
}

bitflags::bitflags! {
    /// A set of [`EventKind`]s the anchor should listen to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        /// [`EventKind::Click`]
        const CLICK        = 1 << 0;
        /// [`EventKind::MouseDown`]
        const MOUSE_DOWN   = 1 << 1;
        /// [`EventKind::TouchStart`]
        const TOUCH_START  = 1 << 2;
        /// [`EventKind::MouseEnter`]
        const MOUSE_ENTER  = 1 << 3;
        /// [`EventKind::MouseLeave`]
        const MOUSE_LEAVE  = 1 << 4;
        /// [`EventKind::MouseMove`]
        const MOUSE_MOVE   = 1 << 5;
        /// [`EventKind::Focus`]
        const FOCUS        = 1 << 6;
        /// [`EventKind::Blur`]
        const BLUR         = 1 << 7;
        /// [`EventKind::ContextMenu`]
        const CONTEXT_MENU = 1 << 8;
    }
}

/// An event delivered to the anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Pointer position in page coordinates, for pointer events.
    pub position: Option<Point>,
}

impl AnchorEvent {
    /// An event without a pointer position (focus, blur).
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    /// A pointer event at `position`.
    pub fn at(kind: EventKind, position: impl Into<Point>) -> Self {
        Self {
            kind,
            position: Some(position.into()),
        }
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EventResponse {
    /// Suppress the platform's default action (native context menu, focus-on-click, ...).
    pub prevent_default: bool,
}

/// Internal behaviour bound to an event kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InternalHandler {
    /// Show after the mouse-enter delay.
    ShowOnEnter,
    /// Record the pointer position.
    TrackPoint,
    /// Hide after the mouse-leave delay.
    HideOnLeave,
    /// Cancel pending work, then show after the focus delay if focus shows.
    ShowOnFocus,
    /// Cancel pending work, then hide after the blur delay if blur hides.
    HideOnBlur,
    /// Remember when the pointer was pressed.
    RecordMouseDown,
    /// Remember when a touch started.
    RecordTouchStart,
    /// Toggle, subject to click-to-show / click-to-hide.
    ToggleOnClick,
    /// Show immediately at the pointer.
    ShowOnContextMenu,
}

/// Table of internal handlers derived from the trigger's actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventBinder {
    internal: BTreeMap<EventKind, InternalHandler>,
}

impl EventBinder {
    /// Build the table for `actions`.
    ///
    /// `align_point` makes hover-shown popups track pointer movement over the anchor.
    pub fn new(actions: &ActionConfig, align_point: bool) -> Self {
        use EventKind as E;
        use InternalHandler as H;

        let mut internal = BTreeMap::new();
        if actions.is_context_menu_to_show() {
            internal.insert(E::ContextMenu, H::ShowOnContextMenu);
        }
        if actions.is_click_to_hide() || actions.is_click_to_show() {
            internal.insert(E::Click, H::ToggleOnClick);
            internal.insert(E::MouseDown, H::RecordMouseDown);
            internal.insert(E::TouchStart, H::RecordTouchStart);
        }
        if actions.is_mouse_enter_to_show() {
            internal.insert(E::MouseEnter, H::ShowOnEnter);
            if align_point {
                internal.insert(E::MouseMove, H::TrackPoint);
            }
        }
        if actions.is_point_tracking() {
            internal.insert(E::MouseMove, H::TrackPoint);
        }
        if actions.is_mouse_leave_to_hide() {
            internal.insert(E::MouseLeave, H::HideOnLeave);
        }
        if actions.is_focus_to_show() || actions.is_blur_to_hide() {
            internal.insert(E::Focus, H::ShowOnFocus);
            internal.insert(E::Blur, H::HideOnBlur);
        }
        Self { internal }
    }

    /// Internal handler for `kind`, if any.
    pub fn internal(&self, kind: EventKind) -> Option<InternalHandler> {
        self.internal.get(&kind).copied()
    }

    /// Events with an internal handler.
    pub fn internal_mask(&self) -> EventMask {
        self.internal
            .keys()
            .fold(EventMask::empty(), |m, k| m | k.mask())
    }

    /// Events the anchor must listen to: internal plus any external handler.
    pub fn listened(&self, external: &AnchorHandlers) -> EventMask {
        self.internal_mask() | external.mask()
    }
}

/// A consumer-supplied event handler.
pub type ExternalHandler = Box<dyn FnMut(&AnchorEvent)>;

/// External handlers: the anchor's own and the trigger-level ones, per event kind.
#[derive(Default)]
pub struct AnchorHandlers {
    anchor: BTreeMap<EventKind, ExternalHandler>,
    trigger: BTreeMap<EventKind, ExternalHandler>,
}

impl fmt::Debug for AnchorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorHandlers")
            .field("anchor", &self.anchor.keys().collect::<Vec<_>>())
            .field("trigger", &self.trigger.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AnchorHandlers {
    /// Create an empty handler set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor element's own handler for `kind`, replacing any previous one.
    pub fn on_anchor(&mut self, kind: EventKind, handler: impl FnMut(&AnchorEvent) + 'static) {
        self.anchor.insert(kind, Box::new(handler));
    }

    /// Set the trigger-level handler for `kind`, replacing any previous one.
    pub fn on_trigger(&mut self, kind: EventKind, handler: impl FnMut(&AnchorEvent) + 'static) {
        self.trigger.insert(kind, Box::new(handler));
    }

    /// Events with at least one external handler.
    pub fn mask(&self) -> EventMask {
        self.anchor
            .keys()
            .chain(self.trigger.keys())
            .fold(EventMask::empty(), |m, k| m | k.mask())
    }

    /// Run the external handlers for `event`: anchor's own first, then trigger-level.
    pub fn fire(&mut self, event: &AnchorEvent) {
        if let Some(h) = self.anchor.get_mut(&event.kind) {
            h(event);
        }
        if let Some(h) = self.trigger.get_mut(&event.kind) {
            h(event);
        }
    }
}

/// Shared "mouse went down inside the popup" flag, linked to the parent trigger's flag.
///
/// Cloning yields a handle to the same flag. Pass [`PopupMouseDown::clone`] of a trigger's flag
/// as the parent of any trigger nested inside its popup.
#[derive(Clone, Debug, Default)]
pub struct PopupMouseDown {
    flag: Rc<Cell<bool>>,
    parent: Option<Rc<PopupMouseDown>>,
}

impl PopupMouseDown {
    /// A root flag with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag that also marks `parent` (and its ancestors) when marked.
    pub fn with_parent(parent: Self) -> Self {
        Self {
            flag: Rc::default(),
            parent: Some(Rc::new(parent)),
        }
    }

    /// Mark this flag and every ancestor.
    pub fn mark(&self) {
        self.flag.set(true);
        if let Some(p) = &self.parent {
            p.mark();
        }
    }

    /// Whether the flag is set.
    pub fn is_set(&self) -> bool {
        self.flag.get()
    }

    /// Clear this flag only; ancestors clear themselves on their own turn boundary.
    pub fn clear(&self) {
        self.flag.set(false);
    }
}
