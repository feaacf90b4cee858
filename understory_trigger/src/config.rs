// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger configuration and consumer callbacks.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::Point;
use understory_placement::{AlignDescriptor, AlignSource, BuiltinPlacements};

use crate::action::{ActionConfig, ActionSet};
use crate::binder::PopupMouseDown;
use crate::visibility::DelayConfig;

/// Default class prefix for popups.
pub const DEFAULT_PREFIX_CLS: &str = "understory-popup";

/// Options for a [`Trigger`](crate::trigger::Trigger).
///
/// Construct with struct-update syntax over [`Default`]:
///
/// ```
/// use understory_trigger::action::ActionSet;
/// use understory_trigger::config::TriggerConfig;
///
/// let cfg = TriggerConfig {
///     action: ActionSet::HOVER,
///     popup_placement: Some("top".into()),
///     ..Default::default()
/// };
/// assert!(cfg.actions().is_mouse_enter_to_show());
/// ```
#[derive(Clone, Debug)]
pub struct TriggerConfig {
    /// Actions that both show and hide.
    pub action: ActionSet,
    /// Additional actions that only show.
    pub show_action: ActionSet,
    /// Additional actions that only hide.
    pub hide_action: ActionSet,
    /// Consumer-controlled visibility. When set, internal logic never overrides it.
    pub popup_visible: Option<bool>,
    /// Initial visibility when not controlled.
    pub default_popup_visible: bool,
    /// Placement name looked up in `builtin_placements`.
    pub popup_placement: Option<String>,
    /// Placement presets.
    pub builtin_placements: BuiltinPlacements,
    /// Alignment override merged over the placement preset.
    pub popup_align: AlignDescriptor,
    /// Align to a captured pointer position instead of the anchor's box.
    pub align_point: bool,
    /// Externally supplied point for point alignment; wins over captured points.
    pub point: Option<Point>,
    /// Show/hide delays.
    pub delays: DelayConfig,
    /// Mount the overlay immediately regardless of visibility.
    pub force_render: bool,
    /// Unmount the overlay on hide instead of keeping it inert.
    pub destroy_popup_on_hide: bool,
    /// Render a modal backdrop.
    pub mask: bool,
    /// Clicking the backdrop (or outside) closes the popup.
    pub mask_closable: bool,
    /// Passed through to the overlay.
    pub z_index: Option<i32>,
    /// Passed through to the overlay.
    pub stretch: Option<String>,
    /// Passed through to the overlay.
    pub popup_transition_name: Option<String>,
    /// Passed through to the overlay.
    pub mask_transition_name: Option<String>,
    /// Passed through to the overlay.
    pub popup_animation: Option<String>,
    /// Passed through to the overlay.
    pub mask_animation: Option<String>,
    /// Class prefix for derived class names.
    pub prefix_cls: String,
    /// Extra class names for the popup.
    pub popup_class_name: String,
    /// Popup mouse-down flag of the trigger whose popup contains this trigger.
    pub parent: Option<PopupMouseDown>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            action: ActionSet::empty(),
            show_action: ActionSet::empty(),
            hide_action: ActionSet::empty(),
            popup_visible: None,
            default_popup_visible: false,
            popup_placement: None,
            builtin_placements: BuiltinPlacements::new(),
            popup_align: AlignDescriptor::default(),
            align_point: false,
            point: None,
            delays: DelayConfig::default(),
            force_render: false,
            destroy_popup_on_hide: false,
            mask: false,
            mask_closable: true,
            z_index: None,
            stretch: None,
            popup_transition_name: None,
            mask_transition_name: None,
            popup_animation: None,
            mask_animation: None,
            prefix_cls: DEFAULT_PREFIX_CLS.into(),
            popup_class_name: String::new(),
            parent: None,
        }
    }
}

impl TriggerConfig {
    /// A context menu: opens on the context-menu gesture, aligned to the pointer.
    pub fn context_menu() -> Self {
        Self {
            action: ActionSet::CONTEXT_MENU,
            align_point: true,
            ..Default::default()
        }
    }

    /// Effective show/hide sets.
    pub fn actions(&self) -> ActionConfig {
        ActionConfig::new(self.action, self.show_action, self.hide_action)
    }

    /// Alignment source selected by `align_point`.
    pub fn align_source(&self) -> AlignSource {
        if self.align_point {
            AlignSource::Point
        } else {
            AlignSource::Element
        }
    }

    /// Initial visibility: the controlled value when present, else the default.
    pub fn initial_visible(&self) -> bool {
        self.popup_visible.unwrap_or(self.default_popup_visible)
    }
}

/// Consumer callbacks.
#[derive(Default)]
pub struct TriggerCallbacks {
    /// Fired synchronously on every visibility flip (or, in controlled mode, on every request).
    pub on_popup_visible_change: Option<Box<dyn FnMut(bool)>>,
    /// Fired once after the overlay render that follows a flip.
    pub after_popup_visible_change: Option<Box<dyn FnMut(bool)>>,
    /// Fired when the overlay reports the alignment it applied.
    pub on_popup_align: Option<Box<dyn FnMut(&AlignDescriptor)>>,
    /// Extra class names derived from the applied alignment.
    pub popup_class_name_from_align: Option<Box<dyn Fn(&AlignDescriptor) -> String>>,
}

impl fmt::Debug for TriggerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerCallbacks")
            .field(
                "on_popup_visible_change",
                &self.on_popup_visible_change.is_some(),
            )
            .field(
                "after_popup_visible_change",
                &self.after_popup_visible_change.is_some(),
            )
            .field("on_popup_align", &self.on_popup_align.is_some())
            .field(
                "popup_class_name_from_align",
                &self.popup_class_name_from_align.is_some(),
            )
            .finish()
    }
}

impl TriggerCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `on_popup_visible_change`.
    #[must_use]
    pub fn on_visible_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_popup_visible_change = Some(Box::new(f));
        self
    }

    /// Set `after_popup_visible_change`.
    #[must_use]
    pub fn after_visible_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.after_popup_visible_change = Some(Box::new(f));
        self
    }

    /// Set `on_popup_align`.
    #[must_use]
    pub fn on_align(mut self, f: impl FnMut(&AlignDescriptor) + 'static) -> Self {
        self.on_popup_align = Some(Box::new(f));
        self
    }

    /// Set `popup_class_name_from_align`.
    #[must_use]
    pub fn class_name_from_align(
        mut self,
        f: impl Fn(&AlignDescriptor) -> String + 'static,
    ) -> Self {
        self.popup_class_name_from_align = Some(Box::new(f));
        self
    }
}
