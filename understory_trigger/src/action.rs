// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction actions: which kinds of input show or hide a popup.
//!
//! A trigger is configured with a symmetric `action` set plus optional `show_action` and
//! `hide_action` sets. [`ActionConfig`] folds them into the two effective sets and answers the
//! questions the binder asks ("does a click show?", "does a blur hide?").
//!
//! Textual parsing accepts both the category names (`hover`, `focus`, ...) and the event-flavoured
//! aliases used in show/hide lists (`mouseEnter`, `mouseLeave`, `blur`, `contextMenu`).

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// A category of interaction that can drive popup visibility.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Action {
    /// Pointer enters (show) or leaves (hide) the anchor.
    Hover,
    /// Pointer click on the anchor toggles the popup.
    Click,
    /// Anchor gains (show) or loses (hide) keyboard focus.
    Focus,
    /// Secondary click on the anchor opens the popup at the pointer.
    ContextMenu,
    /// Pointer movement over the anchor updates the captured point.
    Point,
}

impl Action {
    /// All actions, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Hover,
        Self::Click,
        Self::Focus,
        Self::ContextMenu,
        Self::Point,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hover => "hover",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::ContextMenu => "contextMenu",
            Self::Point => "point",
        })
    }
}

/// Error returned when parsing an [`Action`] from text.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown trigger action {input:?}")]
pub struct ParseActionError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "hover" | "mouseEnter" | "mouseLeave" => Self::Hover,
            "click" => Self::Click,
            "focus" | "blur" => Self::Focus,
            "contextMenu" | "context-menu" => Self::ContextMenu,
            "point" => Self::Point,
            _ => {
                return Err(ParseActionError { input: s.into() });
            }
        })
    }
}

bitflags::bitflags! {
    /// A set of [`Action`]s.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActionSet: u8 {
        /// [`Action::Hover`]
        const HOVER        = 0b0000_0001;
        /// [`Action::Click`]
        const CLICK        = 0b0000_0010;
        /// [`Action::Focus`]
        const FOCUS        = 0b0000_0100;
        /// [`Action::ContextMenu`]
        const CONTEXT_MENU = 0b0000_1000;
        /// [`Action::Point`]
        const POINT        = 0b0001_0000;
    }
}

impl From<Action> for ActionSet {
    fn from(action: Action) -> Self {
        match action {
            Action::Hover => Self::HOVER,
            Action::Click => Self::CLICK,
            Action::Focus => Self::FOCUS,
            Action::ContextMenu => Self::CONTEXT_MENU,
            Action::Point => Self::POINT,
        }
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, a| set | Self::from(a))
    }
}

impl ActionSet {
    /// Parse a list of action names, e.g. `["click", "mouseEnter"]`.
    pub fn parse_list<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ParseActionError> {
        names.into_iter().map(str::parse::<Action>).collect()
    }

    /// Returns true when `action` is in the set.
    pub fn has(self, action: Action) -> bool {
        self.contains(action.into())
    }
}

/// Effective show and hide sets for a trigger.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ActionConfig {
    /// Actions that show the popup.
    pub show: ActionSet,
    /// Actions that hide the popup.
    pub hide: ActionSet,
}

impl ActionConfig {
    /// Fold the symmetric `action` set into explicit `show`/`hide` sets.
    pub fn new(action: ActionSet, show_action: ActionSet, hide_action: ActionSet) -> Self {
        Self {
            show: action | show_action,
            hide: action | hide_action,
        }
    }

    /// A click on the anchor can open the popup.
    pub fn is_click_to_show(&self) -> bool {
        self.show.has(Action::Click)
    }

    /// A click on the anchor, or outside the popup, can close it.
    pub fn is_click_to_hide(&self) -> bool {
        self.hide.has(Action::Click)
    }

    /// A context-menu gesture opens the popup.
    pub fn is_context_menu_to_show(&self) -> bool {
        self.show.has(Action::ContextMenu)
    }

    /// Pointer enter opens the popup.
    pub fn is_mouse_enter_to_show(&self) -> bool {
        self.show.has(Action::Hover)
    }

    /// Pointer leave closes the popup.
    pub fn is_mouse_leave_to_hide(&self) -> bool {
        self.hide.has(Action::Hover)
    }

    /// Focus opens the popup.
    pub fn is_focus_to_show(&self) -> bool {
        self.show.has(Action::Focus)
    }

    /// Blur closes the popup.
    pub fn is_blur_to_hide(&self) -> bool {
        self.hide.has(Action::Focus)
    }

    /// Pointer movement updates the captured point.
    pub fn is_point_tracking(&self) -> bool {
        self.show.has(Action::Point)
    }
}
