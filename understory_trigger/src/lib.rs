// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_trigger --heading-base-level=0

//! Understory Trigger: a headless popup trigger for tooltips, dropdowns, and context menus.
//!
//! ## Overview
//!
//! A trigger wraps an anchor element and decides when a floating popup is shown, where it is
//! aligned, and how long it stays mounted. It does not render or measure anything; the popup
//! itself is an external [`Overlay`](crate::overlay::Overlay) and positioning is the overlay's
//! job, driven by the [`AlignDescriptor`](understory_placement::AlignDescriptor) the trigger
//! resolves.
//!
//! ## Pieces
//!
//! - [`visibility`]: the visible flag plus at most one delayed transition. Any request cancels
//!   the pending one, so the last request wins.
//! - [`action`]: which interactions (hover, click, focus, context menu) show or hide.
//! - [`binder`]: maps actions to internal handlers per anchor event and composes them with the
//!   consumer's own handlers. External handlers run first.
//! - [`lifecycle`]: lazy mounting, keep-mounted-when-hidden, and `destroy_popup_on_hide`.
//! - [`overlay`]: the collaborator interfaces ([`Overlay`](crate::overlay::Overlay),
//!   [`AnchorLookup`](crate::overlay::AnchorLookup)).
//! - [`trigger`]: the [`Trigger`](crate::trigger::Trigger) tying them together.
//!
//! ## Time
//!
//! The crate never reads a clock. Every operation that can start a delay takes `now` as a
//! [`Duration`](core::time::Duration) since an arbitrary epoch, and the host calls
//! [`Trigger::poll`](crate::trigger::Trigger::poll) once per event-loop turn (and again at
//! [`Trigger::next_deadline`](crate::trigger::Trigger::next_deadline)). Tests drive triggers with
//! virtual time this way.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use understory_placement::presets::tooltip;
//! use understory_trigger::action::ActionSet;
//! use understory_trigger::binder::{AnchorEvent, EventKind};
//! use understory_trigger::config::{TriggerCallbacks, TriggerConfig};
//! use understory_trigger::trigger::Trigger;
//!
//! let mut dropdown = Trigger::new(
//!     TriggerConfig {
//!         action: ActionSet::CLICK,
//!         popup_placement: Some("bottomLeft".into()),
//!         builtin_placements: tooltip(),
//!         ..Default::default()
//!     },
//!     TriggerCallbacks::new(),
//! );
//!
//! let response = dropdown.handle_anchor_event(&AnchorEvent::new(EventKind::Click), Duration::ZERO);
//! assert!(response.prevent_default);
//! assert!(dropdown.is_visible());
//! assert!(dropdown.align().points.is_some());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod action;
pub mod binder;
pub mod config;
pub mod lifecycle;
pub mod overlay;
pub mod trigger;
pub mod visibility;
