// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The trigger: visibility machine, event binder, placement, and overlay lifecycle in one unit.
//!
//! ## Driving a trigger
//!
//! The host forwards events and time:
//!
//! - anchor events via [`Trigger::handle_anchor_event`] (listen to [`Trigger::listened_events`]);
//! - popup events via [`Trigger::on_popup_mouse_enter`], [`Trigger::on_popup_mouse_leave`],
//!   [`Trigger::on_popup_mouse_down`];
//! - document events via [`Trigger::on_document_click`], [`Trigger::on_document_scroll`],
//!   [`Trigger::on_window_blur`] while [`Trigger::document_listeners`] asks for them;
//! - [`Trigger::poll`] once per event-loop turn (and at [`Trigger::next_deadline`]);
//! - [`Trigger::render`] whenever the host renders, then [`Trigger::on_align_complete`] when the
//!   overlay has aligned.
//!
//! ```
//! use core::time::Duration;
//! use understory_trigger::action::ActionSet;
//! use understory_trigger::binder::{AnchorEvent, EventKind};
//! use understory_trigger::config::{TriggerCallbacks, TriggerConfig};
//! use understory_trigger::trigger::Trigger;
//!
//! let mut trigger = Trigger::new(
//!     TriggerConfig { action: ActionSet::HOVER, ..Default::default() },
//!     TriggerCallbacks::new(),
//! );
//! let t0 = Duration::ZERO;
//! trigger.handle_anchor_event(&AnchorEvent::at(EventKind::MouseEnter, (5.0, 5.0)), t0);
//! assert!(trigger.is_visible());
//!
//! // Leaving hides after the default 100 ms.
//! trigger.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), t0);
//! trigger.poll(Duration::from_millis(50));
//! assert!(trigger.is_visible());
//! trigger.poll(Duration::from_millis(100));
//! assert!(!trigger.is_visible());
//! ```
//!
//! ## Handler order
//!
//! For every anchor event, external handlers run first (the anchor's own, then the
//! trigger-level one), then the internal handler. See [`binder`](crate::binder).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect};
use understory_placement::{AlignDescriptor, placement_class_name};

use crate::action::{ActionConfig, ActionSet};
use crate::binder::{
    AnchorEvent, AnchorHandlers, EventBinder, EventMask, EventResponse, InternalHandler,
    PopupMouseDown,
};
use crate::config::{TriggerCallbacks, TriggerConfig};
use crate::lifecycle::{DocumentBody, MountState, OverlayLifecycle, PopupHost};
use crate::overlay::{
    AnchorLookup, AnchorTarget, DocumentHit, DocumentListeners, Overlay, PopupProps,
};
use crate::visibility::{Transition, VisibilityMachine, VisibilityState};

/// A click this close to a focus event is the click that caused the focus.
pub const FOCUS_CLICK_WINDOW: Duration = Duration::from_millis(20);

/// A popup trigger. See the [module docs](self).
pub struct Trigger<H: PopupHost = DocumentBody> {
    config: TriggerConfig,
    actions: ActionConfig,
    binder: EventBinder,
    handlers: AnchorHandlers,
    callbacks: TriggerCallbacks,
    machine: VisibilityMachine,
    lifecycle: OverlayLifecycle<H::Container>,
    host: H,
    popup_mouse_down: PopupMouseDown,
    align: AlignDescriptor,
    reported_align: Option<AlignDescriptor>,
    class_name: String,
    aligned_target: Option<AnchorTarget>,
    align_dirty: bool,
    awaiting_settle: bool,
    focus_time: Option<Duration>,
    pre_click_time: Option<Duration>,
    pre_touch_time: Option<Duration>,
    unmounted: bool,
}

impl<H: PopupHost> fmt::Debug for Trigger<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("actions", &self.actions)
            .field("visibility", &self.machine.state())
            .field("mounted", &self.lifecycle.has_mounted())
            .field("align", &self.align)
            .field("unmounted", &self.unmounted)
            .finish_non_exhaustive()
    }
}

impl Trigger<DocumentBody> {
    /// Create a trigger mounting its overlay at the document body.
    pub fn new(config: TriggerConfig, callbacks: TriggerCallbacks) -> Self {
        Self::with_host(config, callbacks, DocumentBody)
    }
}

impl<H: PopupHost> Trigger<H> {
    /// Create a trigger mounting its overlay through `host`.
    pub fn with_host(config: TriggerConfig, callbacks: TriggerCallbacks, host: H) -> Self {
        let actions = config.actions();
        let binder = EventBinder::new(&actions, config.align_point);
        let visible = config.initial_visible();
        let machine = if config.popup_visible.is_some() {
            VisibilityMachine::controlled(visible)
        } else {
            VisibilityMachine::new(visible)
        };
        let popup_mouse_down = match config.parent.clone() {
            Some(parent) => PopupMouseDown::with_parent(parent),
            None => PopupMouseDown::new(),
        };
        let lifecycle = OverlayLifecycle::new(config.force_render, config.destroy_popup_on_hide);
        let mut trigger = Self {
            actions,
            binder,
            handlers: AnchorHandlers::new(),
            callbacks,
            machine,
            lifecycle,
            host,
            popup_mouse_down,
            align: AlignDescriptor::default(),
            reported_align: None,
            class_name: String::new(),
            aligned_target: None,
            align_dirty: true,
            awaiting_settle: false,
            focus_time: None,
            pre_click_time: None,
            pre_touch_time: None,
            unmounted: false,
            config,
        };
        trigger.refresh_align();
        trigger
    }

    /// Current configuration.
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Whether the popup is visible.
    pub fn is_visible(&self) -> bool {
        self.machine.is_visible()
    }

    /// Current and previous visibility.
    pub fn visibility(&self) -> VisibilityState {
        self.machine.state()
    }

    /// Mount state of the overlay.
    pub fn mount_state(&self) -> MountState {
        self.lifecycle.mount_state(self.machine.is_visible())
    }

    /// Point used for point alignment: the configured point, else the latest captured one.
    pub fn point(&self) -> Option<Point> {
        self.config.point.or(self.machine.point())
    }

    /// Resolved alignment descriptor.
    pub fn align(&self) -> &AlignDescriptor {
        &self.align
    }

    /// Alignment last reported by the overlay.
    pub fn reported_align(&self) -> Option<&AlignDescriptor> {
        self.reported_align.as_ref()
    }

    /// Class names for the popup: configured names plus those derived from the reported alignment.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// External anchor handlers, for registering the anchor's own and trigger-level handlers.
    pub fn anchor_handlers_mut(&mut self) -> &mut AnchorHandlers {
        &mut self.handlers
    }

    /// Anchor events the host must forward.
    pub fn listened_events(&self) -> EventMask {
        self.binder.listened(&self.handlers)
    }

    /// This trigger's popup mouse-down flag; pass it as `parent` to triggers nested in the popup.
    pub fn popup_mouse_down(&self) -> PopupMouseDown {
        self.popup_mouse_down.clone()
    }

    /// When the host should next call [`poll`](Self::poll), if a delayed transition is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.machine.next_deadline()
    }

    /// The mount host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The mount host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Document and window listeners to attach; empty unless visible.
    pub fn document_listeners(&self) -> DocumentListeners {
        if self.unmounted || !self.machine.is_visible() {
            return DocumentListeners::empty();
        }
        let mut listeners = DocumentListeners::empty();
        if self.actions.is_click_to_hide() || self.actions.is_context_menu_to_show() {
            listeners |= DocumentListeners::CLICK;
        }
        if self.actions.is_context_menu_to_show() {
            listeners |= DocumentListeners::SCROLL | DocumentListeners::WINDOW_BLUR;
        }
        listeners
    }

    // --- Imperative visibility --------------------------------------------------------------

    /// Show after `delay`. `point` is recorded immediately for point-aligned triggers.
    pub fn request_show(&mut self, point: Option<Point>, delay: Duration, now: Duration) {
        let point = point.filter(|_| self.config.align_point);
        let t = self.machine.request_show(point, delay, now);
        self.apply(t);
    }

    /// Hide after `delay`.
    pub fn request_hide(&mut self, delay: Duration, now: Duration) {
        let t = self.machine.request_hide(delay, now);
        self.apply(t);
    }

    /// Flip visibility immediately.
    pub fn toggle(&mut self) {
        let t = self.machine.toggle();
        self.apply(t);
    }

    /// Hide immediately.
    pub fn close(&mut self) {
        let t = self.machine.set_visible(false);
        self.apply(t);
    }

    /// Take (`Some`) or release (`None`) external control of visibility.
    ///
    /// An external value bypasses delays and cancels any pending internal transition.
    pub fn set_popup_visible(&mut self, visible: Option<bool>) {
        match visible {
            Some(v) => {
                let t = self.machine.set_visible_externally(v);
                self.apply(t);
            }
            None => self.machine.set_controlled(false),
        }
        self.config.popup_visible = visible;
    }

    /// Fire due timers and end the current turn.
    pub fn poll(&mut self, now: Duration) {
        if self.unmounted {
            return;
        }
        self.popup_mouse_down.clear();
        let t = self.machine.poll(now);
        self.apply(t);
    }

    /// Cancel all pending work and release the overlay container. Nothing fires afterwards.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        tracing::debug!("unmounting trigger");
        self.machine.unmount();
        self.lifecycle.release(&mut self.host);
        self.popup_mouse_down.clear();
        self.awaiting_settle = false;
        self.unmounted = true;
    }

    // --- Anchor events ----------------------------------------------------------------------

    /// Dispatch an anchor event: external handlers first, then the internal handler.
    pub fn handle_anchor_event(&mut self, event: &AnchorEvent, now: Duration) -> EventResponse {
        if self.unmounted {
            return EventResponse::default();
        }
        self.handlers.fire(event);
        match self.binder.internal(event.kind) {
            Some(handler) => self.run_internal(handler, event, now),
            None => EventResponse::default(),
        }
    }

    fn run_internal(
        &mut self,
        handler: InternalHandler,
        event: &AnchorEvent,
        now: Duration,
    ) -> EventResponse {
        let delays = self.config.delays;
        match handler {
            InternalHandler::ShowOnEnter => {
                self.request_show(event.position, delays.mouse_enter, now);
            }
            InternalHandler::TrackPoint => {
                if let Some(p) = event.position {
                    self.machine.record_point(p);
                }
            }
            InternalHandler::HideOnLeave => self.request_hide(delays.mouse_leave, now),
            InternalHandler::ShowOnFocus => {
                self.machine.cancel_pending();
                if self.actions.is_focus_to_show() {
                    self.focus_time = Some(now);
                    let t = self.machine.request(true, delays.focus, now);
                    self.apply(t);
                }
            }
            InternalHandler::HideOnBlur => {
                self.machine.cancel_pending();
                if self.actions.is_blur_to_hide() {
                    self.request_hide(delays.blur, now);
                }
            }
            InternalHandler::RecordMouseDown => self.pre_click_time = Some(now),
            InternalHandler::RecordTouchStart => self.pre_touch_time = Some(now),
            InternalHandler::ToggleOnClick => return self.on_click(event, now),
            InternalHandler::ShowOnContextMenu => {
                self.request_show(event.position, Duration::ZERO, now);
                return EventResponse {
                    prevent_default: true,
                };
            }
        }
        EventResponse::default()
    }

    fn on_click(&mut self, event: &AnchorEvent, now: Duration) -> EventResponse {
        // Focusing by pointer produces focus, then click; that click must not undo the focus.
        if let Some(focus) = self.focus_time {
            let pressed = match (self.pre_click_time, self.pre_touch_time) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            if pressed.is_some_and(|p| p.abs_diff(focus) < FOCUS_CLICK_WINDOW) {
                tracing::trace!("ignoring click produced by focus");
                return EventResponse::default();
            }
            self.focus_time = None;
        }
        self.pre_click_time = None;
        self.pre_touch_time = None;

        let a = self.actions;
        let prevent_default = a.is_click_to_show() && (a.is_click_to_hide() || a.is_blur_to_hide());
        let next = !self.machine.is_visible();
        if next && a.is_click_to_show() {
            self.request_show(event.position, Duration::ZERO, now);
        } else if !next && a.is_click_to_hide() {
            self.close();
        }
        EventResponse { prevent_default }
    }

    // --- Popup events -----------------------------------------------------------------------

    /// Pointer entered the popup: keep a hover-opened popup open.
    pub fn on_popup_mouse_enter(&mut self) {
        if !self.unmounted && self.actions.is_mouse_enter_to_show() {
            self.machine.cancel_pending();
        }
    }

    /// Pointer left the popup. `into_popup` is true when it moved to a node inside the popup.
    pub fn on_popup_mouse_leave(&mut self, into_popup: bool, now: Duration) {
        if self.unmounted || into_popup || !self.actions.is_mouse_leave_to_hide() {
            return;
        }
        self.request_hide(self.config.delays.mouse_leave, now);
    }

    /// Pointer pressed inside the popup. Suppresses outside-click dismissal for this turn, here
    /// and in every ancestor trigger.
    pub fn on_popup_mouse_down(&mut self) {
        if !self.unmounted {
            self.popup_mouse_down.mark();
        }
    }

    // --- Document events --------------------------------------------------------------------

    /// Pointer pressed somewhere in the document.
    pub fn on_document_click(&mut self, hit: DocumentHit) {
        if !self.document_listeners().contains(DocumentListeners::CLICK) {
            return;
        }
        if self.config.mask && !self.config.mask_closable {
            return;
        }
        if hit.in_anchor || hit.in_popup || self.popup_mouse_down.is_set() {
            return;
        }
        tracing::debug!("closing popup on outside click");
        self.close();
    }

    /// The document scrolled.
    pub fn on_document_scroll(&mut self) {
        if self.document_listeners().contains(DocumentListeners::SCROLL) {
            self.close();
        }
    }

    /// The window lost focus.
    pub fn on_window_blur(&mut self) {
        if self.document_listeners().contains(DocumentListeners::WINDOW_BLUR) {
            self.close();
        }
    }

    /// The modal backdrop was clicked.
    pub fn on_mask_click(&mut self) {
        if !self.unmounted && self.config.mask && self.config.mask_closable {
            self.close();
        }
    }

    // --- Configuration updates --------------------------------------------------------------

    /// Change the placement name.
    pub fn set_popup_placement(&mut self, placement: Option<String>) {
        self.config.popup_placement = placement;
        self.refresh_align();
    }

    /// Change the alignment override.
    pub fn set_popup_align(&mut self, align: AlignDescriptor) {
        self.config.popup_align = align;
        self.refresh_align();
    }

    /// Change the externally supplied point.
    pub fn set_point(&mut self, point: Option<Point>) {
        self.config.point = point;
    }

    /// Change the actions.
    pub fn set_actions(
        &mut self,
        action: ActionSet,
        show_action: ActionSet,
        hide_action: ActionSet,
    ) {
        self.config.action = action;
        self.config.show_action = show_action;
        self.config.hide_action = hide_action;
        self.actions = self.config.actions();
        self.binder = EventBinder::new(&self.actions, self.config.align_point);
    }

    /// Change `destroy_popup_on_hide`.
    pub fn set_destroy_popup_on_hide(&mut self, destroy: bool) {
        self.config.destroy_popup_on_hide = destroy;
        self.lifecycle.set_destroy_on_hide(destroy);
    }

    /// Change `force_render`. Takes effect on the next render.
    pub fn set_force_render(&mut self, force: bool) {
        self.config.force_render = force;
        self.lifecycle.set_force_render(force);
    }

    // --- Overlay coordination ---------------------------------------------------------------

    /// Sync the mount with visibility and render the overlay if mounted.
    ///
    /// Aligns when visible and the alignment inputs or the anchor's position changed since the
    /// last successful alignment.
    /// Fires `after_popup_visible_change` once after the render that follows a flip.
    pub fn render<O, A>(&mut self, overlay: &mut O, anchor: &A) -> MountState
    where
        O: Overlay + ?Sized,
        A: AnchorLookup + ?Sized,
    {
        if self.unmounted {
            return MountState::NeverMounted;
        }
        let visible = self.machine.is_visible();
        let bounds = anchor.anchor_bounds();
        if self.lifecycle.sync(visible, &mut self.host, bounds) {
            let target = self.locate(bounds);
            let props = PopupProps {
                visible,
                align: &self.align,
                target,
                prefix_cls: &self.config.prefix_cls,
                class_name: &self.class_name,
                mask: self.config.mask,
                z_index: self.config.z_index,
                stretch: self.config.stretch.as_deref(),
                transition_name: self.config.popup_transition_name.as_deref(),
                mask_transition_name: self.config.mask_transition_name.as_deref(),
                animation: self.config.popup_animation.as_deref(),
                mask_animation: self.config.mask_animation.as_deref(),
            };
            overlay.render(&props);
            if visible && (self.align_dirty || target != self.aligned_target) {
                self.align_to(overlay, target);
            }
        }
        self.settle();
        self.lifecycle.mount_state(visible)
    }

    /// Realign now. A no-op returning false when hidden, not mounted, or the anchor is missing;
    /// in the last case the next render retries.
    pub fn force_realign<O, A>(&mut self, overlay: &mut O, anchor: &A) -> bool
    where
        O: Overlay + ?Sized,
        A: AnchorLookup + ?Sized,
    {
        self.align_dirty = true;
        if self.unmounted || !self.machine.is_visible() || !self.lifecycle.has_mounted() {
            return false;
        }
        let target = self.locate(anchor.anchor_bounds());
        self.align_to(overlay, target)
    }

    /// The overlay finished aligning and applied `reported`.
    pub fn on_align_complete(&mut self, reported: &AlignDescriptor) {
        if self.unmounted {
            return;
        }
        self.reported_align = Some(reported.clone());
        self.rebuild_class_name();
        if let Some(cb) = &mut self.callbacks.on_popup_align {
            cb(reported);
        }
    }

    fn locate(&self, bounds: Option<Rect>) -> Option<AnchorTarget> {
        if self.config.align_point {
            self.point().map(AnchorTarget::Point)
        } else {
            bounds.map(AnchorTarget::Element)
        }
    }

    fn align_to<O: Overlay + ?Sized>(
        &mut self,
        overlay: &mut O,
        target: Option<AnchorTarget>,
    ) -> bool {
        match target {
            Some(target) => {
                overlay.force_align(target, &self.align);
                self.aligned_target = Some(target);
                self.align_dirty = false;
                true
            }
            None => {
                tracing::debug!("anchor not located; alignment skipped until the next realign");
                self.align_dirty = true;
                false
            }
        }
    }

    fn refresh_align(&mut self) {
        self.align = self.config.builtin_placements.resolve(
            self.config.popup_placement.as_deref(),
            &self.config.popup_align,
            self.config.align_source(),
        );
        self.align_dirty = true;
        self.rebuild_class_name();
    }

    fn rebuild_class_name(&mut self) {
        let mut parts: Vec<String> = Vec::new();
        if !self.config.popup_class_name.is_empty() {
            parts.push(self.config.popup_class_name.clone());
        }
        if let Some(reported) = &self.reported_align {
            if self.config.popup_placement.is_some() {
                parts.extend(placement_class_name(
                    &self.config.builtin_placements,
                    &self.config.prefix_cls,
                    reported,
                    self.config.align_source(),
                ));
            }
            if let Some(f) = &self.callbacks.popup_class_name_from_align {
                let extra = f(reported);
                if !extra.is_empty() {
                    parts.push(extra);
                }
            }
        }
        self.class_name = parts.join(" ");
    }

    fn apply(&mut self, transition: Option<Transition>) {
        let Some(t) = transition else {
            return;
        };
        tracing::debug!(
            visible = t.visible,
            applied = t.applied,
            "popup visibility changed"
        );
        if t.applied {
            self.awaiting_settle = true;
            if t.visible {
                self.align_dirty = true;
            }
        }
        if let Some(cb) = &mut self.callbacks.on_popup_visible_change {
            cb(t.visible);
        }
    }

    fn settle(&mut self) {
        if core::mem::take(&mut self.awaiting_settle) {
            let visible = self.machine.is_visible();
            if let Some(cb) = &mut self.callbacks.after_popup_visible_change {
                cb(visible);
            }
        }
    }
}

impl<H: PopupHost> Drop for Trigger<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Vec2;
    use understory_placement::presets::tooltip;
    use understory_placement::{AlignPoint, BuiltinPlacements};

    use crate::binder::EventKind;
    use crate::visibility::DelayConfig;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    type Log = Rc<RefCell<Vec<bool>>>;

    fn recording() -> (Log, Log, TriggerCallbacks) {
        let changes: Log = Rc::default();
        let settled: Log = Rc::default();
        let (c, s) = (changes.clone(), settled.clone());
        let cbs = TriggerCallbacks::new()
            .on_visible_change(move |v| c.borrow_mut().push(v))
            .after_visible_change(move |v| s.borrow_mut().push(v));
        (changes, settled, cbs)
    }

    #[derive(Default)]
    struct RecordingOverlay {
        renders: Vec<bool>,
        aligned: Vec<AnchorTarget>,
        aligns: Vec<AlignDescriptor>,
    }

    impl Overlay for RecordingOverlay {
        fn render(&mut self, props: &PopupProps<'_>) {
            self.renders.push(props.visible);
        }

        fn force_align(&mut self, target: AnchorTarget, align: &AlignDescriptor) {
            self.aligned.push(target);
            self.aligns.push(align.clone());
        }
    }

    const ANCHOR: Rect = Rect::new(10.0, 10.0, 50.0, 30.0);

    fn enter(at: (f64, f64)) -> AnchorEvent {
        AnchorEvent::at(EventKind::MouseEnter, at)
    }

    fn hover_trigger(delays: DelayConfig, align_point: bool) -> (Log, Log, Trigger) {
        let (changes, settled, cbs) = recording();
        let t = Trigger::new(
            TriggerConfig {
                action: ActionSet::HOVER,
                delays,
                align_point,
                ..Default::default()
            },
            cbs,
        );
        (changes, settled, t)
    }

    #[test]
    fn show_then_hide_in_one_turn_last_call_wins() {
        for d in [0, 100, 5000] {
            let (changes, _, mut t) = hover_trigger(DelayConfig::default(), false);
            t.request_show(None, ms(d), ms(0));
            t.request_hide(ms(d), ms(0));
            t.poll(ms(d));
            t.poll(ms(d * 10 + 10_000));
            assert!(!t.is_visible(), "delay {d}");
            assert_eq!(t.next_deadline(), None, "delay {d}");
            let expected = if d == 0 { vec![true, false] } else { vec![] };
            assert_eq!(*changes.borrow(), expected, "delay {d}");
        }
    }

    #[test]
    fn double_show_notifies_once() {
        let (changes, _, mut t) = hover_trigger(DelayConfig::default(), false);
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        t.handle_anchor_event(&enter((1.0, 1.0)), ms(1));
        t.request_show(None, Duration::ZERO, ms(2));
        assert_eq!(*changes.borrow(), [true]);
    }

    #[test]
    fn delayed_show_uses_latest_point() {
        let delays = DelayConfig {
            mouse_enter: ms(100),
            ..Default::default()
        };
        let (changes, _, mut t) = hover_trigger(delays, true);
        t.handle_anchor_event(&enter((1.0, 1.0)), ms(0));
        t.handle_anchor_event(&enter((2.0, 2.0)), ms(10));
        t.poll(ms(100));
        assert!(!t.is_visible());
        t.poll(ms(110));
        assert!(t.is_visible());
        assert_eq!(*changes.borrow(), [true]);

        let mut overlay = RecordingOverlay::default();
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(overlay.aligned, [AnchorTarget::Point(Point::new(2.0, 2.0))]);
    }

    #[test]
    fn mouse_move_refreshes_point_and_realigns() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), true);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((1.0, 1.0)), ms(0));
        t.render(&mut overlay, &ANCHOR);
        // Unchanged inputs do not realign.
        t.render(&mut overlay, &ANCHOR);
        t.handle_anchor_event(&AnchorEvent::at(EventKind::MouseMove, (5.0, 6.0)), ms(5));
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(
            overlay.aligned,
            [
                AnchorTarget::Point(Point::new(1.0, 1.0)),
                AnchorTarget::Point(Point::new(5.0, 6.0)),
            ]
        );
    }

    #[test]
    fn anchor_move_realigns() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), false);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        t.render(&mut overlay, &ANCHOR);
        t.render(&mut overlay, &ANCHOR);
        let moved = ANCHOR + Vec2::new(0.0, 40.0);
        t.render(&mut overlay, &moved);
        assert_eq!(
            overlay.aligned,
            [AnchorTarget::Element(ANCHOR), AnchorTarget::Element(moved)]
        );
    }

    #[test]
    fn placement_is_merged_with_user_align() {
        let mut table = BuiltinPlacements::new();
        table.insert(
            "bottomLeft",
            AlignDescriptor {
                points: Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT]),
                offset: Some(Vec2::ZERO),
                ..Default::default()
            },
        );
        let mut t = Trigger::new(
            TriggerConfig {
                popup_placement: Some("bottomLeft".into()),
                builtin_placements: table,
                popup_align: AlignDescriptor {
                    offset: Some(Vec2::new(10.0, 0.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        assert_eq!(
            *t.align(),
            AlignDescriptor {
                points: Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT]),
                offset: Some(Vec2::new(10.0, 0.0)),
                ..Default::default()
            }
        );
        t.set_popup_placement(Some("missing".into()));
        assert_eq!(t.align().points, None);
        assert_eq!(t.align().offset, Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn overlay_stays_mounted_after_hide() {
        let (_, _, mut t) = hover_trigger(DelayConfig::from_secs(0.0, 0.0, 0.0, 0.0), false);
        let mut overlay = RecordingOverlay::default();
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);
        assert!(overlay.renders.is_empty());

        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Visible);
        t.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(1));
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Tracked);
        assert_eq!(overlay.renders, [true, false]);
    }

    #[test]
    fn destroy_on_hide_unmounts() {
        let (_, _, mut t) = hover_trigger(DelayConfig::from_secs(0.0, 0.0, 0.0, 0.0), false);
        t.set_destroy_popup_on_hide(true);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Visible);
        t.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(1));
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);
        assert_eq!(overlay.renders, [true]);
    }

    #[test]
    fn force_render_mounts_before_first_show() {
        let mut t = Trigger::new(
            TriggerConfig {
                force_render: true,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        let mut overlay = RecordingOverlay::default();
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Tracked);
        assert_eq!(overlay.renders, [false]);
        assert!(overlay.aligned.is_empty());
    }

    #[test]
    fn unmount_cancels_pending_show() {
        let (changes, settled, mut t) = hover_trigger(DelayConfig::default(), false);
        t.request_show(None, Duration::from_secs(5), ms(0));
        t.unmount();
        t.poll(Duration::from_secs(6));
        t.handle_anchor_event(&enter((0.0, 0.0)), Duration::from_secs(7));
        let mut overlay = RecordingOverlay::default();
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);
        assert!(changes.borrow().is_empty());
        assert!(settled.borrow().is_empty());
        assert!(!t.is_visible());
    }

    #[test]
    fn after_change_fires_once_after_render() {
        let (_, settled, mut t) = hover_trigger(DelayConfig::default(), false);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert!(settled.borrow().is_empty());
        t.render(&mut overlay, &ANCHOR);
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(*settled.borrow(), [true]);
    }

    #[test]
    fn popup_hover_bridges_leave_delay() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), false);
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        t.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(10));
        // Pointer reaches the popup before the leave delay elapses.
        t.on_popup_mouse_enter();
        t.poll(ms(500));
        assert!(t.is_visible());

        // Moving within the popup keeps it open; leaving it hides after the delay.
        t.on_popup_mouse_leave(true, ms(600));
        assert_eq!(t.next_deadline(), None);
        t.on_popup_mouse_leave(false, ms(600));
        t.poll(ms(700));
        assert!(!t.is_visible());
    }

    #[test]
    fn click_toggles_and_prevents_default() {
        let (changes, _, mut t) = {
            let (c, s, cbs) = recording();
            let t = Trigger::new(
                TriggerConfig {
                    action: ActionSet::CLICK,
                    ..Default::default()
                },
                cbs,
            );
            (c, s, t)
        };
        let click = AnchorEvent::at(EventKind::Click, (1.0, 1.0));
        let r = t.handle_anchor_event(&click, ms(0));
        assert!(r.prevent_default);
        assert!(t.is_visible());
        t.handle_anchor_event(&click, ms(10));
        assert!(!t.is_visible());
        assert_eq!(*changes.borrow(), [true, false]);
    }

    #[test]
    fn click_after_focus_is_ignored() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK | ActionSet::FOCUS,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        t.handle_anchor_event(&AnchorEvent::at(EventKind::MouseDown, (0.0, 0.0)), ms(100));
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Focus), ms(105));
        assert!(t.is_visible());
        // The click belonging to the focusing press does not toggle it closed.
        t.handle_anchor_event(&AnchorEvent::at(EventKind::Click, (0.0, 0.0)), ms(110));
        assert!(t.is_visible());

        // A later, separate click does.
        t.handle_anchor_event(&AnchorEvent::at(EventKind::MouseDown, (0.0, 0.0)), ms(900));
        t.handle_anchor_event(&AnchorEvent::at(EventKind::Click, (0.0, 0.0)), ms(910));
        assert!(!t.is_visible());
    }

    #[test]
    fn blur_hides_after_delay() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::FOCUS,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Focus), ms(0));
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Blur), ms(10));
        assert_eq!(t.next_deadline(), Some(ms(160)));
        // Refocusing cancels the pending hide.
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Focus), ms(50));
        t.poll(ms(200));
        assert!(t.is_visible());
    }

    #[test]
    fn outside_click_respects_popup_mouse_down() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        assert!(t.document_listeners().is_empty());
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Click), ms(0));
        assert_eq!(t.document_listeners(), DocumentListeners::CLICK);

        t.on_document_click(DocumentHit {
            in_anchor: false,
            in_popup: true,
        });
        assert!(t.is_visible());

        // Press inside the popup, seen by the document listener in the same turn.
        t.on_popup_mouse_down();
        t.on_document_click(DocumentHit::OUTSIDE);
        assert!(t.is_visible());

        t.poll(ms(1));
        t.on_document_click(DocumentHit::OUTSIDE);
        assert!(!t.is_visible());
    }

    #[test]
    fn nested_popup_mouse_down_protects_parent() {
        let mut parent = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        let mut child = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                parent: Some(parent.popup_mouse_down()),
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        parent.toggle();
        child.toggle();
        child.on_popup_mouse_down();
        parent.on_document_click(DocumentHit::OUTSIDE);
        assert!(parent.is_visible());
        parent.poll(ms(1));
        parent.on_document_click(DocumentHit::OUTSIDE);
        assert!(!parent.is_visible());
    }

    #[test]
    fn mask_controls_outside_dismissal() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                mask: true,
                mask_closable: false,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        t.toggle();
        t.on_document_click(DocumentHit::OUTSIDE);
        t.on_mask_click();
        assert!(t.is_visible());

        let mut closable = Trigger::new(
            TriggerConfig {
                action: ActionSet::HOVER,
                mask: true,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        closable.toggle();
        closable.on_mask_click();
        assert!(!closable.is_visible());
    }

    #[test]
    fn context_menu_opens_at_pointer_and_closes_on_scroll() {
        let mut t = Trigger::new(TriggerConfig::context_menu(), TriggerCallbacks::new());
        let r = t.handle_anchor_event(
            &AnchorEvent::at(EventKind::ContextMenu, (40.0, 60.0)),
            ms(0),
        );
        assert!(r.prevent_default);
        assert!(t.is_visible());
        assert_eq!(t.point(), Some(Point::new(40.0, 60.0)));
        assert_eq!(
            t.document_listeners(),
            DocumentListeners::CLICK | DocumentListeners::SCROLL | DocumentListeners::WINDOW_BLUR
        );
        t.on_document_scroll();
        assert!(!t.is_visible());

        t.handle_anchor_event(&AnchorEvent::at(EventKind::ContextMenu, (1.0, 2.0)), ms(5));
        t.on_window_blur();
        assert!(!t.is_visible());
    }

    #[test]
    fn controlled_visibility_is_never_overridden() {
        let (changes, _, cbs) = recording();
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::HOVER,
                popup_visible: Some(false),
                default_popup_visible: true,
                ..Default::default()
            },
            cbs,
        );
        assert!(!t.is_visible());

        // Internal logic only asks.
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert!(!t.is_visible());
        assert_eq!(*changes.borrow(), [true]);

        t.set_popup_visible(Some(true));
        assert!(t.is_visible());
        // A delayed internal hide is requested, then the controller answers first.
        t.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(10));
        t.set_popup_visible(Some(true));
        t.poll(ms(1000));
        assert!(t.is_visible());
        assert_eq!(*changes.borrow(), [true, true]);
    }

    #[test]
    fn releasing_control_lets_clicks_flip_again() {
        let (changes, _, cbs) = recording();
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                popup_visible: Some(false),
                ..Default::default()
            },
            cbs,
        );
        let click = AnchorEvent::at(EventKind::Click, (1.0, 1.0));
        t.handle_anchor_event(&click, ms(0));
        assert!(!t.is_visible());
        assert_eq!(*changes.borrow(), [true]);

        t.set_popup_visible(None);
        assert_eq!(t.config().popup_visible, None);
        assert!(!t.is_visible());
        t.handle_anchor_event(&click, ms(10));
        assert!(t.is_visible());
        t.handle_anchor_event(&click, ms(20));
        assert!(!t.is_visible());
        assert_eq!(*changes.borrow(), [true, true, false]);
    }

    #[test]
    fn set_actions_rebinds_anchor_events() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), false);
        assert!(t.listened_events().contains(EventMask::MOUSE_ENTER));
        assert!(!t.listened_events().contains(EventMask::CLICK));

        t.set_actions(ActionSet::CLICK, ActionSet::empty(), ActionSet::empty());
        assert!(t.listened_events().contains(EventMask::CLICK));
        assert!(!t.listened_events().contains(EventMask::MOUSE_ENTER));

        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert!(!t.is_visible());
        assert_eq!(t.next_deadline(), None);
        let r = t.handle_anchor_event(&AnchorEvent::new(EventKind::Click), ms(1));
        assert!(r.prevent_default);
        assert!(t.is_visible());
        // Leaving no longer hides.
        t.handle_anchor_event(&AnchorEvent::new(EventKind::MouseLeave), ms(2));
        t.poll(ms(1000));
        assert!(t.is_visible());
    }

    #[test]
    fn configured_point_wins_and_realigns() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), true);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((1.0, 1.0)), ms(0));
        t.render(&mut overlay, &ANCHOR);

        let fixed = Point::new(7.0, 8.0);
        t.set_point(Some(fixed));
        assert_eq!(t.point(), Some(fixed));
        t.render(&mut overlay, &ANCHOR);

        // Captured points are ignored while a point is configured.
        t.handle_anchor_event(&AnchorEvent::at(EventKind::MouseMove, (9.0, 9.0)), ms(5));
        assert_eq!(t.point(), Some(fixed));
        t.render(&mut overlay, &ANCHOR);

        t.set_point(None);
        assert_eq!(t.point(), Some(Point::new(9.0, 9.0)));
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(
            overlay.aligned,
            [
                AnchorTarget::Point(Point::new(1.0, 1.0)),
                AnchorTarget::Point(fixed),
                AnchorTarget::Point(Point::new(9.0, 9.0)),
            ]
        );
    }

    #[test]
    fn set_popup_align_resolves_and_realigns() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::HOVER,
                popup_placement: Some("bottomLeft".into()),
                builtin_placements: tooltip(),
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        t.render(&mut overlay, &ANCHOR);
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(overlay.aligned.len(), 1);

        t.set_popup_align(AlignDescriptor {
            offset: Some(Vec2::new(0.0, 12.0)),
            ..Default::default()
        });
        assert_eq!(t.align().offset, Some(Vec2::new(0.0, 12.0)));
        assert_eq!(
            t.align().points,
            Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT])
        );

        // Same anchor, new alignment inputs.
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(
            overlay.aligned,
            [AnchorTarget::Element(ANCHOR), AnchorTarget::Element(ANCHOR)]
        );
        assert_eq!(overlay.aligns[1], *t.align());
        assert_ne!(overlay.aligns[0].offset, overlay.aligns[1].offset);
    }

    #[test]
    fn set_force_render_mounts_hidden_overlay() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                destroy_popup_on_hide: true,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        let mut overlay = RecordingOverlay::default();
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);

        // Wins over destroy-on-hide.
        t.set_force_render(true);
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Tracked);
        assert_eq!(t.mount_state(), MountState::Tracked);
        assert_eq!(overlay.renders, [false]);
        assert!(overlay.aligned.is_empty());

        t.set_force_render(false);
        assert_eq!(t.mount_state(), MountState::NeverMounted);
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);
        assert_eq!(overlay.renders, [false]);
    }

    #[test]
    fn close_with_destroy_on_hide_reports_unmounted_at_once() {
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                destroy_popup_on_hide: true,
                ..Default::default()
            },
            TriggerCallbacks::new(),
        );
        let mut overlay = RecordingOverlay::default();
        t.toggle();
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::Visible);
        t.close();
        assert_eq!(t.mount_state(), MountState::NeverMounted);
        assert_eq!(t.render(&mut overlay, &ANCHOR), MountState::NeverMounted);
        assert_eq!(overlay.renders, [true]);
    }

    #[test]
    fn missing_anchor_skips_alignment_and_retries() {
        let (_, _, mut t) = hover_trigger(DelayConfig::default(), false);
        let mut overlay = RecordingOverlay::default();
        t.handle_anchor_event(&enter((0.0, 0.0)), ms(0));
        assert_eq!(t.render(&mut overlay, &None::<Rect>), MountState::Visible);
        assert!(overlay.aligned.is_empty());
        assert!(!t.force_realign(&mut overlay, &None::<Rect>));

        assert!(t.force_realign(&mut overlay, &ANCHOR));
        assert_eq!(overlay.aligned, [AnchorTarget::Element(ANCHOR)]);
        // Hidden popups are not realigned.
        t.close();
        assert!(!t.force_realign(&mut overlay, &ANCHOR));
    }

    #[test]
    fn external_handlers_run_before_internal() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let l = log.clone();
        let cbs =
            TriggerCallbacks::new().on_visible_change(move |_| l.borrow_mut().push("changed"));
        let mut t = Trigger::new(
            TriggerConfig {
                action: ActionSet::CLICK,
                ..Default::default()
            },
            cbs,
        );
        let l = log.clone();
        t.anchor_handlers_mut()
            .on_trigger(EventKind::Click, move |_| l.borrow_mut().push("trigger"));
        let l = log.clone();
        t.anchor_handlers_mut()
            .on_anchor(EventKind::Click, move |_| l.borrow_mut().push("anchor"));
        let l = log.clone();
        t.anchor_handlers_mut()
            .on_anchor(EventKind::Focus, move |_| l.borrow_mut().push("focus"));

        t.handle_anchor_event(&AnchorEvent::new(EventKind::Click), ms(0));
        // Focus has no internal handler but the external one still runs.
        t.handle_anchor_event(&AnchorEvent::new(EventKind::Focus), ms(1));
        assert_eq!(*log.borrow(), ["anchor", "trigger", "changed", "focus"]);
        assert!(t.listened_events().contains(EventMask::FOCUS | EventMask::CLICK));
    }

    #[test]
    fn class_name_follows_reported_alignment() {
        let aligned: Rc<RefCell<Vec<AlignDescriptor>>> = Rc::default();
        let a = aligned.clone();
        let cbs = TriggerCallbacks::new()
            .on_align(move |d| a.borrow_mut().push(d.clone()))
            .class_name_from_align(|_| "custom".into());
        let mut t = Trigger::new(
            TriggerConfig {
                popup_placement: Some("bottomLeft".into()),
                builtin_placements: tooltip(),
                popup_class_name: "menu".into(),
                ..Default::default()
            },
            cbs,
        );
        assert_eq!(t.class_name(), "menu");

        // The overlay flipped to the top.
        let reported = tooltip().get("topLeft").unwrap().align.clone();
        t.on_align_complete(&reported);
        assert_eq!(
            t.class_name(),
            "menu understory-popup-placement-topLeft custom"
        );
        assert_eq!(aligned.borrow().len(), 1);
        // Cosmetic only: the resolved descriptor is unchanged.
        assert_eq!(
            t.align().points,
            Some([AlignPoint::TOP_LEFT, AlignPoint::BOTTOM_LEFT])
        );
    }

    #[test]
    fn custom_host_owns_container_until_drop() {
        #[derive(Default)]
        struct Host {
            live: Rc<RefCell<u32>>,
        }
        impl PopupHost for Host {
            type Container = ();
            fn create_container(&mut self, anchor: Option<Rect>) {
                assert_eq!(anchor, Some(ANCHOR));
                *self.live.borrow_mut() += 1;
            }
            fn remove_container(&mut self, _container: ()) {
                *self.live.borrow_mut() -= 1;
            }
        }

        let host = Host::default();
        let live = host.live.clone();
        let mut t = Trigger::with_host(
            TriggerConfig {
                default_popup_visible: true,
                ..Default::default()
            },
            TriggerCallbacks::new(),
            host,
        );
        let mut overlay = RecordingOverlay::default();
        t.render(&mut overlay, &ANCHOR);
        assert_eq!(*live.borrow(), 1);
        drop(t);
        assert_eq!(*live.borrow(), 0);
    }
}
