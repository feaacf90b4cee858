// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility state machine with delayed transitions.
//!
//! ## Overview
//!
//! [`VisibilityMachine`] owns the popup's visible flag. Requests to show or hide may be delayed;
//! a delayed request becomes a single pending transition that the host fires by calling
//! [`VisibilityMachine::poll`] with the current time. Any new request cancels the pending one,
//! so the last request always decides the outcome.
//!
//! Time is supplied by the caller as a monotonic [`Duration`] since an arbitrary epoch. The
//! machine never reads a clock, so tests can drive it with virtual time.
//!
//! ## Controlled mode
//!
//! When the consumer owns the visible flag ([`VisibilityMachine::set_controlled`] or
//! [`VisibilityMachine::set_visible_externally`]), internal requests no longer flip the state.
//! They still report a [`Transition`] with `applied == false`, which the trigger forwards to the
//! consumer as a request.
//!
//! ```
//! use core::time::Duration;
//! use understory_trigger::visibility::VisibilityMachine;
//!
//! let mut m = VisibilityMachine::new(false);
//! let t0 = Duration::ZERO;
//! assert!(m.request_show(None, Duration::from_millis(100), t0).is_none());
//! assert_eq!(m.next_deadline(), Some(Duration::from_millis(100)));
//!
//! // Not yet due.
//! assert!(m.poll(Duration::from_millis(50)).is_none());
//! let t = m.poll(Duration::from_millis(100)).unwrap();
//! assert!(t.visible && t.applied);
//! assert!(m.is_visible());
//! ```

use core::time::Duration;

use kurbo::Point;

/// Current and previous visibility.
///
/// `previous_visible` is overwritten every time `visible` changes; it only exists to detect a
/// transition for the post-render notification.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct VisibilityState {
    /// Whether the popup is visible.
    pub visible: bool,
    /// Value of `visible` before its last change.
    pub previous_visible: bool,
}

/// Per-trigger delays.
///
/// Defaults: show on hover immediately, hide 100 ms after leave, show on focus immediately,
/// hide 150 ms after blur.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DelayConfig {
    /// Delay before showing on pointer enter.
    pub mouse_enter: Duration,
    /// Delay before hiding on pointer leave.
    pub mouse_leave: Duration,
    /// Delay before showing on focus.
    pub focus: Duration,
    /// Delay before hiding on blur.
    pub blur: Duration,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            mouse_enter: Duration::ZERO,
            mouse_leave: Duration::from_millis(100),
            focus: Duration::ZERO,
            blur: Duration::from_millis(150),
        }
    }
}

impl DelayConfig {
    /// Build from delays expressed in seconds.
    ///
    /// Negative or NaN values are treated as zero; values too large for a [`Duration`]
    /// (including infinity) saturate to [`Duration::MAX`].
    pub fn from_secs(mouse_enter: f64, mouse_leave: f64, focus: f64, blur: f64) -> Self {
        Self {
            mouse_enter: secs(mouse_enter),
            mouse_leave: secs(mouse_leave),
            focus: secs(focus),
            blur: secs(blur),
        }
    }
}

fn secs(s: f64) -> Duration {
    match Duration::try_from_secs_f64(s) {
        Ok(d) => d,
        Err(_) if s > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

/// A visibility change produced by the machine.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    /// The new (or, when not applied, the requested) visibility.
    pub visible: bool,
    /// False in controlled mode: the state did not change, the consumer was asked to change it.
    pub applied: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Pending {
    deadline: Duration,
    visible: bool,
}

/// Visibility state machine. See the [module docs](self).
#[derive(Clone, Debug)]
pub struct VisibilityMachine {
    state: VisibilityState,
    controlled: bool,
    pending: Option<Pending>,
    point: Option<Point>,
    unmounted: bool,
}

impl VisibilityMachine {
    /// Create an uncontrolled machine with the given initial visibility.
    pub fn new(visible: bool) -> Self {
        Self {
            state: VisibilityState {
                visible,
                previous_visible: visible,
            },
            controlled: false,
            pending: None,
            point: None,
            unmounted: false,
        }
    }

    /// Create a machine whose visibility is owned by the consumer.
    pub fn controlled(visible: bool) -> Self {
        Self {
            controlled: true,
            ..Self::new(visible)
        }
    }

    /// Current state.
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Whether the popup is visible.
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Whether the consumer owns the visible flag.
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Switch between controlled and uncontrolled mode without changing the state.
    pub fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
    }

    /// Latest captured anchor point.
    pub fn point(&self) -> Option<Point> {
        self.point
    }

    /// Record an anchor point. Only the latest point is kept.
    pub fn record_point(&mut self, point: Point) {
        if !self.unmounted {
            self.point = Some(point);
        }
    }

    /// Deadline of the pending transition, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.deadline)
    }

    /// Whether a delayed transition is waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the pending transition, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(p) = self.pending.take() {
            tracing::trace!(visible = p.visible, "cancelled pending visibility transition");
        }
    }

    /// Request the popup to show after `delay`.
    ///
    /// `point` is recorded immediately, even when the transition itself is delayed.
    pub fn request_show(
        &mut self,
        point: Option<Point>,
        delay: Duration,
        now: Duration,
    ) -> Option<Transition> {
        if let Some(p) = point {
            self.record_point(p);
        }
        self.request(true, delay, now)
    }

    /// Request the popup to hide after `delay`.
    pub fn request_hide(&mut self, delay: Duration, now: Duration) -> Option<Transition> {
        self.request(false, delay, now)
    }

    /// Flip visibility immediately.
    pub fn toggle(&mut self) -> Option<Transition> {
        let next = !self.state.visible;
        self.set_visible(next)
    }

    /// Request `visible` after `delay`, replacing any pending transition.
    pub fn request(&mut self, visible: bool, delay: Duration, now: Duration) -> Option<Transition> {
        if self.unmounted {
            return None;
        }
        self.cancel_pending();
        if delay.is_zero() {
            return self.set_visible(visible);
        }
        let deadline = now.saturating_add(delay);
        tracing::trace!(visible, ?deadline, "scheduled visibility transition");
        self.pending = Some(Pending { deadline, visible });
        None
    }

    /// Apply `visible` immediately, cancelling any pending transition.
    ///
    /// Returns `None` when nothing changes. In controlled mode the state is left alone and the
    /// returned transition is a request (`applied == false`).
    pub fn set_visible(&mut self, visible: bool) -> Option<Transition> {
        if self.unmounted {
            return None;
        }
        self.cancel_pending();
        if self.state.visible == visible {
            return None;
        }
        let applied = !self.controlled;
        if applied {
            self.flip(visible);
        }
        Some(Transition { visible, applied })
    }

    /// Set visibility on behalf of an external controller.
    ///
    /// Switches to controlled mode, bypasses delays and cancels any pending transition, so an
    /// earlier internal request can never override the external value.
    pub fn set_visible_externally(&mut self, visible: bool) -> Option<Transition> {
        if self.unmounted {
            return None;
        }
        self.controlled = true;
        self.cancel_pending();
        if self.state.visible == visible {
            return None;
        }
        self.flip(visible);
        Some(Transition {
            visible,
            applied: true,
        })
    }

    /// Fire the pending transition if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<Transition> {
        if self.unmounted {
            return None;
        }
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                self.set_visible(p.visible)
            }
            _ => None,
        }
    }

    /// Cancel all pending work. Nothing fires after this call.
    pub fn unmount(&mut self) {
        self.cancel_pending();
        self.unmounted = true;
    }

    /// Whether [`unmount`](Self::unmount) has been called.
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    fn flip(&mut self, visible: bool) {
        self.state.previous_visible = self.state.visible;
        self.state.visible = visible;
    }
}
