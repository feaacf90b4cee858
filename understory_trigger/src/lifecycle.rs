// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay mount lifecycle.
//!
//! ## Overview
//!
//! The overlay is mounted lazily: nothing exists until the popup first shows (or `force_render`
//! is set). Once mounted it stays mounted, hidden but tracked, so reopening is cheap. With
//! `destroy_on_hide` a hide unmounts it fully and the next show mounts it again.
//!
//! The mount container is created and removed through a [`PopupHost`]; the lifecycle owns the
//! container for as long as the overlay is mounted and hands it back on teardown.

use kurbo::Rect;

/// Observable mount state of the overlay.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MountState {
    /// Nothing mounted.
    NeverMounted,
    /// Mounted but hidden.
    Tracked,
    /// Mounted and visible.
    Visible,
}

/// Creates and removes the node the overlay mounts into.
pub trait PopupHost {
    /// Handle to a mount container.
    type Container;

    /// Create a container. `anchor` is the anchor's current bounds when known, for hosts that
    /// mount next to the anchor rather than at the document root.
    fn create_container(&mut self, anchor: Option<Rect>) -> Self::Container;

    /// Remove a container created by [`create_container`](Self::create_container).
    fn remove_container(&mut self, container: Self::Container);
}

/// Default host: mount at the document body. The container is implicit.
#[derive(Copy, Clone, Debug, Default)]
pub struct DocumentBody;

impl PopupHost for DocumentBody {
    type Container = ();

    fn create_container(&mut self, _anchor: Option<Rect>) {}

    fn remove_container(&mut self, _container: ()) {}
}

/// Mount bookkeeping for one trigger's overlay.
#[derive(Clone, Debug)]
pub struct OverlayLifecycle<C> {
    container: Option<C>,
    force_render: bool,
    destroy_on_hide: bool,
}

impl<C> OverlayLifecycle<C> {
    /// Create the lifecycle with nothing mounted.
    pub fn new(force_render: bool, destroy_on_hide: bool) -> Self {
        Self {
            container: None,
            force_render,
            destroy_on_hide,
        }
    }

    /// Whether the overlay has been mounted and not destroyed since.
    pub fn has_mounted(&self) -> bool {
        self.container.is_some()
    }

    /// `visible || mounted before || force_render`.
    pub fn should_render(&self, visible: bool) -> bool {
        visible || self.has_mounted() || self.force_render
    }

    /// Mount state for the given visibility.
    ///
    /// A hidden overlay under `destroy_on_hide` reports [`MountState::NeverMounted`] right away,
    /// even while its container waits for the next [`sync`](Self::sync) to remove it.
    pub fn mount_state(&self, visible: bool) -> MountState {
        if self.releases_on_hide(visible) {
            return MountState::NeverMounted;
        }
        match (self.has_mounted(), visible) {
            (false, _) => MountState::NeverMounted,
            (true, false) => MountState::Tracked,
            (true, true) => MountState::Visible,
        }
    }

    fn releases_on_hide(&self, visible: bool) -> bool {
        self.destroy_on_hide && !visible && !self.force_render
    }

    /// Update `destroy_on_hide`.
    pub fn set_destroy_on_hide(&mut self, destroy_on_hide: bool) {
        self.destroy_on_hide = destroy_on_hide;
    }

    /// Update `force_render`.
    pub fn set_force_render(&mut self, force_render: bool) {
        self.force_render = force_render;
    }

    /// Bring the mount in line with `visible`, creating or removing the container.
    ///
    /// Returns whether the overlay should be rendered this cycle.
    pub fn sync<H>(&mut self, visible: bool, host: &mut H, anchor: Option<Rect>) -> bool
    where
        H: PopupHost<Container = C>,
    {
        if self.releases_on_hide(visible) {
            self.release(host);
        }
        let render = self.should_render(visible);
        if render && self.container.is_none() {
            tracing::debug!(visible, "mounting popup container");
            self.container = Some(host.create_container(anchor));
        }
        render
    }

    /// Remove the container, if any.
    pub fn release<H>(&mut self, host: &mut H)
    where
        H: PopupHost<Container = C>,
    {
        if let Some(c) = self.container.take() {
            tracing::debug!("removing popup container");
            host.remove_container(c);
        }
    }

    /// The current container, if mounted.
    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }
}
