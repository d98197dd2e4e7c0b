// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a surface renders into.

use core::cell::Cell;

use kurbo::Rect;

/// A render target as far as input routing is concerned: an area.
///
/// Targets do not push resize notifications. Hosts call
/// [`Surface::notify_area_changed`](crate::Surface::notify_area_changed) after resizing one.
pub trait RenderTarget: core::fmt::Debug {
    /// The target's area in pixels.
    fn area(&self) -> Rect;
}

/// A [`RenderTarget`] whose area is set by the host, for windows and off-screen buffers.
#[derive(Debug)]
pub struct Viewport {
    area: Cell<Rect>,
}

impl Viewport {
    /// Create a viewport covering `area`.
    pub fn new(area: Rect) -> Self {
        Self {
            area: Cell::new(area),
        }
    }

    /// Resize the viewport.
    pub fn set_area(&self, area: Rect) {
        self.area.set(area);
    }
}

impl RenderTarget for Viewport {
    fn area(&self) -> Rect {
        self.area.get()
    }
}
