// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::{WindowGeometry, WindowRect};

/// Which edge correction, if any, was applied by
/// [`DecodeWindow::offset_vertically`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WindowClamp {
    /// The offset was applied as-is.
    #[default]
    Unclamped,
    /// The window overshot the bottom of the image and was pinned against it.
    PinnedToBottom,
    /// The window overshot the top of the image and was pinned against it.
    PinnedToTop,
}

/// The image-space rectangle the region decoder is asked to produce.
///
/// The horizontal span always equals the full image width and the vertical
/// span always equals the geometry's window height; only the vertical
/// position moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeWindow {
    rect: WindowRect,
    window_height: i32,
    image_height: i32,
}

impl DecodeWindow {
    /// Creates the initial window `{0, 0, image.width, window_height}`.
    #[must_use]
    pub fn new(geometry: &WindowGeometry) -> Self {
        let image = geometry.image();
        let window_height = geometry.window_height();
        Self {
            rect: WindowRect::new(0, 0, image.width_i32(), window_height),
            window_height,
            image_height: image.height_i32(),
        }
    }

    /// Current window rectangle.
    #[must_use]
    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    /// Current top edge in image rows.
    #[must_use]
    pub fn top(&self) -> i32 {
        self.rect.top
    }

    /// Current bottom edge in image rows.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.rect.bottom
    }

    /// Fixed vertical span of the window.
    #[must_use]
    pub fn window_height(&self) -> i32 {
        self.window_height
    }

    /// Height of the image the window moves over.
    #[must_use]
    pub fn image_height(&self) -> i32 {
        self.image_height
    }

    /// Largest top that keeps the whole window inside the image; zero when the
    /// window is taller than the image.
    #[must_use]
    pub fn max_top(&self) -> i32 {
        (self.image_height - self.window_height).max(0)
    }

    /// Moves the window by `delta` rows, then applies the edge corrections.
    ///
    /// Two one-sided corrections run in order:
    /// 1. if `bottom > image_height`, the window is pinned to the bottom edge;
    /// 2. if `top < 0`, the window is pinned to the top edge.
    ///
    /// A window taller than the image therefore ends up pinned to the top.
    /// `left` and `right` are never modified.
    pub fn offset_vertically(&mut self, delta: i32) -> WindowClamp {
        if delta == 0 {
            return WindowClamp::Unclamped;
        }
        self.rect.top = self.rect.top.saturating_add(delta);
        self.rect.bottom = self.rect.top.saturating_add(self.window_height);

        let mut clamp = WindowClamp::Unclamped;
        if self.rect.bottom > self.image_height {
            self.rect.bottom = self.image_height;
            self.rect.top = self.image_height - self.window_height;
            clamp = WindowClamp::PinnedToBottom;
        }
        if self.rect.top < 0 {
            self.rect.top = 0;
            self.rect.bottom = self.window_height;
            clamp = WindowClamp::PinnedToTop;
        }
        clamp
    }

    /// Positions the window at `top` without edge corrections.
    ///
    /// Used by inertial motion, which keeps its own offsets inside
    /// `[0, max_top]`.
    pub fn set_top(&mut self, top: i32) {
        self.rect.top = top;
        self.rect.bottom = top.saturating_add(self.window_height);
    }

    /// The window clipped to the image bounds.
    ///
    /// Equal to [`DecodeWindow::rect`] unless the window is taller than the
    /// image.
    #[must_use]
    pub fn decode_rect(&self) -> WindowRect {
        let bounds = WindowRect::new(self.rect.left, 0, self.rect.right, self.image_height);
        self.rect.intersect(&bounds)
    }

    /// Snapshot of the window state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> DecodeWindowDebugInfo {
        DecodeWindowDebugInfo {
            rect: self.rect,
            decode_rect: self.decode_rect(),
            window_height: self.window_height,
            image_height: self.image_height,
            max_top: self.max_top(),
        }
    }
}

/// Debug snapshot of a [`DecodeWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeWindowDebugInfo {
    /// Current window rectangle.
    pub rect: WindowRect,
    /// Rectangle actually handed to the decoder.
    pub decode_rect: WindowRect,
    /// Fixed vertical span of the window.
    pub window_height: i32,
    /// Height of the image.
    pub image_height: i32,
    /// Largest in-bounds top.
    pub max_top: i32,
}
