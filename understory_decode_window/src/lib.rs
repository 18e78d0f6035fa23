// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Decode Window: image-space geometry for tall-image viewers.
//!
//! A tall image is displayed by fitting its width to the viewport and decoding
//! only the band of rows that is currently visible. This crate models that
//! band:
//! - [`WindowGeometry`] derives the fit-to-width scale and the number of image
//!   rows (the window height) that fill the viewport.
//! - [`DecodeWindow`] tracks the vertical position of the band and applies the
//!   edge corrections that keep it inside the image.
//!
//! It does **not** decode pixels or interpret input. Callers are expected to:
//! - Recompute the geometry whenever the viewport size or the image changes.
//! - Feed drag distances into [`DecodeWindow::offset_vertically`] and inertial
//!   offsets into [`DecodeWindow::set_top`].
//! - Hand [`DecodeWindow::decode_rect`] to a region decoder every frame and
//!   draw the result with [`WindowGeometry::transform`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_decode_window::{
//!     DecodeWindow, ImageMeta, ViewportSize, WindowGeometry, WindowRect,
//! };
//!
//! let image = ImageMeta::new(1000, 5000).unwrap();
//! let geometry = WindowGeometry::compute(image, ViewportSize::new(500, 1000)).unwrap();
//! assert_eq!(geometry.scale(), 0.5);
//! assert_eq!(geometry.window_height(), 2000);
//!
//! let mut window = DecodeWindow::new(&geometry);
//! window.offset_vertically(300);
//! assert_eq!(window.rect(), WindowRect::new(0, 300, 1000, 2300));
//!
//! // Overshooting the bottom pins the window against the last row.
//! window.offset_vertically(2900);
//! assert_eq!(window.rect(), WindowRect::new(0, 3000, 1000, 5000));
//! ```
//!
//! ## Design notes
//!
//! - There is no horizontal panning: the window always spans the full image
//!   width.
//! - Edge corrections are two independent one-sided pins (bottom first, then
//!   top) rather than a symmetric clamp. They differ only when the window is
//!   taller than the image, in which case the window is pinned to the top and
//!   [`DecodeWindow::decode_rect`] clips it to the image.
//!
//! This crate is `no_std`.

#![no_std]

mod geometry;
mod window;

pub use geometry::{GeometryError, ImageMeta, ViewportSize, WindowGeometry, WindowRect};
pub use window::{DecodeWindow, DecodeWindowDebugInfo, WindowClamp};
