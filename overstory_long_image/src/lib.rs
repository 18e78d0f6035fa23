// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overstory Long Image: a headless controller for viewing very tall images.
//!
//! [`LongImageView`] fits an image to the viewport width and lets the user
//! scroll it vertically by dragging and flinging, while only ever decoding the
//! rows that are on screen. It composes:
//! - `understory_decode_window` for the scale and the decode window;
//! - `understory_gesture` to recognize drags and flings from raw pointer
//!   events;
//! - `understory_fling` for inertial motion;
//! - `understory_region_decode` to decode the window into a reused buffer.
//!
//! The host owns the event loop and the render surface. It reports layout and
//! pointer events, and paints what [`LongImageView::draw`] returns.
//!
//! ## Minimal example
//!
//! ```rust
//! use overstory_long_image::{LayoutStatus, LongImageView, ViewConfig};
//! use understory_region_decode::{RasterDecoder, RasterSource};
//!
//! let image = RasterSource::from_fn(1000, 5000, |_, y| [0, 0, (y % 256) as u8, 255]);
//!
//! let mut view: LongImageView<RasterDecoder> = LongImageView::new(ViewConfig::default());
//! assert_eq!(view.on_measure(500, 1000), LayoutStatus::AwaitingImage);
//! assert_eq!(view.set_image(image).unwrap(), LayoutStatus::Ready);
//!
//! // Drag the content up by 300 viewport pixels, then rest before lifting.
//! view.on_pointer_down(250.0, 800.0, 0);
//! view.on_pointer_move(250.0, 650.0, 16);
//! view.on_pointer_move(250.0, 500.0, 32);
//! view.on_pointer_up(250.0, 500.0, 400);
//!
//! let frame = view.draw(400).unwrap();
//! assert_eq!(frame.scale, 0.5);
//! assert_eq!(frame.region.top, 300);
//! assert_eq!(frame.region.bottom, 2300);
//! ```
//!
//! Drag distances are applied in image rows one-to-one with viewport pixels,
//! so content moves faster than the finger when the image is downscaled.
//!
//! ## Features
//!
//! - `image` (default): load PNG/JPEG through `EncodedImageSource`.
//! - `serde`: `Serialize`/`Deserialize` for [`ViewConfig`].

mod config;
mod controller;
mod error;
mod view;

pub use config::ViewConfig;
pub use controller::{GestureController, GestureState};
pub use error::{Result, ViewError};
pub use view::{DrawCommand, LayoutStatus, LongImageView, LongImageViewDebugInfo};
