// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Region Decode: decode only the visible band of a tall image.
//!
//! This crate defines the seam between a viewport controller and an image
//! codec:
//! - [`ImageSource`] reports image dimensions cheaply and opens a
//!   [`RegionDecoder`].
//! - [`RegionDecoder`] decodes one rectangle into a caller-owned
//!   [`PixelBuffer`], passed by mutable reference so its allocation carries
//!   over from frame to frame.
//! - [`RegionDecodePipeline`] owns that buffer and the decoder, runs one decode
//!   per frame, and keeps the last good frame when a decode fails.
//!
//! Two sources are provided: [`RasterSource`] for in-memory RGBA pixels and,
//! with the `image` feature (on by default), [`EncodedImageSource`] for PNG and
//! JPEG data.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_decode_window::{DecodeWindow, ImageMeta, ViewportSize, WindowGeometry};
//! use understory_region_decode::{
//!     ImageSource, PipelineConfig, RasterSource, RegionDecodePipeline,
//! };
//!
//! let mut source = RasterSource::from_fn(400, 6000, |_, y| {
//!     let v = (y / 24) as u8;
//!     [v, v, v, 255]
//! });
//! let meta = source.open_meta().unwrap();
//! let geometry = WindowGeometry::compute(meta, ViewportSize::new(200, 300)).unwrap();
//! let mut window = DecodeWindow::new(&geometry);
//!
//! let mut pipeline =
//!     RegionDecodePipeline::new(source.open_decoder().unwrap(), PipelineConfig::default());
//! pipeline.decode(window.decode_rect()).unwrap();
//! window.offset_vertically(120);
//! pipeline.decode(window.decode_rect()).unwrap();
//!
//! let frame = pipeline.frame().unwrap();
//! assert_eq!((frame.width(), frame.height()), (400, 600));
//! assert_eq!(pipeline.stats().allocations, 1);
//! ```
//!
//! ## Features
//!
//! - `image` (default): [`EncodedImageSource`], backed by the `image` and
//!   `png` crates. PNG rows are streamed; other formats need
//!   [`EncodedImageSource::with_full_decode`].
//! - `serde`: `Serialize`/`Deserialize` for [`PipelineConfig`] and friends.

mod decoder;
#[cfg(feature = "image")]
mod encoded;
mod error;
mod pipeline;
mod pixel;
mod raster;

pub use decoder::{ImageSource, RegionDecoder, check_region};
#[cfg(feature = "image")]
pub use encoded::{EncodedImageSource, EncodedRegionDecoder};
pub use error::{DecodeError, MetaReadError};
pub use pipeline::{DecodePolicy, DecodeStatus, PipelineConfig, PipelineStats, RegionDecodePipeline};
pub use pixel::{BufferReuse, PixelBuffer, PixelFormat};
pub use raster::{RasterDecoder, RasterSource};
