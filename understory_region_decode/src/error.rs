// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_decode_window::WindowRect;

/// Failure to open an image: its dimensions or its region decoder.
///
/// Fatal for displaying that image; hosts show nothing or a placeholder.
#[derive(Debug, thiserror::Error)]
pub enum MetaReadError {
    /// The source could not be read.
    #[error("failed to read image source: {0}")]
    Io(#[from] std::io::Error),
    /// The header could not be parsed.
    #[error("corrupt image header: {0}")]
    Corrupt(String),
    /// The header reports dimensions that cannot be displayed.
    #[error("unusable image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },
    /// The dimensions were read but no region decoder could be created.
    #[error("region decoder unavailable: {0}")]
    DecoderUnavailable(String),
    /// Error reported by the `image` crate.
    #[cfg(feature = "image")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// Error reported by the `png` crate while reading the header.
    #[cfg(feature = "image")]
    #[error("PNG error: {0}")]
    Png(#[from] png::DecodingError),
}

/// Failure to decode one region. Recoverable: the previous frame stays valid.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Reading the source failed.
    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
    /// The requested region is not inside the image.
    #[error("region {rect:?} is outside the {width}x{height} image")]
    RegionOutOfBounds {
        /// Requested region.
        rect: WindowRect,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// The requested region covers no pixels.
    #[error("region {0:?} is empty")]
    EmptyRegion(WindowRect),
    /// The source was closed.
    #[error("image source is closed")]
    SourceClosed,
    /// The source format or pixel layout is not supported.
    #[error("unsupported image data: {0}")]
    Unsupported(String),
    /// The pixel data ended before the requested row.
    #[error("image data ended at row {0}")]
    Truncated(u32),
    /// Error reported by the `image` crate.
    #[cfg(feature = "image")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// Error reported by the `png` crate while streaming rows.
    #[cfg(feature = "image")]
    #[error("PNG error: {0}")]
    Png(#[from] png::DecodingError),
}
