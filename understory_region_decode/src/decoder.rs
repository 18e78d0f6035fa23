// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_decode_window::{ImageMeta, WindowRect};

use crate::error::{DecodeError, MetaReadError};
use crate::pixel::PixelBuffer;

/// Decodes arbitrary rectangular regions of one open image.
///
/// Implementations must tolerate repeated calls with overlapping or different
/// rectangles against the same source.
pub trait RegionDecoder {
    /// Dimensions of the open image.
    fn meta(&self) -> ImageMeta;

    /// Decodes exactly the pixels inside `rect` into `target`.
    ///
    /// On success `target` is `rect.width()` x `rect.height()` pixels in its
    /// own [`PixelFormat`](crate::PixelFormat). Implementations should size it
    /// with [`PixelBuffer::prepare`] so its allocation is reused across calls.
    ///
    /// On error `target` must be left as it was, so callers can keep showing
    /// the previous frame. Validate the request (for example with
    /// [`check_region`]) before touching the buffer.
    fn decode_region(&mut self, rect: WindowRect, target: &mut PixelBuffer)
    -> Result<(), DecodeError>;
}

impl<D: RegionDecoder + ?Sized> RegionDecoder for Box<D> {
    fn meta(&self) -> ImageMeta {
        (**self).meta()
    }

    fn decode_region(
        &mut self,
        rect: WindowRect,
        target: &mut PixelBuffer,
    ) -> Result<(), DecodeError> {
        (**self).decode_region(rect, target)
    }
}

/// An image that can report its dimensions and open a region decoder.
pub trait ImageSource {
    /// Decoder produced by [`ImageSource::open_decoder`].
    type Decoder: RegionDecoder;

    /// Reads the image dimensions without decoding pixel data.
    fn open_meta(&mut self) -> Result<ImageMeta, MetaReadError>;

    /// Opens a region decoder over the same image.
    fn open_decoder(self) -> Result<Self::Decoder, MetaReadError>;
}

/// Rejects empty regions and regions not fully inside the image.
pub fn check_region(meta: ImageMeta, rect: WindowRect) -> Result<(), DecodeError> {
    if rect.is_empty() {
        return Err(DecodeError::EmptyRegion(rect));
    }
    if !meta.bounds().contains_rect(&rect) {
        return Err(DecodeError::RegionOutOfBounds {
            rect,
            width: meta.width(),
            height: meta.height(),
        });
    }
    Ok(())
}

/// Converts a validated, non-negative edge to a pixel index.
pub(crate) fn edge(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}
