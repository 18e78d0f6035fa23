// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory RGBA source, for synthetic images and tests.

use std::sync::Arc;

use understory_decode_window::{ImageMeta, WindowRect};

use crate::decoder::{ImageSource, RegionDecoder, check_region, edge};
use crate::error::{DecodeError, MetaReadError};
use crate::pixel::PixelBuffer;

/// An uncompressed RGBA8 image held in memory.
///
/// ```
/// use understory_decode_window::WindowRect;
/// use understory_region_decode::{
///     ImageSource, PixelBuffer, PixelFormat, RasterSource, RegionDecoder,
/// };
///
/// let mut source = RasterSource::from_fn(4, 100, |_, y| [0, 0, 0, u8::try_from(y).unwrap()]);
/// assert_eq!(source.open_meta().unwrap().height(), 100);
///
/// let mut decoder = source.open_decoder().unwrap();
/// let mut buffer = PixelBuffer::new(PixelFormat::Rgba8888);
/// decoder.decode_region(WindowRect::new(0, 40, 4, 60), &mut buffer).unwrap();
/// assert_eq!(buffer.height(), 20);
/// assert_eq!(buffer.rgba_at(0, 0)[3], 40);
/// ```
#[derive(Clone, Debug)]
pub struct RasterSource {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl RasterSource {
    /// Wraps `4 * width * height` bytes of row-major RGBA8 pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, MetaReadError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MetaReadError::Corrupt(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

impl ImageSource for RasterSource {
    type Decoder = RasterDecoder;

    fn open_meta(&mut self) -> Result<ImageMeta, MetaReadError> {
        ImageMeta::new(self.width, self.height).map_err(|_| MetaReadError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })
    }

    fn open_decoder(mut self) -> Result<Self::Decoder, MetaReadError> {
        let meta = self.open_meta()?;
        Ok(RasterDecoder {
            meta,
            pixels: self.pixels,
            closed: false,
        })
    }
}

/// Region decoder over a [`RasterSource`].
#[derive(Clone, Debug)]
pub struct RasterDecoder {
    meta: ImageMeta,
    pixels: Arc<[u8]>,
    closed: bool,
}

impl RasterDecoder {
    /// Closes the source; later decodes fail with [`DecodeError::SourceClosed`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns `true` after [`RasterDecoder::close`].
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RegionDecoder for RasterDecoder {
    fn meta(&self) -> ImageMeta {
        self.meta
    }

    fn decode_region(
        &mut self,
        rect: WindowRect,
        target: &mut PixelBuffer,
    ) -> Result<(), DecodeError> {
        if self.closed {
            return Err(DecodeError::SourceClosed);
        }
        check_region(self.meta, rect)?;

        let (left, top) = (edge(rect.left), edge(rect.top));
        let (width, height) = (edge(rect.width()), edge(rect.height()));
        target.prepare(width, height);

        let src_stride = self.meta.width() as usize * 4;
        let span = left as usize * 4..(left + width) as usize * 4;
        for row in 0..height {
            let start = (top + row) as usize * src_stride;
            let src = &self.pixels[start..start + src_stride];
            target.write_rgba_row(row, &src[span.clone()]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;

    fn gradient(width: u32, height: u32) -> RasterSource {
        RasterSource::from_fn(width, height, |x, y| {
            [
                u8::try_from(x % 256).unwrap(),
                u8::try_from(y % 256).unwrap(),
                0,
                255,
            ]
        })
    }

    #[test]
    fn rejects_mismatched_pixel_data() {
        assert!(matches!(
            RasterSource::new(4, 4, vec![0; 10]),
            Err(MetaReadError::Corrupt(_))
        ));
        assert!(RasterSource::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn zero_sized_source_has_no_meta() {
        let mut source = RasterSource::from_fn(0, 10, |_, _| [0; 4]);
        assert!(matches!(
            source.open_meta(),
            Err(MetaReadError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
        assert!(source.open_decoder().is_err());
    }

    #[test]
    fn decodes_requested_rows_only() {
        let mut decoder = gradient(8, 300).open_decoder().unwrap();
        let mut buf = PixelBuffer::new(PixelFormat::Rgba8888);
        decoder
            .decode_region(WindowRect::new(0, 120, 8, 130), &mut buf)
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (8, 10));
        assert_eq!(buf.rgba_at(3, 0), [3, 120, 0, 255]);
        assert_eq!(buf.rgba_at(7, 9), [7, 129, 0, 255]);
    }

    #[test]
    fn decodes_horizontal_sub_span() {
        let mut decoder = gradient(8, 20).open_decoder().unwrap();
        let mut buf = PixelBuffer::new(PixelFormat::Rgba8888);
        decoder
            .decode_region(WindowRect::new(2, 5, 6, 7), &mut buf)
            .unwrap();
        assert_eq!((buf.width(), buf.height()), (4, 2));
        assert_eq!(buf.rgba_at(0, 0), [2, 5, 0, 255]);
        assert_eq!(buf.rgba_at(3, 1), [5, 6, 0, 255]);
    }

    #[test]
    fn failed_decode_leaves_target_untouched() {
        let mut decoder = gradient(8, 20).open_decoder().unwrap();
        let mut buf = PixelBuffer::new(PixelFormat::Rgb565);
        decoder
            .decode_region(WindowRect::new(0, 0, 8, 10), &mut buf)
            .unwrap();
        let before = buf.clone();

        let err = decoder
            .decode_region(WindowRect::new(0, 15, 8, 25), &mut buf)
            .unwrap_err();
        assert!(matches!(err, DecodeError::RegionOutOfBounds { .. }));
        assert_eq!(buf, before);

        decoder.close();
        assert!(decoder.is_closed());
        let err = decoder
            .decode_region(WindowRect::new(0, 0, 8, 10), &mut buf)
            .unwrap_err();
        assert!(matches!(err, DecodeError::SourceClosed));
        assert_eq!(buf, before);
    }
}
