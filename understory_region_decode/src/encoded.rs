// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compressed image files (PNG, JPEG).
//!
//! Non-interlaced PNG files are decoded as a row stream with the `png` crate:
//! a region request reads rows up to the bottom of the region and keeps only
//! the rows and columns inside it. The stream stays open between requests, so
//! scrolling down resumes where the previous region ended; moving back up
//! restarts it from the first row. Apart from the target buffer, the decoder
//! holds one region of RGBA rows, which it fills before touching the target so
//! a failed request leaves the previous frame intact.
//!
//! Other formats (JPEG, interlaced PNG) cannot be read row by row.
//! [`ImageSource::open_decoder`] rejects them unless
//! [`EncodedImageSource::with_full_decode`] opts into decoding the whole image
//! once through the `image` crate and serving regions from that raster.
//!
//! Only the header is parsed by [`ImageSource::open_meta`].

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, ImageReader, RgbaImage};
use understory_decode_window::{ImageMeta, WindowRect};

use crate::decoder::{ImageSource, RegionDecoder, check_region, edge};
use crate::error::{DecodeError, MetaReadError};
use crate::pixel::PixelBuffer;

/// An encoded image held in memory.
#[derive(Clone, Debug)]
pub struct EncodedImageSource {
    bytes: Arc<[u8]>,
    meta: Option<ImageMeta>,
    full_decode: bool,
}

impl EncodedImageSource {
    /// Wraps encoded file bytes. The format is guessed from the content.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            meta: None,
            full_decode: false,
        }
    }

    /// Reads an encoded image file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MetaReadError> {
        let bytes = std::fs::read(path.as_ref())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            len = bytes.len(),
            "read encoded image"
        );
        Ok(Self::from_bytes(bytes))
    }

    /// Allows formats without row streaming to be decoded in full.
    ///
    /// Off by default. When enabled, JPEG and interlaced PNG images are
    /// decoded completely on the first region request and the RGBA raster is
    /// kept until [`EncodedRegionDecoder::release`]. That costs four bytes per
    /// image pixel, however small the visible region.
    #[must_use]
    pub fn with_full_decode(mut self, enabled: bool) -> Self {
        self.full_decode = enabled;
        self
    }

    fn reader(&self) -> Result<ImageReader<Cursor<&[u8]>>, std::io::Error> {
        ImageReader::new(Cursor::new(&self.bytes[..])).with_guessed_format()
    }
}

impl ImageSource for EncodedImageSource {
    type Decoder = EncodedRegionDecoder;

    fn open_meta(&mut self) -> Result<ImageMeta, MetaReadError> {
        if let Some(meta) = self.meta {
            return Ok(meta);
        }
        let reader = self.reader()?;
        if reader.format().is_none() {
            return Err(MetaReadError::Corrupt("unrecognized image format".into()));
        }
        let (width, height) = reader.into_dimensions()?;
        let meta = ImageMeta::new(width, height)
            .map_err(|_| MetaReadError::InvalidDimensions { width, height })?;
        self.meta = Some(meta);
        Ok(meta)
    }

    fn open_decoder(mut self) -> Result<Self::Decoder, MetaReadError> {
        let meta = self.open_meta()?;
        let format = self.reader()?.format();
        if format == Some(ImageFormat::Png) {
            let rows = PngRows::open(Arc::clone(&self.bytes))?;
            if !rows.is_interlaced() {
                return Ok(EncodedRegionDecoder {
                    meta,
                    backend: Backend::Rows(rows),
                });
            }
        }
        if !self.full_decode {
            return Err(MetaReadError::DecoderUnavailable(format!(
                "{format:?} data cannot be decoded row by row and full decoding is disabled"
            )));
        }
        tracing::debug!(?format, "falling back to full decode");
        Ok(EncodedRegionDecoder {
            meta,
            backend: Backend::Full(FullRaster {
                bytes: self.bytes,
                raster: None,
            }),
        })
    }
}

/// Region decoder over an [`EncodedImageSource`].
#[derive(Debug)]
pub struct EncodedRegionDecoder {
    meta: ImageMeta,
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    Rows(PngRows),
    Full(FullRaster),
}

impl EncodedRegionDecoder {
    /// Returns `true` if regions are streamed rather than cut from a full
    /// raster.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        matches!(self.backend, Backend::Rows(_))
    }

    /// Bytes of decoded pixels held by the decoder itself, outside the target
    /// buffer.
    #[must_use]
    pub fn held_bytes(&self) -> usize {
        match &self.backend {
            Backend::Rows(rows) => rows.strip.capacity(),
            Backend::Full(full) => full.raster.as_ref().map_or(0, |r| r.as_raw().len()),
        }
    }

    /// Drops decoded pixels and any open row stream. The next region request
    /// starts over.
    pub fn release(&mut self) {
        match &mut self.backend {
            Backend::Rows(rows) => {
                rows.reader = None;
                rows.strip = Vec::new();
            }
            Backend::Full(full) => full.raster = None,
        }
    }
}

impl RegionDecoder for EncodedRegionDecoder {
    fn meta(&self) -> ImageMeta {
        self.meta
    }

    fn decode_region(
        &mut self,
        rect: WindowRect,
        target: &mut PixelBuffer,
    ) -> Result<(), DecodeError> {
        check_region(self.meta, rect)?;
        let (left, top) = (edge(rect.left), edge(rect.top));
        let (width, height) = (edge(rect.width()), edge(rect.height()));

        match &mut self.backend {
            Backend::Rows(rows) => {
                let strip = rows.read(left, top, width, height)?;
                target.prepare(width, height);
                for (y, row) in (0_u32..).zip(strip.chunks_exact(width as usize * 4)) {
                    target.write_rgba_row(y, row);
                }
            }
            Backend::Full(full) => {
                let raster = full.raster(self.meta)?;
                target.prepare(width, height);
                let src = raster.as_raw();
                let src_stride = raster.width() as usize * 4;
                let span = left as usize * 4..(left + width) as usize * 4;
                for row in 0..height {
                    let start = (top + row) as usize * src_stride;
                    target.write_rgba_row(row, &src[start..start + src_stride][span.clone()]);
                }
            }
        }
        Ok(())
    }
}

type PngReader = png::Reader<Cursor<Arc<[u8]>>>;

/// Forward-only PNG row stream plus the RGBA rows of the last region.
struct PngRows {
    bytes: Arc<[u8]>,
    reader: Option<PngReader>,
    next_row: u32,
    strip: Vec<u8>,
}

impl fmt::Debug for PngRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PngRows")
            .field("len", &self.bytes.len())
            .field("open", &self.reader.is_some())
            .field("next_row", &self.next_row)
            .field("strip", &self.strip.len())
            .finish_non_exhaustive()
    }
}

impl PngRows {
    fn open(bytes: Arc<[u8]>) -> Result<Self, png::DecodingError> {
        let reader = Self::start(&bytes)?;
        Ok(Self {
            bytes,
            reader: Some(reader),
            next_row: 0,
            strip: Vec::new(),
        })
    }

    fn start(bytes: &Arc<[u8]>) -> Result<PngReader, png::DecodingError> {
        let mut decoder = png::Decoder::new(Cursor::new(Arc::clone(bytes)));
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        decoder.read_info()
    }

    fn is_interlaced(&self) -> bool {
        self.reader.as_ref().is_some_and(|r| r.info().interlaced)
    }

    /// Reads rows `top..top + height`, columns `left..left + width`, as RGBA.
    fn read(
        &mut self,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> Result<&[u8], DecodeError> {
        if self.reader.is_none() || top < self.next_row {
            tracing::trace!(from = self.next_row, to = top, "restarting PNG row stream");
            self.reader = None;
            self.reader = Some(Self::start(&self.bytes)?);
            self.next_row = 0;
        }
        if let Err(err) = self.fill(left, top, width, height) {
            self.reader = None;
            return Err(err);
        }
        Ok(&self.strip)
    }

    fn fill(&mut self, left: u32, top: u32, width: u32, height: u32) -> Result<(), DecodeError> {
        let Self {
            reader,
            next_row,
            strip,
            ..
        } = self;
        let Some(reader) = reader.as_mut() else {
            return Err(DecodeError::SourceClosed);
        };
        let channels = reader.output_color_type().0.samples();
        if !(1..=4).contains(&channels) {
            return Err(DecodeError::Unsupported(format!("{channels} samples per pixel")));
        }
        while *next_row < top {
            reader.next_row()?.ok_or(DecodeError::Truncated(*next_row))?;
            *next_row += 1;
        }

        let span = left as usize * channels..(left + width) as usize * channels;
        strip.clear();
        strip.reserve_exact(width as usize * height as usize * 4);
        for _ in 0..height {
            let row = reader.next_row()?.ok_or(DecodeError::Truncated(*next_row))?;
            let pixels = row
                .data()
                .get(span.clone())
                .ok_or(DecodeError::Truncated(*next_row))?;
            for px in pixels.chunks_exact(channels) {
                strip.extend_from_slice(&to_rgba(px));
            }
            *next_row += 1;
        }
        Ok(())
    }
}

/// Expands one 8-bit gray, gray-alpha, RGB, or RGBA sample group.
fn to_rgba(px: &[u8]) -> [u8; 4] {
    match *px {
        [g] => [g, g, g, u8::MAX],
        [g, a] => [g, g, g, a],
        [r, g, b] => [r, g, b, u8::MAX],
        [r, g, b, a, ..] => [r, g, b, a],
        [] => [0; 4],
    }
}

#[derive(Debug)]
struct FullRaster {
    bytes: Arc<[u8]>,
    raster: Option<RgbaImage>,
}

impl FullRaster {
    fn raster(&mut self, meta: ImageMeta) -> Result<&RgbaImage, DecodeError> {
        if self.raster.is_none() {
            let decoded = ImageReader::new(Cursor::new(&self.bytes[..]))
                .with_guessed_format()?
                .decode()?
                .into_rgba8();
            if decoded.dimensions() != (meta.width(), meta.height()) {
                return Err(DecodeError::Unsupported(format!(
                    "decoded {:?} but header reported {}x{}",
                    decoded.dimensions(),
                    meta.width(),
                    meta.height()
                )));
            }
            tracing::debug!(
                width = meta.width(),
                height = meta.height(),
                "decoded full raster"
            );
            self.raster = Some(decoded);
        }
        self.raster
            .as_ref()
            .ok_or_else(|| DecodeError::Unsupported("raster unavailable".into()))
    }
}
