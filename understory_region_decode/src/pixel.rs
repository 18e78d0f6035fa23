// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_decode_window::WindowRect;

/// Memory layout of decoded pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 8 bits per channel, `R, G, B, A` byte order.
    Rgba8888,
    /// 16-bit `RGB 5:6:5`, little-endian. Half the memory of `Rgba8888`.
    #[default]
    Rgb565,
}

impl PixelFormat {
    /// Bytes used by one pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8888 => 4,
            Self::Rgb565 => 2,
        }
    }

    /// Encodes one RGBA pixel into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is not exactly [`PixelFormat::bytes_per_pixel`] long.
    pub fn encode(self, rgba: [u8; 4], dst: &mut [u8]) {
        match self {
            Self::Rgba8888 => dst.copy_from_slice(&rgba),
            Self::Rgb565 => {
                let [r, g, b, _] = rgba.map(u16::from);
                let packed = ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3);
                dst.copy_from_slice(&packed.to_le_bytes());
            }
        }
    }

    /// Decodes one pixel from `src` back to opaque-expanded RGBA.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`PixelFormat::bytes_per_pixel`].
    #[must_use]
    pub fn decode(self, src: &[u8]) -> [u8; 4] {
        match self {
            Self::Rgba8888 => [src[0], src[1], src[2], src[3]],
            Self::Rgb565 => {
                let packed = u16::from_le_bytes([src[0], src[1]]);
                let r = (packed >> 11) & 0x1f;
                let g = (packed >> 5) & 0x3f;
                let b = packed & 0x1f;
                let widen = |v: u16, bits: u32| {
                    let v = (v << (8 - bits)) | (v >> (2 * bits - 8));
                    u8::try_from(v).unwrap_or(u8::MAX)
                };
                [widen(r, 5), widen(g, 6), widen(b, 5), u8::MAX]
            }
        }
    }
}

/// Whether preparing a buffer could reuse its existing allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferReuse {
    /// The existing allocation was large enough.
    Reused,
    /// The allocation had to grow.
    Grown,
}

/// A reusable pixel buffer holding one decoded region.
///
/// Decoders write into a buffer passed by mutable reference, resizing it with
/// [`PixelBuffer::prepare`]; the allocation only grows, so a buffer that has
/// held one window can hold every later window of the same size without
/// allocating.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    region: WindowRect,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates an empty buffer that decoders will fill in `format`.
    #[must_use]
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Resizes the buffer to `width` x `height` pixels in its format.
    ///
    /// Existing bytes are kept where they overlap; callers overwrite every
    /// pixel afterwards.
    pub fn prepare(&mut self, width: u32, height: u32) -> BufferReuse {
        let needed = self.byte_len_for(width, height);
        let reuse = if needed <= self.data.capacity() {
            BufferReuse::Reused
        } else {
            BufferReuse::Grown
        };
        self.data.resize(needed, 0);
        self.width = width;
        self.height = height;
        reuse
    }

    /// Changes the pixel format; takes effect at the next [`PixelBuffer::prepare`].
    pub fn set_format(&mut self, format: PixelFormat) {
        self.format = format;
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Image-space region these pixels were decoded from.
    #[must_use]
    pub fn region(&self) -> WindowRect {
        self.region
    }

    pub(crate) fn set_region(&mut self, region: WindowRect) {
        self.region = region;
    }

    /// Bytes per row.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn capacity_bytes(&self) -> usize {
        self.data.capacity()
    }

    /// All pixel bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel bytes, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below [`PixelBuffer::height`].
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Encodes a row of RGBA pixels into row `y`.
    ///
    /// `rgba` holds `4 * width` bytes; extra bytes are ignored and a shorter
    /// slice leaves the trailing pixels untouched.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below [`PixelBuffer::height`].
    pub fn write_rgba_row(&mut self, y: u32, rgba: &[u8]) {
        let stride = self.stride();
        let bpp = self.format.bytes_per_pixel();
        let format = self.format;
        let start = y as usize * stride;
        let row = &mut self.data[start..start + stride];
        for (dst, src) in row.chunks_exact_mut(bpp).zip(rgba.chunks_exact(4)) {
            format.encode([src[0], src[1], src[2], src[3]], dst);
        }
    }

    /// Reads pixel `(x, y)` as RGBA.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer's current dimensions.
    #[must_use]
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * self.stride() + x as usize * bpp;
        self.format.decode(&self.data[start..start + bpp])
    }

    fn byte_len_for(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.format.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_keeps_primary_colors() {
        let mut px = [0_u8; 2];
        for color in [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 255, 255],
            [0, 0, 0, 255],
        ] {
            PixelFormat::Rgb565.encode(color, &mut px);
            assert_eq!(PixelFormat::Rgb565.decode(&px), color);
        }
    }

    #[test]
    fn rgb565_drops_low_bits_and_alpha() {
        let mut px = [0_u8; 2];
        PixelFormat::Rgb565.encode([0x87, 0x43, 0x21, 0x10], &mut px);
        let [r, g, b, a] = PixelFormat::Rgb565.decode(&px);
        assert_eq!(r & 0xf8, 0x80);
        assert_eq!(g & 0xfc, 0x40);
        assert_eq!(b & 0xf8, 0x20);
        assert_eq!(a, 0xff);
    }

    #[test]
    fn prepare_reuses_allocation_for_same_or_smaller_sizes() {
        let mut buf = PixelBuffer::new(PixelFormat::Rgba8888);
        assert_eq!(buf.prepare(10, 20), BufferReuse::Grown);
        assert_eq!(buf.data().len(), 800);
        let cap = buf.capacity_bytes();
        assert_eq!(buf.prepare(10, 20), BufferReuse::Reused);
        assert_eq!(buf.prepare(5, 20), BufferReuse::Reused);
        assert_eq!(buf.data().len(), 400);
        assert_eq!(buf.capacity_bytes(), cap);
        assert_eq!(buf.prepare(10, 40), BufferReuse::Grown);
    }

    #[test]
    fn rows_round_trip_through_format() {
        let mut buf = PixelBuffer::new(PixelFormat::Rgba8888);
        buf.prepare(2, 2);
        buf.write_rgba_row(1, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf.row(1), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(buf.rgba_at(1, 1), [5, 6, 7, 8]);
        assert_eq!(buf.stride(), 8);
    }

    #[test]
    fn rgb565_buffer_is_half_size() {
        let mut buf = PixelBuffer::new(PixelFormat::Rgb565);
        buf.prepare(100, 10);
        assert_eq!(buf.data().len(), 2000);
        assert_eq!(buf.stride(), 200);
    }

    #[test]
    fn short_rgba_row_leaves_tail_untouched() {
        let mut buf = PixelBuffer::new(PixelFormat::Rgba8888);
        buf.prepare(2, 1);
        buf.write_rgba_row(0, &[9, 9, 9, 9, 7, 7, 7, 7]);
        buf.write_rgba_row(0, &[1, 2, 3, 4]);
        assert_eq!(buf.row(0), &[1, 2, 3, 4, 7, 7, 7, 7]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_past_height_panics() {
        let mut buf = PixelBuffer::new(PixelFormat::Rgb565);
        buf.prepare(4, 2);
        let _ = buf.row(2);
    }
}
