// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the demo programs.
//!
//! Demos run headless: frames produced by `overstory_long_image` are
//! rasterized on the CPU and written as PNG files.

use image::{Rgba, RgbaImage};
use kurbo::Point;
use overstory_long_image::DrawCommand;

/// Encodes a `width` x `height` test image as PNG: a two-axis gradient with a
/// dark band every 500 rows, so scrolling is easy to follow.
pub fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if y % 500 < 8 {
            return Rgba([0, 0, 0, 255]);
        }
        let r = u8::try_from(u64::from(y) * 255 / u64::from(height)).unwrap_or(u8::MAX);
        let g = u8::try_from(u64::from(x) * 255 / u64::from(width)).unwrap_or(u8::MAX);
        Rgba([r, g, 160, 255])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encoding an in-memory PNG");
    bytes
}

/// Paints a frame into a viewport-sized image with nearest-neighbour sampling.
///
/// Pixels not covered by the decoded buffer are black.
pub fn rasterize(frame: &DrawCommand<'_>, width: u32, height: u32) -> RgbaImage {
    let inverse = frame.transform.inverse();
    let (bw, bh) = (frame.buffer.width(), frame.buffer.height());
    RgbaImage::from_fn(width, height, |x, y| {
        let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        if p.x < 0.0 || p.y < 0.0 || p.x >= f64::from(bw) || p.y >= f64::from(bh) {
            return Rgba([0, 0, 0, 255]);
        }
        Rgba(frame.buffer.rgba_at(p.x as u32, p.y as u32))
    })
}
