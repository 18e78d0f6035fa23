// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`
use kurbo::{Affine, Rect};

/// Errors produced while deriving window geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// No image has been loaded yet, so there is no width to fit.
    #[error("image dimensions are not known yet")]
    UnknownImage,
    /// The viewport has a zero or negative extent.
    ///
    /// This is a transient layout state; callers skip decoding until a valid
    /// size is observed.
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport {
        /// Reported viewport width.
        width: i32,
        /// Reported viewport height.
        height: i32,
    },
    /// The image has a zero extent or does not fit the `i32` coordinate space.
    #[error("invalid image size {width}x{height}")]
    InvalidImage {
        /// Reported image width.
        width: u32,
        /// Reported image height.
        height: u32,
    },
}

/// Intrinsic pixel dimensions of a source image.
///
/// Read once when the image is opened and immutable afterwards. Both extents
/// are positive and fit the `i32` image coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageMeta {
    width: u32,
    height: u32,
}

impl ImageMeta {
    /// Validates and wraps image dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        let fits = |v: u32| v > 0 && i32::try_from(v).is_ok();
        if fits(width) && fits(height) {
            Ok(Self { width, height })
        } else {
            Err(GeometryError::InvalidImage { width, height })
        }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The full image as a rectangle in image coordinates.
    #[must_use]
    pub fn bounds(&self) -> WindowRect {
        WindowRect::new(0, 0, self.width_i32(), self.height_i32())
    }

    pub(crate) fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    pub(crate) fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// Size of the display surface in device pixels, as reported by the host
/// layout pass.
///
/// Hosts may report zero or negative sizes during transient layout states;
/// those are rejected by [`WindowGeometry::compute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    /// Width in device pixels.
    pub width: i32,
    /// Height in device pixels.
    pub height: i32,
}

impl ViewportSize {
    /// Creates a viewport size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both extents are positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Axis-aligned integer rectangle in image coordinates.
///
/// Edges follow the half-open convention: `left..right` by `top..bottom`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl WindowRect {
    /// Creates a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent; negative widths are reported as zero.
    #[must_use]
    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    /// Vertical extent; negative heights are reported as zero.
    #[must_use]
    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Intersection of two rectangles. The result may be empty.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Converts to a floating-point `kurbo` rectangle.
    #[must_use]
    pub fn to_kurbo(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

/// Scale and window height derived from an image and a viewport.
///
/// The image is fitted to the viewport width; the decode window spans the
/// full image width and as many image rows as fill the viewport height at
/// that scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowGeometry {
    image: ImageMeta,
    viewport: ViewportSize,
    scale: f64,
    window_height: i32,
}

impl WindowGeometry {
    /// Derives `scale = viewport.width / image.width` and
    /// `window_height = round(viewport.height / scale)`.
    ///
    /// The window height is at least one row so that extreme aspect ratios
    /// still produce a decodable region.
    pub fn compute(image: ImageMeta, viewport: ViewportSize) -> Result<Self, GeometryError> {
        if !viewport.is_valid() {
            return Err(GeometryError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let scale = f64::from(viewport.width) / f64::from(image.width);
        let rows = (f64::from(viewport.height) / scale).round();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float to int casts saturate; the window is clamped to the image afterwards"
        )]
        let window_height = (rows as i32).max(1);
        Ok(Self {
            image,
            viewport,
            scale,
            window_height,
        })
    }

    /// Like [`WindowGeometry::compute`], but accepts an image that may not be
    /// known yet.
    pub fn try_compute(
        image: Option<ImageMeta>,
        viewport: ViewportSize,
    ) -> Result<Self, GeometryError> {
        Self::compute(image.ok_or(GeometryError::UnknownImage)?, viewport)
    }

    /// Image the geometry was derived from.
    #[must_use]
    pub fn image(&self) -> ImageMeta {
        self.image
    }

    /// Viewport the geometry was derived from.
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Image-space to viewport-space magnification.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of image rows covered by the decode window.
    #[must_use]
    pub fn window_height(&self) -> i32 {
        self.window_height
    }

    /// Largest window top that keeps the whole window inside the image.
    ///
    /// Zero when the window is taller than the image.
    #[must_use]
    pub fn max_top(&self) -> i32 {
        (self.image.height_i32() - self.window_height).max(0)
    }

    /// Transform mapping decoded buffer pixels to viewport pixels.
    #[must_use]
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// Converts an image-space length to viewport pixels.
    #[must_use]
    pub fn image_to_view(&self, len: f64) -> f64 {
        len * self.scale
    }

    /// Converts a viewport-space length to image pixels.
    #[must_use]
    pub fn view_to_image(&self, len: f64) -> f64 {
        len / self.scale
    }
}
