// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point};
use tracing::debug;
use understory_decode_window::{
    DecodeWindow, DecodeWindowDebugInfo, GeometryError, ImageMeta, ViewportSize, WindowGeometry,
    WindowRect,
};
use understory_region_decode::{
    DecodeError, ImageSource, PipelineStats, PixelBuffer, RegionDecodePipeline, RegionDecoder,
};

use crate::config::ViewConfig;
use crate::controller::{GestureController, GestureState};
use crate::error::Result;

/// Outcome of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Geometry is known; frames will be drawn.
    Ready,
    /// No image has been loaded.
    AwaitingImage,
    /// The host has not reported a viewport size yet.
    AwaitingViewport,
    /// The reported viewport is zero or negative; drawing is skipped until a
    /// valid size arrives.
    InvalidViewport,
}

/// What the host should paint for one frame.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand<'a> {
    /// Decoded pixels.
    pub buffer: &'a PixelBuffer,
    /// Image-space region the buffer holds.
    pub region: WindowRect,
    /// Image-to-viewport magnification.
    pub scale: f64,
    /// Maps buffer pixel coordinates to viewport coordinates.
    pub transform: Affine,
    /// `true` if the last decode failed and this is an older frame.
    pub stale: bool,
}

/// Debug snapshot of a [`LongImageView`].
#[derive(Clone, Debug, PartialEq)]
pub struct LongImageViewDebugInfo {
    /// Gesture phase.
    pub state: GestureState,
    /// Loaded image, if any.
    pub image: Option<ImageMeta>,
    /// Last reported viewport, if any.
    pub viewport: Option<ViewportSize>,
    /// Current scale, once geometry is known.
    pub scale: Option<f64>,
    /// Decode window state, once geometry is known.
    pub window: Option<DecodeWindowDebugInfo>,
    /// Decode pipeline counters, once an image is loaded.
    pub stats: Option<PipelineStats>,
    /// Whether a redraw is pending.
    pub redraw_requested: bool,
    /// Whether the displayed frame is stale.
    pub stale: bool,
}

/// Headless controller for a view that displays one tall image.
///
/// The host drives it with three kinds of calls:
/// - layout: [`LongImageView::set_image`] and [`LongImageView::on_measure`];
/// - input: `on_pointer_down`, `on_pointer_move` and `on_pointer_up`, with
///   positions in viewport pixels and times in milliseconds;
/// - rendering: whenever [`LongImageView::take_redraw_request`] returns `true`,
///   call [`LongImageView::draw`] and paint the returned buffer with its
///   transform. Keep scheduling frames while [`LongImageView::is_animating`].
///
/// The image is fitted to the viewport width and scrolls vertically only.
/// Every draw decodes exactly the rows that are visible into one reused
/// buffer.
#[derive(Debug)]
pub struct LongImageView<D> {
    config: ViewConfig,
    pipeline: Option<RegionDecodePipeline<D>>,
    viewport: Option<ViewportSize>,
    geometry: Option<WindowGeometry>,
    window: Option<DecodeWindow>,
    controller: GestureController,
    redraw: bool,
    last_decode_error: Option<DecodeError>,
}

impl<D: RegionDecoder> Default for LongImageView<D> {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl<D: RegionDecoder> LongImageView<D> {
    /// Creates an empty view.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            pipeline: None,
            viewport: None,
            geometry: None,
            window: None,
            controller: GestureController::new(config.gesture, config.fling),
            redraw: false,
            last_decode_error: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Loads a new image, replacing the current one.
    ///
    /// The window starts at the top of the image. On error nothing is
    /// displayed until another image loads.
    pub fn set_image<S>(&mut self, mut source: S) -> Result<LayoutStatus>
    where
        S: ImageSource<Decoder = D>,
    {
        self.controller.cancel();
        self.pipeline = None;
        self.geometry = None;
        self.window = None;
        self.last_decode_error = None;
        self.redraw = true;

        let meta = source.open_meta()?;
        let decoder = source.open_decoder()?;
        debug!(width = meta.width(), height = meta.height(), "image loaded");
        self.pipeline = Some(RegionDecodePipeline::new(decoder, self.config.pipeline));
        Ok(self.relayout())
    }

    /// Drops the current image.
    pub fn clear_image(&mut self) {
        self.controller.cancel();
        self.pipeline = None;
        self.geometry = None;
        self.window = None;
        self.last_decode_error = None;
        self.redraw = true;
    }

    /// Reports the viewport size from a host layout pass.
    ///
    /// A size that yields the same geometry keeps the scroll position; any
    /// other change restarts at the top of the image and stops a fling.
    pub fn on_measure(&mut self, width: i32, height: i32) -> LayoutStatus {
        self.viewport = Some(ViewportSize::new(width, height));
        self.relayout()
    }

    fn relayout(&mut self) -> LayoutStatus {
        let Some(viewport) = self.viewport else {
            return LayoutStatus::AwaitingViewport;
        };
        let meta = self.pipeline.as_ref().map(RegionDecodePipeline::meta);
        match WindowGeometry::try_compute(meta, viewport) {
            Ok(geometry) => {
                if self.geometry != Some(geometry) {
                    debug!(
                        scale = geometry.scale(),
                        window_height = geometry.window_height(),
                        "layout changed"
                    );
                    self.window = Some(DecodeWindow::new(&geometry));
                    self.geometry = Some(geometry);
                    self.controller.stop_fling();
                    self.redraw = true;
                }
                LayoutStatus::Ready
            }
            Err(err) => {
                self.geometry = None;
                self.window = None;
                self.controller.stop_fling();
                match err {
                    GeometryError::InvalidViewport { .. } => {
                        debug!(%err, "skipping layout");
                        LayoutStatus::InvalidViewport
                    }
                    GeometryError::UnknownImage | GeometryError::InvalidImage { .. } => {
                        LayoutStatus::AwaitingImage
                    }
                }
            }
        }
    }

    /// Handles a pointer press at viewport position `(x, y)`.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, time: u64) {
        self.controller.on_pointer_down(Point::new(x, y), time);
    }

    /// Handles pointer motion.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, time: u64) {
        if self
            .controller
            .on_pointer_move(self.window.as_mut(), Point::new(x, y), time)
        {
            self.redraw = true;
        }
    }

    /// Handles a pointer release; may start a fling.
    pub fn on_pointer_up(&mut self, x: f64, y: f64, time: u64) {
        if self
            .controller
            .on_pointer_up(self.window.as_ref(), Point::new(x, y), time)
        {
            self.redraw = true;
        }
    }

    /// Handles a cancelled pointer sequence.
    pub fn on_pointer_cancel(&mut self) {
        self.controller.cancel();
    }

    /// Advances an active fling to host time `now`.
    ///
    /// Called by [`LongImageView::draw`]; hosts that separate animation from
    /// painting may call it directly.
    pub fn compute_scroll(&mut self, now: u64) {
        if self.controller.tick(self.window.as_mut(), now) {
            self.redraw = true;
        }
    }

    /// Produces the frame for host time `now`.
    ///
    /// Advances any fling, decodes the current window and returns the buffer
    /// to paint. When the decode fails the previous frame is returned, marked
    /// stale; `None` means there is nothing to draw.
    pub fn draw(&mut self, now: u64) -> Option<DrawCommand<'_>> {
        self.compute_scroll(now);

        let geometry = self.geometry?;
        let window = self.window.as_ref()?;
        let pipeline = self.pipeline.as_mut()?;
        match pipeline.decode(window.decode_rect()) {
            Ok(_) => self.last_decode_error = None,
            Err(err) => self.last_decode_error = Some(err),
        }

        let buffer = pipeline.frame()?;
        let region = buffer.region();
        let scale = geometry.scale();
        let dy = f64::from(region.top - window.top()) * scale;
        Some(DrawCommand {
            buffer,
            region,
            scale,
            transform: Affine::translate((0.0, dy)) * geometry.transform(),
            stale: pipeline.is_stale(),
        })
    }

    /// Returns whether a redraw was requested since the last call, and clears
    /// the request.
    pub fn take_redraw_request(&mut self) -> bool {
        core::mem::take(&mut self.redraw)
    }

    /// Returns `true` while a fling is moving the image.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.controller.is_flinging()
    }

    /// Gesture phase.
    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.controller.state()
    }

    /// Dimensions of the loaded image.
    #[must_use]
    pub fn image_meta(&self) -> Option<ImageMeta> {
        self.pipeline.as_ref().map(RegionDecodePipeline::meta)
    }

    /// Current geometry, once both image and viewport are known.
    #[must_use]
    pub fn geometry(&self) -> Option<&WindowGeometry> {
        self.geometry.as_ref()
    }

    /// Current decode window, once both image and viewport are known.
    #[must_use]
    pub fn window(&self) -> Option<&DecodeWindow> {
        self.window.as_ref()
    }

    /// The decode pipeline of the loaded image.
    #[must_use]
    pub fn pipeline(&self) -> Option<&RegionDecodePipeline<D>> {
        self.pipeline.as_ref()
    }

    /// Mutable access to the decode pipeline of the loaded image.
    pub fn pipeline_mut(&mut self) -> Option<&mut RegionDecodePipeline<D>> {
        self.pipeline.as_mut()
    }

    /// Error from the most recent draw, if its decode failed.
    #[must_use]
    pub fn last_decode_error(&self) -> Option<&DecodeError> {
        self.last_decode_error.as_ref()
    }

    /// Snapshot of the view state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> LongImageViewDebugInfo {
        LongImageViewDebugInfo {
            state: self.controller.state(),
            image: self.image_meta(),
            viewport: self.viewport,
            scale: self.geometry.map(|g| g.scale()),
            window: self.window.as_ref().map(DecodeWindow::debug_info),
            stats: self.pipeline.as_ref().map(RegionDecodePipeline::stats),
            redraw_requested: self.redraw,
            stale: self
                .pipeline
                .as_ref()
                .is_some_and(RegionDecodePipeline::is_stale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_region_decode::{RasterDecoder, RasterSource};

    fn source(width: u32, height: u32) -> RasterSource {
        RasterSource::from_fn(width, height, |_, y| {
            let v = u8::try_from(y % 251).unwrap();
            [v, v, v, 255]
        })
    }

    fn view() -> LongImageView<RasterDecoder> {
        LongImageView::new(ViewConfig::default())
    }

    #[test]
    fn nothing_to_draw_before_layout() {
        let mut v = view();
        assert!(v.draw(0).is_none());
        assert_eq!(v.on_measure(100, 100), LayoutStatus::AwaitingImage);
        assert!(v.draw(0).is_none());
    }

    #[test]
    fn image_before_viewport_waits_for_measure() {
        let mut v = view();
        assert_eq!(v.set_image(source(10, 10)).unwrap(), LayoutStatus::AwaitingViewport);
        assert!(v.window().is_none());
        assert_eq!(v.on_measure(5, 5), LayoutStatus::Ready);
        assert_eq!(v.geometry().unwrap().scale(), 0.5);
    }

    #[test]
    fn invalid_viewport_skips_drawing() {
        let mut v = view();
        v.set_image(source(10, 100)).unwrap();
        assert_eq!(v.on_measure(0, 50), LayoutStatus::InvalidViewport);
        assert!(v.draw(0).is_none());
        assert_eq!(v.on_measure(-3, 50), LayoutStatus::InvalidViewport);
        assert_eq!(v.on_measure(10, 50), LayoutStatus::Ready);
        assert!(v.draw(0).is_some());
    }

    #[test]
    fn failed_open_clears_previous_image() {
        let mut v = view();
        v.on_measure(10, 10);
        v.set_image(source(10, 100)).unwrap();
        assert!(v.draw(0).is_some());
        assert!(v.set_image(source(0, 100)).is_err());
        assert!(v.image_meta().is_none());
        assert!(v.draw(0).is_none());
    }

    #[test]
    fn draw_returns_visible_rows_and_transform() {
        let mut v = view();
        v.on_measure(5, 20);
        v.set_image(source(10, 100)).unwrap();
        let cmd = v.draw(0).unwrap();
        assert_eq!(cmd.region, WindowRect::new(0, 0, 10, 40));
        assert_eq!(cmd.scale, 0.5);
        assert_eq!(cmd.transform * Point::new(10.0, 40.0), Point::new(5.0, 20.0));
        assert!(!cmd.stale);
    }

    #[test]
    fn redraw_is_requested_by_layout_and_drag() {
        let mut v = view();
        v.on_measure(100, 100);
        v.set_image(source(100, 1000)).unwrap();
        assert!(v.take_redraw_request());
        assert!(!v.take_redraw_request());

        v.on_pointer_down(50.0, 50.0, 0);
        v.on_pointer_move(50.0, 40.0, 10);
        assert!(v.take_redraw_request());
        assert_eq!(v.window().unwrap().top(), 10);
    }

    #[test]
    fn remeasure_keeps_position_unless_geometry_changes() {
        let mut v = view();
        v.on_measure(100, 100);
        v.set_image(source(100, 1000)).unwrap();
        v.on_pointer_down(50.0, 90.0, 0);
        v.on_pointer_move(50.0, 40.0, 10);
        v.on_pointer_up(50.0, 40.0, 500);
        assert_eq!(v.window().unwrap().top(), 50);

        assert_eq!(v.on_measure(100, 100), LayoutStatus::Ready);
        assert_eq!(v.window().unwrap().top(), 50);

        assert_eq!(v.on_measure(100, 200), LayoutStatus::Ready);
        assert_eq!(v.window().unwrap().top(), 0);
        assert_eq!(v.window().unwrap().window_height(), 200);
    }

    #[test]
    fn debug_info_reports_state() {
        let mut v = view();
        let info = v.debug_info();
        assert_eq!(info.state, GestureState::Idle);
        assert!(info.image.is_none() && info.window.is_none() && info.stats.is_none());

        v.on_measure(50, 50);
        v.set_image(source(100, 1000)).unwrap();
        v.draw(0);
        let info = v.debug_info();
        assert_eq!(info.scale, Some(0.5));
        assert_eq!(info.window.unwrap().rect, WindowRect::new(0, 0, 100, 100));
        assert_eq!(info.stats.unwrap().decodes, 1);
        assert!(!info.stale);
    }
}
