// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame region decoding into a single reusable buffer.

use understory_decode_window::{ImageMeta, WindowRect};

use crate::decoder::RegionDecoder;
use crate::error::DecodeError;
use crate::pixel::{PixelBuffer, PixelFormat};

/// When [`RegionDecodePipeline::decode`] actually calls the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodePolicy {
    /// Decode on every call, whether or not the region moved.
    #[default]
    EveryFrame,
    /// Skip the decode when the region equals the last successful one.
    SkipUnchanged,
}

/// Pipeline configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// When to call the decoder.
    pub policy: DecodePolicy,
    /// Pixel format of the frame buffer.
    pub format: PixelFormat,
}

impl PipelineConfig {
    /// Sets the decode policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the frame buffer pixel format.
    #[must_use]
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }
}

/// Outcome of a successful [`RegionDecodePipeline::decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The decoder wrote a fresh frame.
    Decoded,
    /// The region was unchanged and [`DecodePolicy::SkipUnchanged`] is active.
    Skipped,
}

/// Counters describing pipeline activity since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineStats {
    /// Successful decoder calls.
    pub decodes: u64,
    /// Calls skipped by [`DecodePolicy::SkipUnchanged`].
    pub skipped: u64,
    /// Successful decodes that had to grow the buffer.
    pub allocations: u64,
    /// Successful decodes that fit in the existing allocation.
    pub reuses: u64,
    /// Failed decoder calls.
    pub failures: u64,
}

/// Decodes the current window into one buffer that is reused across frames.
///
/// The buffer is always handed back to the decoder, which resizes it in place,
/// so a stream of same-sized windows allocates once. When a decode fails the
/// previous frame stays available through [`RegionDecodePipeline::frame`] and
/// is flagged as stale.
///
/// ```
/// use understory_decode_window::WindowRect;
/// use understory_region_decode::{
///     ImageSource, PipelineConfig, RasterSource, RegionDecodePipeline,
/// };
///
/// let decoder = RasterSource::from_fn(10, 1000, |_, _| [9, 9, 9, 255])
///     .open_decoder()
///     .unwrap();
/// let mut pipeline = RegionDecodePipeline::new(decoder, PipelineConfig::default());
/// for top in 0..10 {
///     pipeline.decode(WindowRect::new(0, top * 10, 10, top * 10 + 200)).unwrap();
/// }
/// assert_eq!(pipeline.stats().allocations, 1);
/// assert_eq!(pipeline.stats().reuses, 9);
/// assert_eq!(pipeline.frame().unwrap().region(), WindowRect::new(0, 90, 10, 290));
/// ```
#[derive(Debug)]
pub struct RegionDecodePipeline<D> {
    decoder: D,
    config: PipelineConfig,
    buffer: PixelBuffer,
    has_frame: bool,
    stale: bool,
    dirty: bool,
    stats: PipelineStats,
}

impl<D: RegionDecoder> RegionDecodePipeline<D> {
    /// Creates a pipeline with an empty frame buffer.
    pub fn new(decoder: D, config: PipelineConfig) -> Self {
        Self {
            decoder,
            config,
            buffer: PixelBuffer::new(config.format),
            has_frame: false,
            stale: false,
            dirty: false,
            stats: PipelineStats::default(),
        }
    }

    /// Decodes `rect` into the frame buffer.
    ///
    /// On failure the error is logged and returned, and the previous frame (if
    /// any) is kept and marked stale.
    pub fn decode(&mut self, rect: WindowRect) -> Result<DecodeStatus, DecodeError> {
        if self.config.policy == DecodePolicy::SkipUnchanged
            && self.has_frame
            && !self.stale
            && !self.dirty
            && self.buffer.region() == rect
        {
            self.stats.skipped += 1;
            return Ok(DecodeStatus::Skipped);
        }

        let capacity = self.buffer.capacity_bytes();
        match self.decoder.decode_region(rect, &mut self.buffer) {
            Ok(()) => {
                self.buffer.set_region(rect);
                self.has_frame = true;
                self.stale = false;
                self.dirty = false;
                self.stats.decodes += 1;
                if self.buffer.capacity_bytes() > capacity {
                    self.stats.allocations += 1;
                } else {
                    self.stats.reuses += 1;
                }
                tracing::trace!(?rect, bytes = self.buffer.data().len(), "decoded region");
                Ok(DecodeStatus::Decoded)
            }
            Err(err) => {
                self.stale = true;
                self.stats.failures += 1;
                tracing::warn!(
                    ?rect,
                    error = %err,
                    has_frame = self.has_frame,
                    "region decode failed, keeping previous frame"
                );
                Err(err)
            }
        }
    }

    /// The last successfully decoded frame, if any.
    #[must_use]
    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.has_frame.then_some(&self.buffer)
    }

    /// Returns `true` if the most recent decode failed.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Dimensions of the decoded image.
    #[must_use]
    pub fn meta(&self) -> ImageMeta {
        self.decoder.meta()
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Replaces the configuration.
    ///
    /// Changing the pixel format drops the current frame, since its bytes are
    /// laid out in the old format.
    pub fn set_config(&mut self, config: PipelineConfig) {
        if config.format != self.config.format {
            self.buffer = PixelBuffer::new(config.format);
            self.has_frame = false;
            self.stale = false;
            self.dirty = false;
        }
        self.config = config;
    }

    /// Forces the next [`RegionDecodePipeline::decode`] to call the decoder.
    ///
    /// The current frame is not marked stale; [`RegionDecodePipeline::is_stale`]
    /// only reports decode failures.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Mutable access to the underlying decoder.
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Consumes the pipeline and returns the decoder.
    pub fn into_decoder(self) -> D {
        self.decoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageSource, RasterDecoder, RasterSource};

    fn pipeline(config: PipelineConfig) -> RegionDecodePipeline<RasterDecoder> {
        let decoder = RasterSource::from_fn(20, 500, |x, y| {
            [
                u8::try_from(x).unwrap(),
                u8::try_from(y % 256).unwrap(),
                0,
                255,
            ]
        })
        .open_decoder()
        .unwrap();
        RegionDecodePipeline::new(decoder, config)
    }

    fn rect(top: i32, height: i32) -> WindowRect {
        WindowRect::new(0, top, 20, top + height)
    }

    #[test]
    fn no_frame_before_first_decode() {
        let p = pipeline(PipelineConfig::default());
        assert!(p.frame().is_none());
        assert!(!p.is_stale());
        assert_eq!(p.meta().height(), 500);
    }

    #[test]
    fn same_size_windows_allocate_once() {
        let mut p = pipeline(PipelineConfig::default());
        for i in 0..10 {
            assert_eq!(p.decode(rect(i * 7, 100)).unwrap(), DecodeStatus::Decoded);
        }
        let stats = p.stats();
        assert_eq!(stats.decodes, 10);
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.reuses, 9);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn every_frame_policy_decodes_unchanged_window() {
        let mut p = pipeline(PipelineConfig::default());
        p.decode(rect(50, 100)).unwrap();
        assert_eq!(p.decode(rect(50, 100)).unwrap(), DecodeStatus::Decoded);
        assert_eq!(p.stats().decodes, 2);
    }

    #[test]
    fn skip_unchanged_policy_skips_until_invalidated() {
        let mut p = pipeline(PipelineConfig::default().with_policy(DecodePolicy::SkipUnchanged));
        assert_eq!(p.decode(rect(50, 100)).unwrap(), DecodeStatus::Decoded);
        assert_eq!(p.decode(rect(50, 100)).unwrap(), DecodeStatus::Skipped);
        assert_eq!(p.decode(rect(51, 100)).unwrap(), DecodeStatus::Decoded);
        p.invalidate();
        assert_eq!(p.decode(rect(51, 100)).unwrap(), DecodeStatus::Decoded);
        assert_eq!(p.decode(rect(51, 100)).unwrap(), DecodeStatus::Skipped);
        assert_eq!(p.stats().skipped, 2);
        assert_eq!(p.stats().decodes, 3);
    }

    #[test]
    fn invalidate_does_not_report_a_failure() {
        let mut p = pipeline(PipelineConfig::default().with_policy(DecodePolicy::SkipUnchanged));
        p.decode(rect(50, 100)).unwrap();
        p.invalidate();
        assert!(!p.is_stale());
        assert_eq!(p.stats().failures, 0);
        assert!(p.frame().is_some());
        assert_eq!(p.decode(rect(50, 100)).unwrap(), DecodeStatus::Decoded);
        assert!(!p.is_stale());
    }

    #[test]
    fn failure_keeps_previous_frame_and_marks_it_stale() {
        let mut p = pipeline(PipelineConfig::default().with_format(PixelFormat::Rgba8888));
        p.decode(rect(100, 50)).unwrap();
        let before = p.frame().unwrap().clone();

        let err = p.decode(rect(480, 50)).unwrap_err();
        assert!(matches!(err, DecodeError::RegionOutOfBounds { .. }));
        assert!(p.is_stale());
        let frame = p.frame().unwrap();
        assert_eq!(frame, &before);
        assert_eq!(frame.region(), rect(100, 50));
        assert_eq!(frame.rgba_at(0, 0), [0, 100, 0, 255]);
        assert_eq!(p.stats().failures, 1);

        p.decode(rect(0, 50)).unwrap();
        assert!(!p.is_stale());
    }

    #[test]
    fn failure_without_prior_frame_draws_nothing() {
        let mut p = pipeline(PipelineConfig::default());
        p.decoder_mut().close();
        assert!(matches!(
            p.decode(rect(0, 50)),
            Err(DecodeError::SourceClosed)
        ));
        assert!(p.frame().is_none());
    }

    #[test]
    fn stale_frame_is_retried_under_skip_policy() {
        let mut p = pipeline(PipelineConfig::default().with_policy(DecodePolicy::SkipUnchanged));
        p.decode(rect(0, 50)).unwrap();
        p.decoder_mut().close();
        assert!(p.decode(rect(0, 50)).is_ok_and(|s| s == DecodeStatus::Skipped));
        assert!(p.decode(rect(10, 50)).is_err());
        assert!(p.decode(rect(0, 50)).is_err());
        assert_eq!(p.stats().failures, 2);
    }

    #[test]
    fn format_change_drops_frame() {
        let mut p = pipeline(PipelineConfig::default());
        p.decode(rect(0, 50)).unwrap();
        assert_eq!(p.frame().unwrap().data().len(), 20 * 50 * 2);
        p.set_config(PipelineConfig::default().with_format(PixelFormat::Rgba8888));
        assert!(p.frame().is_none());
        p.decode(rect(0, 50)).unwrap();
        assert_eq!(p.frame().unwrap().data().len(), 20 * 50 * 4);
    }
}
