// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_fling::FlingConfig;
use understory_gesture::GestureConfig;
use understory_region_decode::PipelineConfig;

/// Configuration for a [`LongImageView`](crate::LongImageView).
///
/// Gesture thresholds and fling physics are both expressed in device pixels,
/// so they should be derived from the same display density; use
/// [`ViewConfig::for_density`] unless a host tunes them separately.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewConfig {
    /// Display density, where `1.0` is 160 pixels per inch.
    pub density: f64,
    /// Pointer gesture recognition thresholds.
    pub gesture: GestureConfig,
    /// Fling physics.
    pub fling: FlingConfig,
    /// Region decode behaviour.
    pub pipeline: PipelineConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::for_density(1.0)
    }
}

impl ViewConfig {
    /// Consistent gesture and fling settings for a display density.
    #[must_use]
    pub fn for_density(density: f64) -> Self {
        Self {
            density,
            gesture: GestureConfig::for_density(density),
            fling: FlingConfig::default().with_density(density),
            pipeline: PipelineConfig::default(),
        }
    }

    /// Returns a copy with the given gesture thresholds.
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Returns a copy with the given fling physics.
    #[must_use]
    pub fn with_fling(mut self, fling: FlingConfig) -> Self {
        self.fling = fling;
        self
    }

    /// Returns a copy with the given decode pipeline settings.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }
}
