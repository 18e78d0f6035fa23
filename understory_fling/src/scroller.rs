// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`, `ceil`, `signum`
use tracing::{debug, trace};

use crate::spline;

/// Tuning for the fling model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlingConfig {
    /// Scroll friction; larger values stop sooner.
    pub friction: f64,
    /// Display density, where `1.0` is 160 pixels per inch.
    pub density: f64,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            friction: 0.015,
            density: 1.0,
        }
    }
}

impl FlingConfig {
    /// Returns a copy with the given friction.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Returns a copy with the given display density.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
}

/// Parameters and progress of one fling.
///
/// Exists only while a fling is in flight; it is dropped when the motion
/// settles or is interrupted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingState {
    /// Offset the fling started from.
    pub start_offset: i32,
    /// Initial velocity in pixels per second.
    pub start_velocity: f64,
    /// Lower travel bound.
    pub min_offset: i32,
    /// Upper travel bound.
    pub max_offset: i32,
    /// Offset the fling settles at, already inside the bounds.
    pub final_offset: i32,
    /// Most recently produced offset.
    pub current_offset: i32,
    /// Host time the fling started, in milliseconds.
    pub start_time: u64,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Time-indexed inertial motion with spline deceleration.
///
/// Usage:
/// 1) Arm with [`InertialScroller::fling`] when a release carries velocity.
/// 2) Call [`InertialScroller::tick`] once per frame; it yields the offset for
///    that frame until the motion settles.
/// 3) Call [`InertialScroller::force_finish`] when a new touch interrupts.
///
/// ```
/// use understory_fling::InertialScroller;
///
/// let mut scroller = InertialScroller::default();
/// assert!(scroller.fling(0, 2000.0, 0, 10_000, 0));
///
/// let mut last = 0;
/// let mut now = 0;
/// while let Some(offset) = scroller.tick(now) {
///     assert!(offset >= last);
///     last = offset;
///     now += 16;
/// }
/// assert!(scroller.is_finished());
/// assert!(last > 0);
/// ```
#[derive(Clone, Debug)]
pub struct InertialScroller {
    config: FlingConfig,
    physical_coeff: f64,
    state: Option<FlingState>,
}

impl Default for InertialScroller {
    fn default() -> Self {
        Self::new(FlingConfig::default())
    }
}

impl InertialScroller {
    /// Creates an idle scroller.
    #[must_use]
    pub fn new(config: FlingConfig) -> Self {
        Self {
            config,
            physical_coeff: spline::physical_coeff(config.density),
            state: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> FlingConfig {
        self.config
    }

    /// Replaces the configuration. An in-flight fling keeps its trajectory.
    pub fn set_config(&mut self, config: FlingConfig) {
        self.config = config;
        self.physical_coeff = spline::physical_coeff(config.density);
    }

    /// Starts a fling from `start_offset` with `velocity` in pixels per second.
    ///
    /// The motion never leaves `[min_offset, max_offset]`; the bounds are
    /// swapped if given in the wrong order. Any fling already in flight is
    /// replaced. Returns `false`, leaving the scroller finished, when the
    /// velocity is zero or the motion would not move the offset at all.
    pub fn fling(
        &mut self,
        start_offset: i32,
        velocity: f64,
        min_offset: i32,
        max_offset: i32,
        now: u64,
    ) -> bool {
        let (min_offset, max_offset) = if min_offset <= max_offset {
            (min_offset, max_offset)
        } else {
            (max_offset, min_offset)
        };
        self.state = None;
        if velocity == 0.0 || !velocity.is_finite() {
            debug!(velocity, "fling ignored: no velocity");
            return false;
        }

        let friction = self.config.friction;
        let distance = spline::fling_distance(velocity, friction, self.physical_coeff);
        let duration = spline::fling_duration_ms(velocity, friction, self.physical_coeff);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float to int casts saturate and the target is clamped right after"
        )]
        let travel = (distance * velocity.signum()).round() as i64;
        let final_offset = (i64::from(start_offset) + travel)
            .clamp(i64::from(min_offset), i64::from(max_offset));
        let final_offset = i32::try_from(final_offset).unwrap_or(max_offset);
        if final_offset == start_offset {
            debug!(start_offset, velocity, "fling ignored: already at bound");
            return false;
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "Durations are a few seconds at most"
        )]
        let duration_ms = duration.max(0.0).ceil() as u64;
        debug!(
            start_offset,
            final_offset, velocity, duration_ms, "fling armed"
        );
        self.state = Some(FlingState {
            start_offset,
            start_velocity: velocity,
            min_offset,
            max_offset,
            final_offset,
            current_offset: start_offset,
            start_time: now,
            duration_ms,
        });
        true
    }

    /// Advances the motion to host time `now`.
    ///
    /// Returns the offset for this frame while a fling is in flight. The frame
    /// that reaches the final offset also marks the scroller finished; after
    /// that, and after [`InertialScroller::force_finish`], this returns `None`.
    pub fn tick(&mut self, now: u64) -> Option<i32> {
        let state = self.state.as_mut()?;
        let elapsed = now.saturating_sub(state.start_time);

        let offset = if elapsed < state.duration_ms {
            let t = elapsed as f64 / state.duration_ms as f64;
            let span = f64::from(state.final_offset - state.start_offset);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "The product is bounded by the span between start and final offsets"
            )]
            let travelled = (spline::distance_fraction(t) * span).round() as i32;
            state
                .start_offset
                .saturating_add(travelled)
                .clamp(state.min_offset, state.max_offset)
        } else {
            state.final_offset
        };
        state.current_offset = offset;
        trace!(offset, elapsed, "fling tick");

        if offset == state.final_offset {
            debug!(offset, elapsed, "fling settled");
            self.state = None;
        }
        Some(offset)
    }

    /// Stops the motion immediately, discarding any remaining travel.
    pub fn force_finish(&mut self) {
        if let Some(state) = self.state.take() {
            debug!(offset = state.current_offset, "fling interrupted");
        }
    }

    /// Returns `true` when no fling is in flight.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_none()
    }

    /// The in-flight fling, if any.
    #[must_use]
    pub fn state(&self) -> Option<&FlingState> {
        self.state.as_ref()
    }

    /// Unsigned distance a fling with this velocity would cover without bounds.
    #[must_use]
    pub fn predicted_distance(&self, velocity: f64) -> f64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        spline::fling_distance(velocity, self.config.friction, self.physical_coeff)
    }
}
