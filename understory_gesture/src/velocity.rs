// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release velocity estimation from timestamped pointer samples.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Maximum number of samples retained.
const HISTORY: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    time: u64,
    pos: Point,
}

/// Estimates pointer velocity with a least-squares line fit over recent samples.
///
/// Only samples within `horizon_ms` of the newest one contribute, and the fit
/// stops at the first gap longer than `stopped_ms`: a pointer that rested
/// before release has no velocity.
///
/// ```
/// use kurbo::Point;
/// use understory_gesture::VelocityTracker;
///
/// let mut tracker = VelocityTracker::default();
/// for i in 0..5_u32 {
///     tracker.add(u64::from(i) * 10, Point::new(0.0, 1000.0 - f64::from(i) * 20.0));
/// }
/// // 20 px every 10 ms, moving up.
/// let v = tracker.velocity();
/// assert!((v.y + 2000.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
    horizon_ms: u64,
    stopped_ms: u64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(100, 40)
    }
}

impl VelocityTracker {
    /// Creates a tracker with the given fit horizon and pointer-stopped gap.
    #[must_use]
    pub fn new(horizon_ms: u64, stopped_ms: u64) -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY),
            horizon_ms,
            stopped_ms,
        }
    }

    /// Records a pointer position at host time `time` in milliseconds.
    ///
    /// A sample older than the newest one restarts the history.
    pub fn add(&mut self, time: u64, pos: Point) {
        if self.samples.back().is_some_and(|s| time < s.time) {
            self.samples.clear();
        }
        if self.samples.len() == HISTORY {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time, pos });
    }

    /// Forgets all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Estimated velocity in pixels per second; zero without enough motion.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        let Some(newest) = self.samples.back() else {
            return Vec2::ZERO;
        };

        let mut window: Vec<Sample> = Vec::with_capacity(self.samples.len());
        let mut newer_time = newest.time;
        for sample in self.samples.iter().rev() {
            let age = newest.time - sample.time;
            if age > self.horizon_ms || newer_time - sample.time > self.stopped_ms {
                break;
            }
            newer_time = sample.time;
            window.push(*sample);
        }
        if window.len() < 2 {
            return Vec2::ZERO;
        }

        let n = window.len() as f64;
        let t_of = |s: &Sample| -((newest.time - s.time) as f64);
        let mean_t = window.iter().map(t_of).sum::<f64>() / n;
        let mean_x = window.iter().map(|s| s.pos.x).sum::<f64>() / n;
        let mean_y = window.iter().map(|s| s.pos.y).sum::<f64>() / n;

        let mut stt = 0.0;
        let mut stx = 0.0;
        let mut sty = 0.0;
        for s in &window {
            let dt = t_of(s) - mean_t;
            stt += dt * dt;
            stx += dt * (s.pos.x - mean_x);
            sty += dt * (s.pos.y - mean_y);
        }
        if stt == 0.0 {
            return Vec2::ZERO;
        }
        // Slopes are in pixels per millisecond.
        Vec2::new(stx / stt, sty / stt) * 1000.0
    }
}
