// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognizes scroll and fling gestures from raw single-pointer events.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use kurbo::{Point, Vec2};
use tracing::{debug, trace};

use crate::drag::DragState;
use crate::velocity::VelocityTracker;

/// Thresholds for gesture recognition, in device pixels and milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Distance the pointer must travel from the press before scrolling starts.
    pub touch_slop: f64,
    /// Minimum release speed on either axis, in pixels per second, for a fling.
    pub min_fling_velocity: f64,
    /// Release velocity is clamped to this speed on each axis.
    pub max_fling_velocity: f64,
    /// Age of the oldest sample used for the velocity estimate.
    pub velocity_horizon_ms: u64,
    /// A gap between samples longer than this means the pointer had stopped.
    pub pointer_stopped_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::for_density(1.0)
    }
}

impl GestureConfig {
    /// Platform-typical thresholds scaled for a display density, where `1.0`
    /// is 160 pixels per inch.
    #[must_use]
    pub fn for_density(density: f64) -> Self {
        Self {
            touch_slop: 8.0 * density,
            min_fling_velocity: 50.0 * density,
            max_fling_velocity: 8000.0 * density,
            velocity_horizon_ms: 100,
            pointer_stopped_ms: 40,
        }
    }

    /// Returns a copy with the given touch slop.
    #[must_use]
    pub fn with_touch_slop(mut self, touch_slop: f64) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    /// Returns a copy with the given fling velocity limits.
    #[must_use]
    pub fn with_fling_velocity(mut self, min: f64, max: f64) -> Self {
        self.min_fling_velocity = min;
        self.max_fling_velocity = max;
        self
    }
}

/// A recognized gesture step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// The pointer went down.
    Down {
        /// Press position.
        pos: Point,
    },
    /// The pointer moved far enough to scroll.
    ///
    /// `distance` is the previous position minus the current one, so content
    /// that follows the finger moves its scroll offset by `+distance`.
    Scroll {
        /// Scroll distance in device pixels.
        distance: Vec2,
    },
    /// The pointer was released while moving fast enough.
    Fling {
        /// Release velocity in device pixels per second, in screen
        /// coordinates.
        velocity: Vec2,
    },
    /// The pointer was released without a fling.
    Release {
        /// `true` if the pointer never left the touch-slop region.
        tap: bool,
    },
}

/// Turns pointer down/move/up events into [`Gesture`]s.
///
/// ```
/// use kurbo::Point;
/// use understory_gesture::{Gesture, GestureDetector};
///
/// let mut detector = GestureDetector::default();
/// detector.on_pointer_down(Point::new(100.0, 500.0), 0);
/// // Inside the touch slop: nothing yet.
/// assert_eq!(detector.on_pointer_move(Point::new(100.0, 497.0), 8), None);
///
/// // Past the slop: the whole distance from the press is reported.
/// let step = detector.on_pointer_move(Point::new(100.0, 480.0), 16);
/// assert!(matches!(step, Some(Gesture::Scroll { distance }) if distance.y == 20.0));
/// ```
#[derive(Clone, Debug)]
pub struct GestureDetector {
    config: GestureConfig,
    drag: DragState,
    tracker: VelocityTracker,
    in_tap_region: bool,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureDetector {
    /// Creates a detector with the given thresholds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            drag: DragState::default(),
            tracker: VelocityTracker::new(config.velocity_horizon_ms, config.pointer_stopped_ms),
            in_tap_region: false,
        }
    }

    /// Active thresholds.
    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Returns `true` while a pointer is down.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Returns `true` once the current press has left the touch-slop region.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.is_pressed() && !self.in_tap_region
    }

    /// Handles a pointer press at host time `time`.
    pub fn on_pointer_down(&mut self, pos: Point, time: u64) -> Gesture {
        self.drag.start(pos);
        self.tracker.clear();
        self.tracker.add(time, pos);
        self.in_tap_region = true;
        Gesture::Down { pos }
    }

    /// Handles pointer motion; returns a scroll step once movement qualifies.
    pub fn on_pointer_move(&mut self, pos: Point, time: u64) -> Option<Gesture> {
        if !self.drag.is_dragging() {
            return None;
        }
        self.tracker.add(time, pos);

        if self.in_tap_region {
            let total = self.drag.total_offset(pos)?;
            if total.hypot2() <= self.config.touch_slop * self.config.touch_slop {
                return None;
            }
            self.in_tap_region = false;
            trace!(?total, "drag left touch slop");
        } else {
            let pending = self.drag.pending(pos)?;
            if pending.x.abs() < 1.0 && pending.y.abs() < 1.0 {
                return None;
            }
        }
        let delta = self.drag.consume(pos)?;
        Some(Gesture::Scroll { distance: -delta })
    }

    /// Handles a pointer release; returns `None` if no press was active.
    ///
    /// The release position only feeds the velocity estimate. Movement since
    /// the last [`Gesture::Scroll`] is not reported, so up to one pixel of
    /// sub-pixel motion per axis is dropped at the end of a drag. Hosts that
    /// need it should deliver the release position as a move first.
    pub fn on_pointer_up(&mut self, pos: Point, time: u64) -> Option<Gesture> {
        if !self.drag.is_dragging() {
            return None;
        }
        self.tracker.add(time, pos);
        let gesture = if self.in_tap_region {
            Gesture::Release { tap: true }
        } else {
            let max = self.config.max_fling_velocity;
            let raw = self.tracker.velocity();
            let velocity = Vec2::new(raw.x.clamp(-max, max), raw.y.clamp(-max, max));
            let min = self.config.min_fling_velocity;
            if velocity.x.abs() > min || velocity.y.abs() > min {
                debug!(?velocity, "fling recognized");
                Gesture::Fling { velocity }
            } else {
                Gesture::Release { tap: false }
            }
        };
        self.reset();
        Some(gesture)
    }

    /// Abandons the current press without producing a gesture.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.drag.end();
        self.tracker.clear();
        self.in_tap_region = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(y: f64) -> Point {
        Point::new(200.0, y)
    }

    #[test]
    fn tap_produces_release_without_scroll() {
        let mut d = GestureDetector::default();
        assert_eq!(d.on_pointer_down(pt(300.0), 0), Gesture::Down { pos: pt(300.0) });
        assert_eq!(d.on_pointer_move(pt(303.0), 10), None);
        assert_eq!(d.on_pointer_up(pt(303.0), 20), Some(Gesture::Release { tap: true }));
        assert!(!d.is_pressed());
    }

    #[test]
    fn events_without_press_are_ignored() {
        let mut d = GestureDetector::default();
        assert_eq!(d.on_pointer_move(pt(0.0), 0), None);
        assert_eq!(d.on_pointer_up(pt(0.0), 0), None);
    }

    #[test]
    fn scroll_distance_follows_finger() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(500.0), 0);
        // Finger moves up by 30: content scrolls forward by 30.
        assert_eq!(
            d.on_pointer_move(pt(470.0), 10),
            Some(Gesture::Scroll {
                distance: Vec2::new(0.0, 30.0)
            })
        );
        assert!(d.is_scrolling());
        // Finger moves down by 12: content scrolls back.
        assert_eq!(
            d.on_pointer_move(pt(482.0), 20),
            Some(Gesture::Scroll {
                distance: Vec2::new(0.0, -12.0)
            })
        );
    }

    #[test]
    fn sub_pixel_moves_accumulate() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(500.0), 0);
        d.on_pointer_move(pt(480.0), 10);
        assert_eq!(d.on_pointer_move(pt(479.6), 20), None);
        assert_eq!(d.on_pointer_move(pt(479.2), 30), None);
        let step = d.on_pointer_move(pt(478.9), 40);
        match step {
            Some(Gesture::Scroll { distance }) => assert!((distance.y - 1.1).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn quick_release_is_a_fling() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(800.0), 0);
        for i in 1..=6_u32 {
            d.on_pointer_move(pt(800.0 - f64::from(i) * 20.0), u64::from(i) * 10);
        }
        let up = d.on_pointer_up(pt(680.0), 60).unwrap();
        match up {
            Gesture::Fling { velocity } => assert!(velocity.y < -1000.0, "{velocity:?}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!d.is_pressed());
    }

    #[test]
    fn fling_velocity_is_clamped() {
        let config = GestureConfig::default().with_fling_velocity(50.0, 3000.0);
        let mut d = GestureDetector::new(config);
        d.on_pointer_down(pt(2000.0), 0);
        for i in 1..=5_u32 {
            d.on_pointer_move(pt(2000.0 - f64::from(i) * 300.0), u64::from(i) * 5);
        }
        let up = d.on_pointer_up(pt(500.0), 25).unwrap();
        assert_eq!(
            up,
            Gesture::Fling {
                velocity: Vec2::new(0.0, -3000.0)
            }
        );
    }

    #[test]
    fn slow_drag_release_is_not_a_fling() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(500.0), 0);
        d.on_pointer_move(pt(480.0), 10);
        // Rest, then release.
        d.on_pointer_move(pt(480.0), 500);
        assert_eq!(d.on_pointer_up(pt(480.0), 600), Some(Gesture::Release { tap: false }));
    }

    #[test]
    fn release_drops_pending_sub_pixel_motion() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(500.0), 0);
        assert!(d.on_pointer_move(pt(480.0), 10).is_some());
        assert_eq!(d.on_pointer_move(pt(479.4), 500), None);
        // Only the release kind is reported; the 0.6 px are not.
        assert_eq!(d.on_pointer_up(pt(479.4), 600), Some(Gesture::Release { tap: false }));
        assert!(!d.is_pressed());
    }

    #[test]
    fn cancel_discards_press() {
        let mut d = GestureDetector::default();
        d.on_pointer_down(pt(500.0), 0);
        d.on_pointer_move(pt(400.0), 10);
        d.cancel();
        assert!(!d.is_pressed());
        assert_eq!(d.on_pointer_up(pt(300.0), 20), None);
    }

    #[test]
    fn density_scales_thresholds() {
        let c = GestureConfig::for_density(2.0);
        assert_eq!(c.touch_slop, 16.0);
        assert_eq!(c.min_fling_velocity, 100.0);
        assert_eq!(c.max_fling_velocity, 16000.0);
        assert_eq!(GestureConfig::default().with_touch_slop(4.0).touch_slop, 4.0);
    }
}
