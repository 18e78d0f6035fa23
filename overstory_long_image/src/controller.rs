// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures to decode-window motion.

use kurbo::Point;
use tracing::{debug, trace};
use understory_decode_window::DecodeWindow;
use understory_fling::{FlingConfig, InertialScroller};
use understory_gesture::{Gesture, GestureConfig, GestureDetector};

/// Phase of the gesture state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No pointer is down and nothing is moving.
    #[default]
    Idle,
    /// A pointer is down; moves scroll the window directly.
    Dragging,
    /// The pointer was thrown; the window is coasting.
    Flinging,
}

/// Translates pointer events into decode-window motion.
///
/// Transitions:
/// - `Idle | Flinging` + down: `Dragging`. An active fling is stopped where it
///   is.
/// - `Dragging` + move: the window is offset by the vertical scroll distance.
/// - `Dragging` + up: `Flinging` if the release qualifies as a fling and the
///   window can move in that direction, otherwise `Idle`.
/// - `Flinging` + tick: the window follows the fling; `Idle` once it settles.
///
/// Pointer moves and releases outside `Dragging` are ignored, so a fling can
/// only be armed by the release that ends a press.
///
/// The window is passed in by the caller on every event. It is `None` while no
/// image or valid viewport is known; the state machine still advances but
/// nothing moves.
#[derive(Clone, Debug)]
pub struct GestureController {
    detector: GestureDetector,
    scroller: InertialScroller,
    state: GestureState,
    remainder: f64,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default(), FlingConfig::default())
    }
}

impl GestureController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(gesture: GestureConfig, fling: FlingConfig) -> Self {
        Self {
            detector: GestureDetector::new(gesture),
            scroller: InertialScroller::new(fling),
            state: GestureState::Idle,
            remainder: 0.0,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Returns `true` while a fling is in flight.
    #[must_use]
    pub fn is_flinging(&self) -> bool {
        self.state == GestureState::Flinging
    }

    /// The inertial model driving flings.
    #[must_use]
    pub fn scroller(&self) -> &InertialScroller {
        &self.scroller
    }

    /// Handles a pointer press, stopping any fling immediately.
    pub fn on_pointer_down(&mut self, pos: Point, time: u64) {
        if self.state == GestureState::Flinging {
            debug!("touch down during fling");
        }
        self.scroller.force_finish();
        self.detector.on_pointer_down(pos, time);
        self.remainder = 0.0;
        self.state = GestureState::Dragging;
    }

    /// Handles pointer motion. Returns `true` if the window was offset and a
    /// redraw is needed.
    pub fn on_pointer_move(
        &mut self,
        window: Option<&mut DecodeWindow>,
        pos: Point,
        time: u64,
    ) -> bool {
        if self.state != GestureState::Dragging {
            return false;
        }
        let Some(Gesture::Scroll { distance }) = self.detector.on_pointer_move(pos, time) else {
            return false;
        };
        // Horizontal motion is ignored; fractional rows carry to the next move.
        let rows = distance.y + self.remainder;
        let whole = rows.trunc();
        self.remainder = rows - whole;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Float to int casts saturate and the window clamps the result"
        )]
        let delta = whole as i32;
        let Some(window) = window else {
            return false;
        };
        if delta == 0 {
            return false;
        }
        let clamp = window.offset_vertically(delta);
        trace!(delta, top = window.top(), ?clamp, "drag");
        true
    }

    /// Handles a pointer release. Returns `true` if a fling was armed.
    ///
    /// `time` is also the start time of the fling. A fraction of a row still
    /// carried from earlier moves is dropped.
    pub fn on_pointer_up(&mut self, window: Option<&DecodeWindow>, pos: Point, time: u64) -> bool {
        if self.state != GestureState::Dragging {
            return false;
        }
        self.state = GestureState::Idle;
        self.remainder = 0.0;
        let Some(Gesture::Fling { velocity }) = self.detector.on_pointer_up(pos, time) else {
            return false;
        };
        let Some(window) = window else {
            return false;
        };
        // Screen velocity is opposite to the motion of the window top.
        if self
            .scroller
            .fling(window.top(), -velocity.y, 0, window.max_top(), time)
        {
            self.state = GestureState::Flinging;
            true
        } else {
            false
        }
    }

    /// Abandons the current press or fling without further motion.
    pub fn cancel(&mut self) {
        self.detector.cancel();
        self.scroller.force_finish();
        self.remainder = 0.0;
        self.state = GestureState::Idle;
    }

    /// Stops a fling in flight, leaving any press untouched.
    pub fn stop_fling(&mut self) {
        self.scroller.force_finish();
        if self.state == GestureState::Flinging {
            self.state = GestureState::Idle;
        }
    }

    /// Advances a fling to host time `now`. Returns `true` if the window moved
    /// and a redraw is needed.
    pub fn tick(&mut self, window: Option<&mut DecodeWindow>, now: u64) -> bool {
        if self.state != GestureState::Flinging {
            return false;
        }
        let Some(window) = window else {
            self.stop_fling();
            return false;
        };
        let Some(offset) = self.scroller.tick(now) else {
            self.state = GestureState::Idle;
            return false;
        };
        window.set_top(offset);
        if self.scroller.is_finished() {
            self.state = GestureState::Idle;
        }
        true
    }
}
