// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tracking: the press position, the last consumed position, and the
//! movement between them.
//!
//! Unlike a plain "delta since last event" tracker, consuming movement is
//! explicit. [`DragState::pending`] peeks at the movement since the last
//! consumed position without moving it, and [`DragState::consume`] advances
//! it. This lets a recognizer ignore jitter inside a touch-slop region, or
//! sub-pixel moves, without losing them.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 100.0));
//!
//! // Small moves can be inspected without consuming them.
//! assert_eq!(drag.pending(Point::new(10.0, 97.0)), Some(Vec2::new(0.0, -3.0)));
//!
//! // Consuming reports the movement since the last consumed position.
//! assert_eq!(drag.consume(Point::new(10.0, 90.0)), Some(Vec2::new(0.0, -10.0)));
//! assert_eq!(drag.total_offset(Point::new(10.0, 80.0)), Some(Vec2::new(0.0, -20.0)));
//! ```

use kurbo::{Point, Vec2};

/// Press position and last consumed position of an active drag.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Position where the pointer went down.
    pub start_pos: Option<Point>,
    /// Position up to which movement has been consumed.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Begins tracking from `pos`, replacing any previous drag.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Movement from the last consumed position to `pos`, without consuming it.
    #[must_use]
    pub fn pending(&self, pos: Point) -> Option<Vec2> {
        self.last_pos.filter(|_| self.is_dragging()).map(|last| pos - last)
    }

    /// Consumes movement up to `pos`, returning it.
    pub fn consume(&mut self, pos: Point) -> Option<Vec2> {
        let delta = self.pending(pos)?;
        self.last_pos = Some(pos);
        Some(delta)
    }

    /// Offset from the press position to `pos`.
    #[must_use]
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| pos - start)
    }

    /// Ends the drag and forgets both positions.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` between [`DragState::start`] and [`DragState::end`].
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_state_reports_nothing() {
        let mut drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.pending(Point::new(1.0, 1.0)), None);
        assert_eq!(drag.consume(Point::new(1.0, 1.0)), None);
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
        assert!(drag.last_pos.is_none());
    }

    #[test]
    fn pending_does_not_advance() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 50.0));

        assert_eq!(drag.pending(Point::new(0.0, 48.0)), Some(Vec2::new(0.0, -2.0)));
        assert_eq!(drag.pending(Point::new(0.0, 45.0)), Some(Vec2::new(0.0, -5.0)));
        assert_eq!(drag.last_pos, Some(Point::new(0.0, 50.0)));
    }

    #[test]
    fn consume_tracks_incremental_deltas() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));

        assert_eq!(drag.consume(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.consume(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(drag.consume(Point::new(8.0, -1.0)), Some(Vec2::new(0.0, -8.0)));
        assert_eq!(drag.total_offset(Point::new(8.0, -1.0)), Some(Vec2::new(8.0, -1.0)));
    }

    #[test]
    fn consume_without_last_position_is_ignored() {
        let mut drag = DragState {
            start_pos: Some(Point::new(10.0, 20.0)),
            last_pos: None,
        };
        assert_eq!(drag.consume(Point::new(15.0, 25.0)), None);
        assert_eq!(drag.total_offset(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn restart_replaces_previous_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));
        drag.consume(Point::new(10.0, 10.0));

        drag.start(Point::new(50.0, 60.0));
        assert_eq!(drag.start_pos, drag.last_pos);
        assert_eq!(drag.total_offset(Point::new(55.0, 65.0)), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn end_resets_state() {
        let mut drag = DragState::default();
        drag.start(Point::new(10.0, 20.0));
        drag.end();
        assert_eq!(drag, DragState::default());
        // Ending twice is harmless.
        drag.end();
        assert!(!drag.is_dragging());
    }
}
