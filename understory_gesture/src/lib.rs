// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Gesture: single-pointer gesture recognition for UI.
//!
//! This crate turns raw, timestamped pointer events into the gestures a
//! scrolling surface cares about:
//!
//! - [`drag`]: press/consumed-position tracking with explicit consumption of
//!   movement, so small moves are deferred rather than dropped.
//! - [`VelocityTracker`]: release velocity from a least-squares fit over the
//!   most recent samples.
//! - [`GestureDetector`]: a touch-slop aware recognizer producing
//!   [`Gesture::Down`], [`Gesture::Scroll`], [`Gesture::Fling`] and
//!   [`Gesture::Release`].
//!
//! Positions are device pixels in screen coordinates (`y` grows downward) and
//! timestamps are milliseconds from a host monotonic clock. The crate does not
//! assume any UI framework or event type; hosts translate their own pointer
//! events into the three `on_pointer_*` calls.
//!
//! ```rust
//! use kurbo::Point;
//! use understory_gesture::{Gesture, GestureDetector};
//!
//! let mut detector = GestureDetector::default();
//! detector.on_pointer_down(Point::new(50.0, 400.0), 0);
//! let mut steps = Vec::new();
//! for i in 1..=5_u32 {
//!     let y = 400.0 - f64::from(i) * 25.0;
//!     steps.extend(detector.on_pointer_move(Point::new(50.0, y), u64::from(i) * 10));
//! }
//! let release = detector.on_pointer_up(Point::new(50.0, 275.0), 50).unwrap();
//!
//! assert_eq!(steps.len(), 5);
//! assert!(matches!(release, Gesture::Fling { velocity } if velocity.y < 0.0));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod drag;

mod detector;
mod velocity;

pub use detector::{Gesture, GestureConfig, GestureDetector};
pub use velocity::VelocityTracker;
