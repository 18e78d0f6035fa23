// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Fling: inertial motion for scrolling surfaces.
//!
//! [`InertialScroller`] turns a release velocity into a decaying sequence of
//! integer offsets. The curve is the spline deceleration used by common
//! touch platforms: travel distance and duration follow from the initial
//! velocity, friction, and display density, and progress along the curve is
//! read from a precomputed position table.
//!
//! The scroller is time-indexed rather than frame-indexed. Hosts pass their
//! own monotonic clock in milliseconds to [`InertialScroller::fling`] and
//! [`InertialScroller::tick`], so dropped frames shorten nothing: a late tick
//! simply lands further along the curve.
//!
//! Offsets never leave the `[min, max]` range given when the fling is armed;
//! that is the only bounding applied during inertial motion.
//!
//! This crate does not know about gestures or windows. See
//! `overstory_long_image` for a controller that arms a scroller from a
//! recognized fling and applies its offsets to a decode window.
//!
//! This crate is `no_std`. Float math comes from Kurbo, so build with either
//! the `std` (default) or the `libm` feature.

#![no_std]

mod scroller;
mod spline;

pub use scroller::{FlingConfig, FlingState, InertialScroller};
