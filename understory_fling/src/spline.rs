// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spline deceleration curve shared by all scrollers.

use core::f64::consts::E;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ln`, `powf`

/// Number of samples in the position table.
pub(crate) const NB_SAMPLES: usize = 100;

const INFLEXION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLEXION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLEXION);

const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
/// Tuning factor applied to the physical coefficient.
const LOOK_AND_FEEL: f64 = 0.84;

/// `ln(0.78) / ln(0.9)`.
pub(crate) fn deceleration_rate() -> f64 {
    0.78_f64.ln() / 0.9_f64.ln()
}

/// Normalized distance travelled at normalized time `i / NB_SAMPLES`.
static SPLINE_POSITION: [f64; NB_SAMPLES + 1] = build_spline_position();

/// Bisects the spline for each sample; evaluated at compile time.
const fn build_spline_position() -> [f64; NB_SAMPLES + 1] {
    let mut table = [0.0; NB_SAMPLES + 1];
    let mut x_min = 0.0_f64;
    let mut i = 0;
    while i < NB_SAMPLES {
        let alpha = i as f64 / NB_SAMPLES as f64;
        let mut x_max = 1.0_f64;
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            let err = tx - alpha;
            if err < 1e-5 && err > -1e-5 {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        table[i] = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
        i += 1;
    }
    table[NB_SAMPLES] = 1.0;
    table
}

/// Fraction of the total distance covered after `t` of the duration, with
/// `t` in `[0, 1]`.
pub(crate) fn distance_fraction(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "t is clamped to [0, 1], so the index is within the table"
    )]
    let index = (NB_SAMPLES as f64 * t) as usize;
    if index >= NB_SAMPLES {
        return 1.0;
    }
    let t_inf = index as f64 / NB_SAMPLES as f64;
    let t_sup = (index + 1) as f64 / NB_SAMPLES as f64;
    let d_inf = SPLINE_POSITION[index];
    let d_sup = SPLINE_POSITION[index + 1];
    let velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
    d_inf + (t - t_inf) * velocity_coef
}

/// Deceleration in pixels per second squared for a display of the given
/// density, where density `1.0` means 160 pixels per inch.
pub(crate) fn physical_coeff(density: f64) -> f64 {
    let ppi = density * 160.0;
    GRAVITY_EARTH * INCHES_PER_METER * ppi * LOOK_AND_FEEL
}

fn spline_deceleration(velocity: f64, friction: f64, coeff: f64) -> f64 {
    (INFLEXION * velocity.abs() / (friction * coeff)).ln()
}

/// Duration of a fling in milliseconds.
pub(crate) fn fling_duration_ms(velocity: f64, friction: f64, coeff: f64) -> f64 {
    let l = spline_deceleration(velocity, friction, coeff);
    1000.0 * E.powf(l / (deceleration_rate() - 1.0))
}

/// Unsigned distance covered by a fling, in pixels.
pub(crate) fn fling_distance(velocity: f64, friction: f64, coeff: f64) -> f64 {
    let l = spline_deceleration(velocity, friction, coeff);
    let rate = deceleration_rate();
    friction * coeff * E.powf(rate / (rate - 1.0) * l)
}
