// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time membership test and its smooth coloring.

use std::f64::consts::LN_2;

use error::RenderError;
use planes::ComplexPoint;

/// The squared escape radius.  Comparing `norm_sqr` against this is the
/// same as comparing the magnitude against 2.0, without the `sqrt`.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// The verdict for a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// Smooth color index, 0 through 255.
    pub color_index: u8,
    /// True if the point did not escape within the iteration budget.
    pub in_set: bool,
    /// The iteration at which the point escaped, or the full budget if
    /// it never did.
    pub iterations: usize,
}

/// Iterate `z <- z^2 + z0` starting from `z = z0`, at most
/// `max_iterations` times, and report whether (and how fast) the point
/// leaves the circle of radius 2.
pub fn evaluate(z0: ComplexPoint, max_iterations: usize) -> Result<EscapeResult, RenderError> {
    if max_iterations == 0 {
        return Err(RenderError::InvalidIterationBudget);
    }

    let mut z = z0;
    for t in 0..max_iterations {
        if z.norm_sqr() >= ESCAPE_NORM_SQR {
            return Ok(EscapeResult {
                color_index: smooth_color(z, t, max_iterations)?,
                in_set: false,
                iterations: t,
            });
        }
        z = z * z + z0;
    }

    Ok(EscapeResult {
        color_index: smooth_color(z, max_iterations, max_iterations)?,
        in_set: true,
        iterations: max_iterations,
    })
}

/// Continuous escape count, `(t + 1) - log2(ln |z|)`, normalized by the
/// square root of its share of the iteration budget and scaled into a
/// byte.  Values past 255 are pinned to 255.
///
/// A magnitude of 1 or less can only come from a point that never
/// escaped; the log-log correction has no meaning there and the index
/// is 0.  A negative (or NaN) argument to the square root is reported
/// rather than written into the image.
pub fn smooth_color(
    z: ComplexPoint,
    iteration: usize,
    max_iterations: usize,
) -> Result<u8, RenderError> {
    if max_iterations == 0 {
        return Err(RenderError::InvalidIterationBudget);
    }

    let magnitude = z.norm();
    if magnitude <= 1.0 {
        return Ok(0);
    }

    let value = (iteration as f64 + 1.0) - magnitude.ln().ln() / LN_2;
    let ratio = value / (max_iterations as f64);
    if ratio.is_nan() || ratio < 0.0 {
        return Err(RenderError::InvalidNormalization { value: ratio });
    }

    let index = (255.0 * ratio.sqrt()).floor();
    Ok(index.min(255.0) as u8)
}
