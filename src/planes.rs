// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! in the upper-left corner, and the fixed window of the complex
//! plane in which the Mandelbrot set is drawn.
use num::Complex;

use error::RenderError;

/// A single point on the complex plane.  The arithmetic (add,
/// multiply, magnitude) all comes from `num`.
pub type ComplexPoint = Complex<f64>;

/// Left edge of the complex window.
pub const RE_MIN: f64 = -2.5;
/// Right edge of the complex window.
pub const RE_MAX: f64 = 1.0;
/// Bottom edge of the complex window.
pub const IM_MIN: f64 = -1.5;
/// Top edge of the complex window.
pub const IM_MAX: f64 = 1.5;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0 and all values are assumed to be non-negative
/// integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane.  Y grows
/// downward, the way images are addressed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of an image onto the complex window
/// `[RE_MIN, RE_MAX] x [IM_MIN, IM_MAX]`.  The window itself never
/// moves; only the resolution of the image changes.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The lower-right corner of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    // Width and height of the image as floats, divided into the pixel
    // coordinates before scaling to the window.
    extent: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the image; refuses images with
    /// no pixels in them.
    pub fn new(width: usize, height: usize) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage);
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            extent: (width as f64, height as f64),
        })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Never true for a constructed mapper, but clippy insists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Given a pixel on the integral cartesian plane, return the point
    /// on the complex plane under its upper-left corner.  Pixel (0, 0)
    /// is `RE_MIN + IM_MAX i`.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> ComplexPoint {
        Complex::new(
            RE_MIN + ((pixel.0 as f64) / self.extent.0) * (RE_MAX - RE_MIN),
            IM_MAX - ((pixel.1 as f64) / self.extent.1) * (IM_MAX - IM_MIN),
        )
    }
}
