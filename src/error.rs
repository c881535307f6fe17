// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong with a render request.

/// The error type shared by every stage of a render request.  None of
/// these are retried; a failed request yields no buffer at all.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// The iteration budget must be at least one.
    #[fail(display = "Iteration budget must be at least 1")]
    InvalidIterationBudget,

    /// A half-open range whose start lies past its end.
    #[fail(display = "Invalid pixel range [{}, {})", start, end)]
    InvalidRange {
        /// First index of the range
        start: usize,
        /// One past the last index of the range
        end: usize,
    },

    /// Width or height of the image is zero.
    #[fail(display = "Image dimensions must be non-zero")]
    EmptyImage,

    /// The tiles handed to the coordinator do not partition the grid.
    #[fail(display = "Invalid partition: {}", reason)]
    InvalidPartition {
        /// What is wrong with the tiling
        reason: String,
    },

    /// The smoothing formula asked for the square root of a negative
    /// (or NaN) number.
    #[fail(display = "Smooth color normalization failed on {}", value)]
    InvalidNormalization {
        /// The offending argument to `sqrt`
        value: f64,
    },

    /// A worker saw the interrupt flag at a column boundary and gave up
    /// on the rest of its tile.
    #[fail(display = "Worker for tile {} was interrupted", tile)]
    InterruptedExecution {
        /// Index of the tile in its partition
        tile: usize,
    },

    /// A worker thread unwound instead of returning.
    #[fail(display = "Worker for tile {} panicked", tile)]
    WorkerPanicked {
        /// Index of the tile in its partition
        tile: usize,
    },

    /// The coordinator's own thread scope unwound.
    #[fail(display = "Render scope panicked")]
    ScopePanicked,

    /// The host would not give a worker a thread.
    #[fail(display = "Could not start worker for tile {}: {}", tile, reason)]
    SpawnFailed {
        /// Index of the tile in its partition
        tile: usize,
        /// The underlying failure
        reason: String,
    },

    /// A write aimed at a pixel outside the writer's tile.
    #[fail(display = "Pixel ({}, {}) lies outside the tile", x, y)]
    OutsideTile {
        /// Column of the pixel
        x: usize,
        /// Row of the pixel
        y: usize,
    },

    /// The finished buffer could not be handed to its destination.
    #[fail(display = "Could not write output: {}", reason)]
    Output {
        /// The underlying failure
        reason: String,
    },
}

impl From<::std::io::Error> for RenderError {
    fn from(err: ::std::io::Error) -> Self {
        RenderError::Output {
            reason: err.to_string(),
        }
    }
}
