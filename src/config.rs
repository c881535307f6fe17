// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs of a render request.

use num_cpus;

use error::RenderError;
use partition::{Partition, MAX_TILES};

/// Default image width, in pixels.
pub const DEFAULT_WIDTH: usize = 1200;
/// Default image height, in pixels.
pub const DEFAULT_HEIGHT: usize = 700;
/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Size, iteration budget and tiling of a render.  The complex window
/// is fixed and deliberately not part of this.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// The most iterations spent on any one point.
    pub max_iterations: usize,
    /// Number of tile columns.
    pub tiles_x: usize,
    /// Number of tile rows.
    pub tiles_y: usize,
}

impl Default for RenderConfig {
    /// 1200x700, split into one vertical strip per CPU.
    fn default() -> Self {
        RenderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_ITERATIONS,
            tiles_x: num_cpus::get(),
            tiles_y: 1,
        }
    }
}

impl RenderConfig {
    /// Rejects anything that could not produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage);
        }
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidIterationBudget);
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(RenderError::InvalidPartition {
                reason: format!("cannot build a {}x{} grid of tiles", self.tiles_x, self.tiles_y),
            });
        }
        let count = self.tiles_x.min(self.width) * self.tiles_y.min(self.height);
        if count > MAX_TILES {
            return Err(RenderError::InvalidPartition {
                reason: format!("{} tiles is more than the limit of {}", count, MAX_TILES),
            });
        }
        Ok(())
    }

    /// The grid of tiles this configuration asks for.  Asking for more
    /// tiles than there are pixels along an axis gives one tile per
    /// pixel along it.
    pub fn partition(&self) -> Result<Partition, RenderError> {
        self.validate()?;
        Partition::grid(self.width, self.height, self.tiles_x, self.tiles_y)
    }
}
