// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A worker fills in one tile of the pixel buffer.

use std::thread;

use buffer::TileView;
use error::RenderError;
use escape::evaluate;
use planes::{Pixel, PlaneMapper};
use tracker::{CompletionToken, Interrupt};

/// Everything one thread needs to render its tile: exclusive access to
/// the tile's cells, and read-only access to the shared parameters.
pub struct Worker<'a> {
    index: usize,
    view: TileView<'a>,
    plane: &'a PlaneMapper,
    limit: usize,
    interrupt: Interrupt,
}

impl<'a> Worker<'a> {
    /// `index` is the tile's position in its partition, used to name the
    /// worker in logs and errors.  `limit` is the iteration budget.
    pub fn new(
        index: usize,
        view: TileView<'a>,
        plane: &'a PlaneMapper,
        limit: usize,
        interrupt: Interrupt,
    ) -> Self {
        Worker {
            index,
            view,
            plane,
            limit,
            interrupt,
        }
    }

    /// Renders the tile column by column, yielding between columns.
    /// The token is held for the whole run and released on every way
    /// out of this function, including a panic.
    ///
    /// If the interrupt is raised the rest of the tile is abandoned;
    /// whatever was already written stays written.
    pub fn run(mut self, token: CompletionToken) -> Result<(), RenderError> {
        let _token = token;
        let tile = self.view.tile();
        debug!("Worker {} starting on {:?}", self.index, tile);

        for x in tile.x {
            for y in tile.y {
                let point = self.plane.pixel_to_point(&Pixel(x, y));
                let result = evaluate(point, self.limit)?;
                self.view.set(x, y, result.color_index)?;
            }
            if self.interrupt.is_raised() {
                debug!("Worker {} interrupted after column {}", self.index, x);
                return Err(RenderError::InterruptedExecution { tile: self.index });
            }
            thread::yield_now();
        }

        debug!("Worker {} finished {} pixels", self.index, tile.area());
        Ok(())
    }
}
