// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer that workers fill in and renderers read out.
//!
//! Storage is column-major: column `x` is the contiguous run
//! `cells[x * height .. (x + 1) * height]`.  That lets a partition be
//! carved up with nothing but `split_at_mut`, so each worker gets a
//! `TileView` over its own cells and can never reach anyone else's.

use std::mem;

use error::RenderError;
use partition::{Partition, Tile};

/// A width by height grid of color indices.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer.
    pub fn new(width: usize, height: usize) -> Result<PixelBuffer, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage);
        }
        Ok(PixelBuffer {
            width,
            height,
            cells: vec![0 as u8; width * height],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The color index at `(x, y)`, if that pixel exists.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[x * self.height + y])
        } else {
            None
        }
    }

    /// Copies the buffer out row by row, the layout image encoders want.
    pub fn to_row_major(&self) -> Vec<u8> {
        let mut rows = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            rows.extend(self.cells.iter().skip(y).step_by(self.height));
        }
        rows
    }

    /// Splits the buffer into one view per tile of `partition`, in the
    /// partition's order.  The borrow checker guarantees the views are
    /// disjoint; the partition guarantees they cover the buffer.
    pub fn tiles_mut<'a>(
        &'a mut self,
        partition: &Partition,
    ) -> Result<Vec<TileView<'a>>, RenderError> {
        if partition.width() != self.width || partition.height() != self.height {
            return Err(RenderError::InvalidPartition {
                reason: format!(
                    "partition is {}x{} but the buffer is {}x{}",
                    partition.width(),
                    partition.height(),
                    self.width,
                    self.height
                ),
            });
        }

        let tiles = partition.tiles();
        let mut columns: Vec<Vec<&'a mut [u8]>> = tiles
            .iter()
            .map(|t| Vec::with_capacity(t.x.len()))
            .collect();

        for (x, column) in self.cells.chunks_mut(self.height).enumerate() {
            let mut owners: Vec<usize> = (0..tiles.len())
                .filter(|&i| tiles[i].x.contains(x))
                .collect();
            owners.sort_by_key(|&i| tiles[i].y.start());

            let mut rest: &'a mut [u8] = column;
            let mut cursor = 0;
            for i in owners {
                let y = tiles[i].y;
                let taken = mem::replace(&mut rest, &mut []);
                let (_, tail) = taken.split_at_mut(y.start() - cursor);
                let (cells, tail) = tail.split_at_mut(y.len());
                columns[i].push(cells);
                rest = tail;
                cursor = y.end();
            }
        }

        Ok(tiles
            .iter()
            .zip(columns)
            .map(|(tile, columns)| TileView {
                tile: *tile,
                columns,
            })
            .collect())
    }
}

/// Exclusive write access to the cells of one tile.  Coordinates are
/// absolute image coordinates; anything outside the tile is refused.
#[derive(Debug)]
pub struct TileView<'a> {
    tile: Tile,
    columns: Vec<&'a mut [u8]>,
}

impl<'a> TileView<'a> {
    /// The tile this view covers.
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Writes one cell.  Refuses, and writes nothing, if `(x, y)` is
    /// not in this tile.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Result<(), RenderError> {
        if !self.tile.x.contains(x) || !self.tile.y.contains(y) {
            return Err(RenderError::OutsideTile { x, y });
        }
        self.columns[x - self.tile.x.start()][y - self.tile.y.start()] = value;
        Ok(())
    }
}
