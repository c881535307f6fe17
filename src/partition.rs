// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiles, and the proof that a set of tiles is a true partition of an
//! image.  The buffer relies on that proof to hand out disjoint views
//! without any locking.

use itertools::Itertools;

use error::RenderError;
use range::PixelRange;

/// Most tiles a partition may hold.  Every tile becomes a thread, so
/// this is also the most threads one render will start.
pub const MAX_TILES: usize = 1024;

/// One rectangle of work: every pixel in `x` cross `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Columns covered by the tile.
    pub x: PixelRange,
    /// Rows covered by the tile.
    pub y: PixelRange,
}

impl Tile {
    /// Builds a tile from its two axis ranges.
    pub fn new(x: PixelRange, y: PixelRange) -> Tile {
        Tile { x, y }
    }

    /// Number of pixels in the tile.
    pub fn area(&self) -> usize {
        self.x.len() * self.y.len()
    }

    /// True when the two tiles share a pixel.
    pub fn overlaps(&self, other: &Tile) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y)
    }
}

/// A list of tiles known to cover a `width` by `height` grid, with each
/// pixel in exactly one tile.  The only way to get one is through a
/// constructor that checks.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Partition {
    /// The whole image as one tile.
    pub fn single(width: usize, height: usize) -> Result<Partition, RenderError> {
        Partition::grid(width, height, 1, 1)
    }

    /// A `columns` by `rows` grid of near-equal tiles.  Tiles are listed
    /// column by column.  Asking for more tiles than there are pixels
    /// along an axis gives one tile per pixel along it; the resulting
    /// count must not exceed `MAX_TILES`.
    pub fn grid(
        width: usize,
        height: usize,
        columns: usize,
        rows: usize,
    ) -> Result<Partition, RenderError> {
        if columns == 0 || rows == 0 {
            return Err(RenderError::InvalidPartition {
                reason: format!("cannot build a {}x{} grid of tiles", columns, rows),
            });
        }
        let count = columns.min(width.max(1)) * rows.min(height.max(1));
        if count > MAX_TILES {
            return Err(RenderError::InvalidPartition {
                reason: format!("{} tiles is more than the limit of {}", count, MAX_TILES),
            });
        }
        let xs = PixelRange::new(0, width)?.split(columns);
        let ys = PixelRange::new(0, height)?.split(rows);
        let tiles = iproduct!(xs, ys).map(|(x, y)| Tile::new(x, y)).collect();
        Partition::from_tiles(width, height, tiles)
    }

    /// Accepts an arbitrary tiling, provided every tile lies inside the
    /// grid, no two tiles overlap, and together they cover every pixel.
    /// Tiles with no pixels in them are dropped, and at most `MAX_TILES`
    /// may remain.
    pub fn from_tiles(
        width: usize,
        height: usize,
        tiles: Vec<Tile>,
    ) -> Result<Partition, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage);
        }

        let tiles: Vec<Tile> = tiles.into_iter().filter(|t| t.area() > 0).collect();

        if tiles.len() > MAX_TILES {
            return Err(RenderError::InvalidPartition {
                reason: format!("{} tiles is more than the limit of {}", tiles.len(), MAX_TILES),
            });
        }

        if let Some(t) = tiles.iter().find(|t| t.x.end() > width || t.y.end() > height) {
            return Err(RenderError::InvalidPartition {
                reason: format!("tile {:?} lies outside the {}x{} grid", t, width, height),
            });
        }

        if let Some((a, b)) = first_overlap(&tiles) {
            return Err(RenderError::InvalidPartition {
                reason: format!("tiles {:?} and {:?} overlap", a, b),
            });
        }

        // Disjoint and in bounds, so equal area means full coverage.
        let covered: usize = tiles.iter().map(Tile::area).sum();
        if covered != width * height {
            return Err(RenderError::InvalidPartition {
                reason: format!(
                    "tiles cover {} of {} pixels",
                    covered,
                    width * height
                ),
            });
        }

        trace!("Accepted {} tiles over a {}x{} grid", tiles.len(), width, height);
        Ok(Partition {
            width,
            height,
            tiles,
        })
    }

    /// Width of the partitioned grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the partitioned grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The tiles, in the order workers will be numbered.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles, and so of workers.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Never true for a validated partition of a non-empty grid.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Sweeps the tiles left to right, comparing each only with the tiles
/// whose columns are still open where it starts.
fn first_overlap(tiles: &[Tile]) -> Option<(Tile, Tile)> {
    let mut open: Vec<Tile> = vec![];
    for tile in tiles.iter().sorted_by_key(|t| t.x.start()) {
        open.retain(|o| o.x.end() > tile.x.start());
        if let Some(other) = open.iter().find(|o| o.y.overlaps(&tile.y)) {
            return Some((*other, *tile));
        }
        open.push(*tile);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x0: usize, x1: usize, y0: usize, y1: usize) -> Tile {
        Tile::new(PixelRange::new(x0, x1).unwrap(), PixelRange::new(y0, y1).unwrap())
    }

    #[test]
    fn grid_covers_every_pixel_once() {
        let p = Partition::grid(1200, 700, 4, 3).unwrap();
        assert_eq!(p.len(), 12);
        let mut seen = vec![0u8; 1200 * 700];
        for t in p.tiles() {
            for x in t.x {
                for y in t.y {
                    seen[y * 1200 + x] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn single_is_one_tile() {
        let p = Partition::single(10, 5).unwrap();
        assert_eq!(p.tiles(), &[tile(0, 10, 0, 5)][..]);
    }

    #[test]
    fn zero_grid_is_rejected() {
        assert!(Partition::grid(10, 10, 0, 2).is_err());
        assert_eq!(Partition::grid(0, 10, 1, 1).unwrap_err(), RenderError::EmptyImage);
    }

    #[test]
    fn irregular_tiles_are_accepted() {
        // An L-shaped split: one tall tile on the left, two on the right.
        let tiles = vec![tile(0, 3, 0, 4), tile(3, 5, 0, 1), tile(3, 5, 1, 4)];
        let p = Partition::from_tiles(5, 4, tiles).unwrap();
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn overlapping_tiles_are_rejected() {
        let tiles = vec![tile(0, 3, 0, 4), tile(2, 5, 0, 4)];
        match Partition::from_tiles(5, 4, tiles) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("overlap")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gaps_are_rejected() {
        let tiles = vec![tile(0, 3, 0, 4), tile(4, 5, 0, 4)];
        match Partition::from_tiles(5, 4, tiles) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("cover")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn out_of_bounds_tiles_are_rejected() {
        let tiles = vec![tile(0, 6, 0, 4)];
        match Partition::from_tiles(5, 4, tiles) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("outside")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn too_many_tiles_are_rejected_before_building() {
        match Partition::grid(1200, 700, 1200, 700) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("limit")),
            other => panic!("unexpected {:?}", other.map(|p| p.len())),
        }
        assert_eq!(Partition::grid(1200, 700, 32, 32).unwrap().len(), MAX_TILES);
    }

    #[test]
    fn too_many_arbitrary_tiles_are_rejected() {
        let tiles = (0..MAX_TILES + 1).map(|x| tile(x, x + 1, 0, 1)).collect();
        match Partition::from_tiles(MAX_TILES + 1, 1, tiles) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("limit")),
            other => panic!("unexpected {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn overlap_is_found_past_closed_columns() {
        // The first two tiles close before the third starts; the fourth
        // overlaps the third only.
        let tiles = vec![
            tile(0, 2, 0, 4),
            tile(2, 4, 0, 4),
            tile(4, 8, 0, 3),
            tile(6, 8, 2, 4),
        ];
        match Partition::from_tiles(8, 4, tiles) {
            Err(RenderError::InvalidPartition { reason }) => assert!(reason.contains("overlap")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_tiles_are_dropped() {
        let tiles = vec![tile(0, 5, 0, 4), tile(2, 2, 0, 4)];
        assert_eq!(Partition::from_tiles(5, 4, tiles).unwrap().len(), 1);
    }
}
