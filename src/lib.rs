#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding `c` never runs off to
//! infinity.  Points outside the set are colored by how quickly they
//! escape, with a logarithmic correction so the colors blend smoothly
//! instead of banding at every whole iteration.
//!
//! Every pixel is independent of every other, so the image is cut into
//! rectangular tiles and each tile is rendered on its own thread.  The
//! tiles are checked to be a true partition of the image before any
//! thread starts, and the pixel buffer is split into per-tile views
//! along the same lines, so no two threads can ever write the same
//! cell and no locking is needed on the buffer itself.  The only
//! synchronization is a countdown the coordinator waits on.

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod escape;
pub mod partition;
pub mod planes;
pub mod range;
pub mod tracker;
pub mod worker;

pub use buffer::{PixelBuffer, TileView};
pub use config::RenderConfig;
pub use coordinator::Coordinator;
pub use error::RenderError;
pub use escape::{evaluate, EscapeResult};
pub use partition::{Partition, Tile, MAX_TILES};
pub use planes::{ComplexPoint, Pixel, PlaneMapper};
pub use range::PixelRange;
pub use tracker::{CompletionToken, CompletionTracker, Interrupt};
pub use worker::Worker;
