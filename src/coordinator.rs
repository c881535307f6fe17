// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coordinator owns a render request from start to finish: it
//! allocates the buffer, hands each tile to its own thread, waits for
//! all of them, and either returns the finished buffer or the first
//! thing that went wrong.

use std::thread;
use std::time::Instant;

use crossbeam;

use buffer::PixelBuffer;
use config::RenderConfig;
use error::RenderError;
use partition::Partition;
use planes::PlaneMapper;
use tracker::{CompletionTracker, Interrupt};
use worker::Worker;

/// Renders Mandelbrot images of a fixed size and iteration budget.  One
/// coordinator can serve any number of requests, one after another or
/// from several threads at once.  Requests share nothing: each gets a
/// fresh buffer and its own interrupt flag.
pub struct Coordinator {
    plane: PlaneMapper,
    limit: usize,
}

impl Coordinator {
    /// Checks the configuration and prepares the plane mapping.
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Coordinator {
            plane: PlaneMapper::new(config.width, config.height)?,
            limit: config.max_iterations,
        })
    }

    /// The mapping from pixels to the complex plane.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Renders the image, one thread per tile of `partition`, with no
    /// way to interrupt it.
    pub fn render(&self, partition: &Partition) -> Result<PixelBuffer, RenderError> {
        self.render_with(partition, &Interrupt::new())
    }

    /// Renders the image, one thread per tile of `partition`.  Raising
    /// `interrupt` while the render runs abandons it.  Returns only once
    /// every worker has signalled.  Any worker failure fails the whole
    /// request; the error of the lowest-numbered failing tile is the one
    /// reported.
    pub fn render_with(
        &self,
        partition: &Partition,
        interrupt: &Interrupt,
    ) -> Result<PixelBuffer, RenderError> {
        let started = Instant::now();
        let mut buffer = PixelBuffer::new(self.plane.width(), self.plane.height())?;
        info!(
            "Rendering {}x{} with {} tiles, {} iterations",
            self.plane.width(),
            self.plane.height(),
            partition.len(),
            self.limit
        );

        {
            let views = buffer.tiles_mut(partition)?;
            let (tracker, tokens) = CompletionTracker::new(views.len());
            let plane = &self.plane;
            let limit = self.limit;

            let outcomes = crossbeam::scope(|spawner| {
                // A worker that never got a thread drops its token along
                // with the rejected closure, so the wait below still ends.
                let handles: Vec<_> = views
                    .into_iter()
                    .zip(tokens)
                    .enumerate()
                    .map(|(index, (view, token))| {
                        let worker = Worker::new(index, view, plane, limit, interrupt.clone());
                        spawner
                            .builder()
                            .name(format!("tile-{}", index))
                            .spawn(move |_| worker.run(token))
                            .map_err(|e| RenderError::SpawnFailed {
                                tile: index,
                                reason: e.to_string(),
                            })
                    })
                    .collect();

                tracker.wait();
                debug!("All workers have signalled");

                handles
                    .into_iter()
                    .enumerate()
                    .map(|(index, handle)| settle(index, handle.map(|h| h.join())))
                    .collect::<Vec<_>>()
            })
            .map_err(|_| RenderError::ScopePanicked)?;

            for outcome in outcomes {
                outcome?;
            }
        }

        info!("Render finished in {:?}", started.elapsed());
        Ok(buffer)
    }
}

/// Turns what became of one worker into that worker's verdict.
fn settle(
    index: usize,
    joined: Result<thread::Result<Result<(), RenderError>>, RenderError>,
) -> Result<(), RenderError> {
    match joined {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(RenderError::WorkerPanicked { tile: index }),
        Err(spawn_failure) => Err(spawn_failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::evaluate;
    use planes::Pixel;

    fn config(width: usize, height: usize, limit: usize) -> RenderConfig {
        RenderConfig {
            width,
            height,
            max_iterations: limit,
            tiles_x: 3,
            tiles_y: 2,
        }
    }

    #[test]
    fn every_pixel_matches_the_evaluator() {
        let c = config(60, 35, 80);
        let coordinator = Coordinator::new(&c).unwrap();
        let buffer = coordinator.render(&c.partition().unwrap()).unwrap();
        for x in 0..60 {
            for y in 0..35 {
                let point = coordinator.plane().pixel_to_point(&Pixel(x, y));
                let expected = evaluate(point, 80).unwrap().color_index;
                assert_eq!(buffer.get(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn bad_config_is_refused() {
        assert_eq!(
            Coordinator::new(&config(60, 35, 0)).err(),
            Some(RenderError::InvalidIterationBudget)
        );
    }

    #[test]
    fn mismatched_partition_fails_before_spawning() {
        let coordinator = Coordinator::new(&config(60, 35, 80)).unwrap();
        let partition = Partition::single(35, 60).unwrap();
        match coordinator.render(&partition) {
            Err(RenderError::InvalidPartition { .. }) => (),
            other => panic!("unexpected {:?}", other.map(|b| b.width())),
        }
    }

    #[test]
    fn raised_interrupt_fails_only_its_own_render() {
        let c = config(40, 20, 50);
        let coordinator = Coordinator::new(&c).unwrap();
        let partition = c.partition().unwrap();
        let interrupt = Interrupt::new();
        interrupt.raise();
        match coordinator.render_with(&partition, &interrupt) {
            Err(RenderError::InterruptedExecution { tile }) => assert_eq!(tile, 0),
            other => panic!("unexpected {:?}", other.map(|b| b.width())),
        }

        // The flag is still up, but the next request has its own.
        assert!(interrupt.is_raised());
        assert!(coordinator.render(&partition).is_ok());
    }

    #[test]
    fn late_interrupt_does_not_touch_the_next_request() {
        let c = config(40, 20, 50);
        let coordinator = Coordinator::new(&c).unwrap();
        let partition = c.partition().unwrap();
        let interrupt = Interrupt::new();
        let first = coordinator.render_with(&partition, &interrupt).unwrap();
        interrupt.raise();
        assert_eq!(coordinator.render(&partition).unwrap(), first);
    }

    #[test]
    fn panicking_worker_thread_is_reported_by_tile() {
        let (tracker, mut tokens) = CompletionTracker::new(1);
        let token = tokens.pop().unwrap();
        let verdict = crossbeam::scope(|spawner| {
            let handle = spawner.spawn(move |_| -> Result<(), RenderError> {
                let _token = token;
                panic!("tile blew up");
            });
            tracker.wait();
            settle(3, Ok(handle.join()))
        })
        .unwrap();
        assert_eq!(verdict, Err(RenderError::WorkerPanicked { tile: 3 }));
    }

    #[test]
    fn spawn_failures_pass_through_settle() {
        let failure = RenderError::SpawnFailed {
            tile: 2,
            reason: "no threads left".to_string(),
        };
        assert_eq!(settle(2, Err(failure.clone())), Err(failure));
        assert_eq!(settle(0, Ok(Ok(Ok(())))), Ok(()));
    }
}
