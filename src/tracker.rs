// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Synchronization between the coordinator and its workers: a
//! countdown the coordinator blocks on, and a flag it can raise to ask
//! workers to stop early.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam::sync::WaitGroup;

/// The waiting half of a countdown.  Built together with one token per
/// worker; `wait` returns once every token has been dropped.
pub struct CompletionTracker {
    group: WaitGroup,
    pending: Arc<AtomicUsize>,
}

/// The signalling half of a countdown.  Dropping it is the signal, so
/// it fires exactly once however the holder finishes: by returning, by
/// bailing out with an error, or by unwinding.
pub struct CompletionToken {
    group: Option<WaitGroup>,
    pending: Arc<AtomicUsize>,
}

impl CompletionTracker {
    /// A tracker expecting `workers` signals, and the tokens that will
    /// give them.
    pub fn new(workers: usize) -> (CompletionTracker, Vec<CompletionToken>) {
        let group = WaitGroup::new();
        let pending = Arc::new(AtomicUsize::new(workers));
        let tokens = (0..workers)
            .map(|_| CompletionToken {
                group: Some(group.clone()),
                pending: pending.clone(),
            })
            .collect();
        (CompletionTracker { group, pending }, tokens)
    }

    /// Number of tokens that have not yet signalled.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Blocks until every token has signalled.  Consumes the tracker, so
    /// it can only return once.
    pub fn wait(self) {
        self.group.wait();
    }
}

impl CompletionToken {
    /// Signals explicitly.  Equivalent to letting the token drop.
    pub fn signal(self) {}
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        // Count down before releasing the group, so a returned `wait`
        // never sees a stale count.
        self.pending.fetch_sub(1, Ordering::SeqCst);
        drop(self.group.take());
    }
}

/// A request, shared between a host and its workers, to abandon the
/// current render.  Workers look at it between columns.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// A flag that has not been raised.
    pub fn new() -> Interrupt {
        Interrupt::default()
    }

    /// Asks every worker sharing this flag to stop.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Lowers the flag again, ready for the next render.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// True once `raise` has been called (and not cleared).
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn no_workers_means_no_waiting() {
        let (tracker, tokens) = CompletionTracker::new(0);
        assert!(tokens.is_empty());
        assert_eq!(tracker.pending(), 0);
        tracker.wait();
    }

    #[test]
    fn explicit_and_implicit_signals_count_the_same() {
        let (tracker, mut tokens) = CompletionTracker::new(3);
        tokens.pop().unwrap().signal();
        assert_eq!(tracker.pending(), 2);
        drop(tokens);
        assert_eq!(tracker.pending(), 0);
        tracker.wait();
    }

    #[test]
    fn wait_does_not_return_before_the_last_signal() {
        let (tracker, mut tokens) = CompletionTracker::new(4);
        let last = tokens.pop().unwrap();
        let handles: Vec<_> = tokens
            .into_iter()
            .map(|token| thread::spawn(move || token.signal()))
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let (tx, rx) = mpsc::channel();
        let waiter = thread::spawn(move || {
            tracker.wait();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(last);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn panicking_holder_still_signals() {
        let (tracker, mut tokens) = CompletionTracker::new(1);
        let token = tokens.pop().unwrap();
        let result = thread::spawn(move || {
            let _token = token;
            panic!("worker blew up");
        })
        .join();
        assert!(result.is_err());
        assert_eq!(tracker.pending(), 0);
        tracker.wait();
    }

    #[test]
    fn interrupt_is_shared_between_clones() {
        let flag = Interrupt::new();
        let seen = flag.clone();
        assert!(!seen.is_raised());
        flag.raise();
        assert!(seen.is_raised());
        seen.clear();
        assert!(!flag.is_raised());
    }
}
