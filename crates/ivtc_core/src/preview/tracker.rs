//! Generation-counted request tracking.
//!
//! Every batch of requests gets a new generation. A result is accepted only
//! if it carries the current generation and is still pending; anything else
//! belongs to a batch the caller no longer cares about.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifies one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub frame: usize,
}

#[derive(Debug, Default)]
pub struct FrameRequestTracker {
    generation: AtomicU64,
    pending: Mutex<BTreeSet<usize>>,
}

impl FrameRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new batch; everything outstanding becomes stale.
    pub fn begin_batch(&self) -> u64 {
        let mut pending = self.pending.lock();
        pending.clear();
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Register a request in the current batch.
    pub fn register(&self, frame: usize) -> RequestTicket {
        let mut pending = self.pending.lock();
        pending.insert(frame);
        RequestTicket {
            generation: self.generation(),
            frame,
        }
    }

    /// Claim a completed request. Returns false for stale or duplicate
    /// results.
    pub fn accept(&self, ticket: RequestTicket) -> bool {
        let mut pending = self.pending.lock();
        if ticket.generation != self.generation() {
            tracing::trace!(
                "Dropping stale frame {} (generation {})",
                ticket.frame,
                ticket.generation
            );
            return false;
        }
        pending.remove(&ticket.frame)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_pending(&self, frame: usize) -> bool {
        self.pending.lock().contains(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_batch_makes_old_tickets_stale() {
        let tracker = FrameRequestTracker::new();
        tracker.begin_batch();
        let old = tracker.register(10);
        tracker.begin_batch();
        let new = tracker.register(11);

        assert!(!tracker.accept(old));
        assert!(tracker.accept(new));
        assert!(!tracker.accept(new));
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn tracker_is_shared_across_threads() {
        let tracker = std::sync::Arc::new(FrameRequestTracker::new());
        tracker.begin_batch();
        let tickets: Vec<_> = (0..8).map(|frame| tracker.register(frame)).collect();

        let handles: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let tracker = tracker.clone();
                std::thread::spawn(move || tracker.accept(ticket))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(tracker.pending_count(), 0);
    }
}
