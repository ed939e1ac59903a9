//! The pruning register shared by every search task of one run.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Monotonic "best clique size seen so far" shared across workers.
///
/// Reads are relaxed: a stale value is never larger than the true maximum, so
/// it can only delay pruning, never cut a branch that could still win. Writes
/// go through [`GlobalBound::offer`], an atomic max.
#[derive(Debug, Default)]
pub struct GlobalBound {
    best: CachePadded<AtomicUsize>,
}

impl GlobalBound {
    /// Creates a register starting at `initial`.
    pub fn new(initial: usize) -> Self {
        Self {
            best: CachePadded::new(AtomicUsize::new(initial)),
        }
    }

    /// Current bound.
    #[inline(always)]
    pub fn read(&self) -> usize {
        self.best.load(Ordering::Relaxed)
    }

    /// Raises the bound to `size` if it is larger. Returns the previous value.
    #[inline]
    pub fn offer(&self, size: usize) -> usize {
        self.best.fetch_max(size, Ordering::Relaxed)
    }
}
