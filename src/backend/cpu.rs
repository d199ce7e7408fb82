//! Reference CPU backend: a thread-pool scan over the candidate range.
//!
//! Partitions the candidates into one contiguous span per worker and runs
//! the match kernel at every offset. The scope join is the batch-completion
//! barrier; the harvested counter and slots are not read before it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use crate::error::Result;
use crate::search::kernel;
use crate::search::slots::SlotAllocator;
use crate::search::types::MatchBatch;

use super::ComputeBackend;

/// CPU thread-pool comparison backend.
pub struct CpuBackend {
    workers: usize,
}

impl CpuBackend {
    /// Backend sized to the machine's available parallelism.
    pub fn new() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { workers }
    }

    /// Backend with an explicit worker count (tests pin this to get
    /// deterministic partitioning).
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn dispatch(&self, haystack: &[u8], pattern: &[u8], capacity: usize) -> Result<MatchBatch> {
        let candidates = haystack.len() - pattern.len() + 1;

        let slots = SlotAllocator::new(capacity);
        let retained: Vec<AtomicU32> = (0..capacity).map(|_| AtomicU32::new(0)).collect();

        // One contiguous span per worker; never more workers than candidates.
        let workers = self.workers.min(candidates);
        let span = candidates.div_ceil(workers);

        thread::scope(|s| {
            for w in 0..workers {
                let start = w * span;
                let end = (start + span).min(candidates);
                let slots = &slots;
                let retained = retained.as_slice();
                s.spawn(move || {
                    for offset in start..end {
                        kernel::execute(haystack, pattern, offset as u32, slots, retained);
                    }
                });
            }
            // Scope exit joins every worker: the completion barrier.
        });

        let total = slots.total();
        let kept = (total as usize).min(capacity);
        let offsets = retained[..kept]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect();

        Ok(MatchBatch { offsets, total })
    }
}

// ============================================================================
// Tests
// ============================================================================
