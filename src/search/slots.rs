//! Bounded atomic slot reservation for concurrent match writers.
//!
//! The retained-results buffer has a fixed capacity C, but the number of
//! matches is unbounded. Every successful match performs exactly one
//! fetch-and-increment here; the unique pre-increment value is the writer's
//! slot index while it is below C, and a pure count above it. Overflow is
//! detected, never prevented.
//!
//! This type is the only contended state in the whole pipeline. The
//! fetch-add uses Relaxed ordering, matching the device-side
//! `atomic_fetch_add_explicit(.., memory_order_relaxed)`; the dispatch
//! barrier (thread join / `waitUntilCompleted`) is what makes the slot
//! writes visible to the host.

use std::sync::atomic::{AtomicU32, Ordering};

/// Bounded slot allocator over an atomic counter.
///
/// The counter width is u32 to match the device-side atomic; candidate
/// counts are bounded to u32 offsets upstream, so the counter cannot wrap.
pub struct SlotAllocator {
    next: AtomicU32,
    capacity: u32,
}

impl SlotAllocator {
    /// Create an allocator with `capacity` retained slots.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity <= u32::MAX as usize, "capacity must fit in u32");
        Self {
            next: AtomicU32::new(0),
            capacity: capacity as u32,
        }
    }

    /// Number of retained slots.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Count one match and reserve its retention slot.
    ///
    /// Returns `Some(slot)` with a unique index below capacity, or `None`
    /// when the retained set is full. The match is counted either way.
    #[inline]
    pub fn try_reserve(&self) -> Option<usize> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        if idx < self.capacity {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Logical match count: every reservation attempt, retained or not.
    ///
    /// Only meaningful after all writers have completed (the dispatch
    /// barrier); reading it mid-batch gives a snapshot.
    pub fn total(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Tests
// ============================================================================
