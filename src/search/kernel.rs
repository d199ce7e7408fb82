//! Per-offset match kernel: the comparison task dispatched once per
//! candidate start offset.
//!
//! This is the statically compiled twin of the Metal kernel in
//! `backend/metal.rs`; both compare right-to-left and must report the same
//! offsets.

use std::sync::atomic::{AtomicU32, Ordering};

use super::slots::SlotAllocator;

/// Compare `pattern` against `haystack[offset .. offset + pattern.len()]`,
/// right to left.
///
/// Caller guarantees the window is in bounds.
#[inline]
pub fn pattern_matches_at(haystack: &[u8], pattern: &[u8], offset: usize) -> bool {
    let window = &haystack[offset..offset + pattern.len()];
    for j in (0..pattern.len()).rev() {
        if window[j] != pattern[j] {
            return false;
        }
    }
    true
}

/// One kernel invocation: compare at `offset`, and on a match count it and
/// write the offset into the reserved retention slot (if any).
///
/// Slots are write-once: no two invocations receive the same pre-increment
/// value, so the Relaxed store is race-free; the dispatch barrier publishes
/// it to the host.
#[inline]
pub fn execute(
    haystack: &[u8],
    pattern: &[u8],
    offset: u32,
    slots: &SlotAllocator,
    retained: &[AtomicU32],
) {
    if !pattern_matches_at(haystack, pattern, offset as usize) {
        return;
    }
    if let Some(slot) = slots.try_reserve() {
        retained[slot].store(offset, Ordering::Relaxed);
    }
}
