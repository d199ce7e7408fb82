// Search API types shared by the backends, orchestrator, and reporter

use std::time::Duration;

/// Default retained-match capacity C.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Options controlling one search invocation.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Fixed capacity C of the retained-offsets buffer. The logical match
    /// count may exceed it; the excess is counted but not retained. No
    /// dynamic resize.
    pub capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SearchOptions {
    /// Options with an explicit retained-match capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}

/// Raw result of one backend dispatch, read back after the completion
/// barrier.
#[derive(Debug, Clone)]
pub struct MatchBatch {
    /// Retained match offsets, at most C of them, in slot (discovery)
    /// order -- NOT offset order.
    pub offsets: Vec<u32>,
    /// Logical match count; may exceed the number of retained offsets.
    pub total: u32,
}

/// Harvested result of one search: retained offsets sorted ascending, plus
/// overflow accounting.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Retained match offsets, sorted ascending.
    pub offsets: Vec<u32>,
    /// True logical match count.
    pub total: u32,
    /// Whether matches were dropped because the count exceeded capacity.
    pub truncated: bool,
    /// Wall-clock time for the search call.
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// Outcome with no matches (degenerate inputs skip dispatch entirely).
    pub fn empty(elapsed: Duration) -> Self {
        Self {
            offsets: Vec::new(),
            total: 0,
            truncated: false,
            elapsed,
        }
    }

    /// Number of retained matches.
    pub fn retained(&self) -> usize {
        self.offsets.len()
    }
}

/// A retained match resolved against the line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Byte offset of the match start in the haystack.
    pub offset: u32,
    /// 1-based number of the line containing the match start.
    pub line_number: usize,
    /// Line text, trailing newline excluded (lossy UTF-8).
    pub line: String,
}
