//! Dispatch orchestrator: candidate-set computation, backend dispatch,
//! result harvesting, and offset-to-line resolution.
//!
//! The orchestrator owns one search call end to end: it rejects degenerate
//! inputs without touching the backend, issues exactly one batch, blocks on
//! the single completion barrier inside the backend, then freezes and
//! drains the result channel exactly once.

use std::time::Instant;

use crate::backend::ComputeBackend;
use crate::error::{GrepError, Result};

use super::line_index::LineIndex;
use super::types::{MatchRecord, SearchOptions, SearchOutcome};

/// Runs searches against a compute backend.
pub struct Searcher {
    backend: Box<dyn ComputeBackend>,
}

impl Searcher {
    /// Create a searcher over an explicit backend.
    pub fn new(backend: Box<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    /// Create a searcher over the default backend for this build
    /// (Metal when the `metal` feature is enabled on macOS, CPU otherwise).
    pub fn with_default_backend() -> Result<Self> {
        Ok(Self::new(crate::backend::default_backend()?))
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Search `haystack` for every occurrence of `pattern`.
    ///
    /// Candidate offsets are [0, N-M]; when M = 0, N = 0, or M > N there
    /// are none and the backend is never invoked. Otherwise one comparison
    /// task runs per candidate and the call blocks until the whole batch
    /// has completed -- no partial results.
    ///
    /// Retained offsets are sorted ascending before being returned; the
    /// slot-fill order produced by concurrent writers is an artifact, not a
    /// guarantee worth exposing.
    pub fn search(
        &self,
        haystack: &[u8],
        pattern: &[u8],
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        let started = Instant::now();

        if haystack.len() > u32::MAX as usize {
            return Err(GrepError::InputTooLarge {
                len: haystack.len(),
            });
        }

        // Empty pattern means "no possible match"; a pattern longer than
        // the haystack has an empty candidate set.
        if pattern.is_empty() || pattern.len() > haystack.len() {
            return Ok(SearchOutcome::empty(started.elapsed()));
        }

        let batch = self
            .backend
            .dispatch(haystack, pattern, options.capacity)?;

        // Harvest: freeze the channel, detect overflow, order the retained set.
        debug_assert!(
            batch.offsets.len() <= options.capacity,
            "backend retained {} offsets, capacity is {}",
            batch.offsets.len(),
            options.capacity
        );
        let truncated = batch.total as usize > options.capacity;
        let mut offsets = batch.offsets;
        offsets.sort_unstable();

        Ok(SearchOutcome {
            offsets,
            total: batch.total,
            truncated,
            elapsed: started.elapsed(),
        })
    }
}

/// Resolve retained offsets into line-addressed records.
///
/// Input offsets are already sorted, so records come out in file order.
pub fn resolve_records(
    haystack: &[u8],
    index: &LineIndex,
    offsets: &[u32],
) -> Vec<MatchRecord> {
    offsets
        .iter()
        .map(|&offset| {
            let span = index.locate(offset);
            MatchRecord {
                offset,
                line_number: span.line_number,
                line: String::from_utf8_lossy(&haystack[span.start..span.end]).into_owned(),
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
