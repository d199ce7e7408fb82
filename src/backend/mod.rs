//! Compute backend seam.
//!
//! A backend owns the device-facing half of one dispatch: shared buffers,
//! the kernel launch across the candidate grid, and the single blocking
//! wait for batch completion. Everything a backend allocates for a dispatch
//! is owned for the duration of that call and released on every exit path.
//!
//! The CPU backend is the always-available reference implementation; the
//! Metal backend (feature `metal`, macOS) is a swappable hardware path
//! behind the same trait and must produce the same match set.

pub mod cpu;
#[cfg(all(feature = "metal", target_os = "macos"))]
pub mod metal;

pub use cpu::CpuBackend;

use crate::error::Result;
use crate::search::types::MatchBatch;

/// A parallel comparison device.
pub trait ComputeBackend: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Launch one comparison task per candidate offset (or a coarser
    /// fixed-stride partition over them) and block until every task has
    /// completed, then read back the retained offsets and the logical
    /// match count.
    ///
    /// Contract: the orchestrator guarantees `0 < pattern.len() <=
    /// haystack.len() <= u32::MAX`; the candidate set is
    /// `[0, haystack.len() - pattern.len()]`. At most `capacity` offsets
    /// are retained; the count keeps running past it.
    fn dispatch(&self, haystack: &[u8], pattern: &[u8], capacity: usize) -> Result<MatchBatch>;
}

/// Backend for this build: Metal when the feature and target allow it,
/// the CPU reference implementation otherwise.
///
/// Backend construction failures (no device, kernel build, pipeline
/// creation) are immediately fatal to the caller; there is no fallback
/// from a broken Metal setup to CPU.
pub fn default_backend() -> Result<Box<dyn ComputeBackend>> {
    #[cfg(all(feature = "metal", target_os = "macos"))]
    {
        Ok(Box::new(metal::MetalBackend::new()?))
    }
    #[cfg(not(all(feature = "metal", target_os = "macos")))]
    {
        Ok(Box::new(cpu::CpuBackend::new()))
    }
}
