//! gpu-grep -- literal substring search with the comparison phase offloaded
//! to a parallel compute backend, and matched byte offsets mapped back to
//! source lines for grep-style reporting.
//!
//! Pipeline: haystack + pattern -> dispatch orchestrator launches one match
//! kernel per candidate offset -> matching tasks reserve slots in a bounded
//! result buffer through an atomic counter -> harvester reads the final
//! count and retained offsets -> line mapper resolves each offset against
//! the line index -> reporter emits `source:line:\ttext` records.

pub mod backend;
pub mod error;
pub mod report;
pub mod search;
