// Search pipeline module

pub mod dispatch;
pub mod kernel;
pub mod line_index;
pub mod slots;
pub mod types;

pub use dispatch::{resolve_records, Searcher};
pub use line_index::LineIndex;
pub use slots::SlotAllocator;
pub use types::*;
