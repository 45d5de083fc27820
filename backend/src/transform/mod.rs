//! Transformation module.
//!
//! - Extract: report rows to activities
//! - Cleanup: text fixes on the flattened table
//! - Partition: flattened table to procedure blocks
//! - Stats: per-block summary figures
//! - Pipeline: file-level stages chaining the above

pub mod cleanup;
pub mod extract;
pub mod partition;
pub mod pipeline;
pub mod stats;

pub use cleanup::{clean_file, clean_line, clean_text, CleanupReport};
pub use extract::extract;
pub use partition::{partition, partition_by, partition_table, NamedRow, Partition};
pub use pipeline::*;
pub use stats::{BlockStats, SegmentStats};
