//! # Frentes - activity extraction and procedure block partitioning
//!
//! Frentes turns a project-schedule report exported from the planning tool
//! into per-procedure activity tables for the dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  report.csv │────▶│   Extract   │────▶│   Cleanup   │────▶│  Partition  │
//! │ (; any enc) │     │ (lvl 3 + 4) │     │   (regex)   │     │ (3 blocks)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frentes::{run_all, PipelineConfig};
//!
//! let report = run_all(&PipelineConfig::from_env()).unwrap();
//! println!("Extracted {} activities", report.extract.activities);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Activity, FlattenedRow, Segment) and progress metrics
//! - [`parser`] - Report and table reading with encoding detection
//! - [`transform`] - Extraction, cleanup, partitioning, stats and pipeline stages
//! - [`output`] - CSV and JSON writers
//! - [`config`] - Stage paths from defaults, environment and flags
//! - [`logs`] - Status logging on top of `tracing`

// Core modules
pub mod error;
pub mod models;

// Reading and writing
pub mod output;
pub mod parser;

// Transformation
pub mod transform;

// Configuration and logging
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExtractError, PartitionError, PipelineError, PipelineResult, ReadError, WriteError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    parse_percentage, progress, Activity, ActivityExport, Block, FlattenedRow, ProgressColor,
    ProgressSummary, RawRow, Segment, Status, SubActivity, SubActivityExport, Table,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_content, detect_encoding, read_report, read_table, Report};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    clean_line, clean_text, extract, partition, partition_table, BlockStats, Partition,
    SegmentStats,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    run_all, run_cleanup, run_extract, run_partition, run_stats, ExtractReport, PartitionReport,
    PipelineReport,
};

pub use config::{BlockOutputs, ExtractConfig, PartitionConfig, PipelineConfig, StageConfig};
