//! Error types for the report pipeline.
//!
//! One enum per concern, plus a top-level [`PipelineError`]:
//!
//! - [`ReadError`] - opening, decoding and parsing input tables
//! - [`ExtractError`] - activity extraction from report rows
//! - [`PartitionError`] - splitting the flattened table into blocks
//! - [`WriteError`] - writing derived tables and exports
//! - [`PipelineError`] - stage orchestration
//!
//! Conversion into [`PipelineError`] is automatic via `From`,
//! so `?` works across stage boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Read Errors
// =============================================================================

/// Errors while reading an input table.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to read the file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("Invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No header row.
    #[error("No headers found in {}", .0.display())]
    NoHeaders(PathBuf),
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors during activity extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A mandatory column is absent from a row.
    #[error("Line {line}: missing field '{column}'")]
    MissingField { column: String, line: usize },
}

// =============================================================================
// Partition Errors
// =============================================================================

/// Errors while splitting rows into blocks.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// Nothing to partition.
    #[error("No rows to partition")]
    EmptyInput,

    /// A row has no value for the block-name column.
    #[error("Line {line}: missing column '{column}'")]
    MissingColumn { column: String, line: usize },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing an output file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create or write the file.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("Failed to write CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level stage errors.
///
/// Returned by every `run_*` function in [`crate::transform::pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Extraction failed.
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Partitioning failed.
    #[error("Partition failed: {0}")]
    Partition(#[from] PartitionError),

    /// Output could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reading tables.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for partitioning.
pub type PartitionResult<T> = Result<T, PartitionError>;

/// Result type for writing outputs.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline stages.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let err = PartitionError::EmptyInput;
        let pipeline_err: PipelineError = err.into();
        assert!(pipeline_err.to_string().contains("No rows"));

        let err = ExtractError::MissingField {
            column: "Nome".into(),
            line: 7,
        };
        let pipeline_err: PipelineError = err.into();
        let msg = pipeline_err.to_string();
        assert!(msg.contains("Nome"));
        assert!(msg.contains("Line 7"));
    }

    #[test]
    fn test_file_not_found_names_path() {
        let err: PipelineError = ReadError::FileNotFound(PathBuf::from("data/report.csv")).into();
        assert_eq!(err.to_string(), "Input file not found: data/report.csv");
    }

    #[test]
    fn test_missing_column_format() {
        let err = PartitionError::MissingColumn {
            column: "name".into(),
            line: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 4"));
        assert!(msg.contains("'name'"));
    }
}
