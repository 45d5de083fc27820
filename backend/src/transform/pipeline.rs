//! Pipeline stages over files.
//!
//! Each stage reads its input, runs the in-memory transform and writes its
//! outputs, returning a summary of what it did:
//!
//! ```text
//! report.csv ─▶ extract ─▶ flattened.csv ─▶ cleanup ─▶ cleaned.csv ─▶ partition ─┬▶ stop procedure
//!  (; any enc)     │                                                              ├▶ maintenance
//!                  └▶ activities.json (optional)                                  └▶ start procedure
//! ```
//!
//! Stages are independent: any of them can run alone as long as its input
//! exists.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{ExtractConfig, PartitionConfig, PipelineConfig, StageConfig};
use crate::error::{PartitionError, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{ActivityExport, FlattenedRow, Segment, NAME_COLUMN};
use crate::output::{write_flattened, write_json, write_table};
use crate::parser::{read_report, read_table};

use super::cleanup::{clean_file, CleanupReport};
use super::extract::extract;
use super::partition::{partition, partition_table};
use super::stats::BlockStats;

/// Result of the extraction stage
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub encoding: String,
    pub rows_read: usize,
    pub activities: usize,
    pub sub_activities: usize,
    pub output_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

/// One written segment file
#[derive(Debug, Clone, Serialize)]
pub struct BlockOutput {
    pub segment: Segment,
    pub rows: usize,
    pub path: PathBuf,
}

/// Result of the partition stage
#[derive(Debug, Clone, Serialize)]
pub struct PartitionReport {
    pub rows_read: usize,
    pub blocks: Vec<BlockOutput>,
    pub discarded: usize,
}

/// Result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub extract: ExtractReport,
    pub cleanup: CleanupReport,
    pub partition: PartitionReport,
}

/// Read the source report, group its activities and write the flattened table.
pub fn run_extract(config: &ExtractConfig) -> PipelineResult<ExtractReport> {
    log_info(format!("📖 Reading report {}", config.input_path.display()));
    let report = read_report(&config.input_path)?;
    log_success(format!("Detected encoding: {}", report.encoding));
    log_success(format!("Read {} rows", report.rows.len()));

    let activities = extract(&report.rows)?;
    let sub_activities: usize = activities.iter().map(|a| a.sub_activities.len()).sum();
    log_success(format!(
        "Extracted {} activities ({} sub-activities)",
        activities.len(),
        sub_activities
    ));
    if activities.is_empty() {
        log_warning("No activity has dashboard sub-activities; output is header only");
    }

    let rows: Vec<FlattenedRow> = activities.iter().map(FlattenedRow::from).collect();
    write_flattened(&config.output_path, &rows)?;
    log_success(format!("Wrote {}", config.output_path.display()));

    if let Some(json_path) = &config.json_path {
        let export: Vec<ActivityExport> = activities.iter().map(ActivityExport::from).collect();
        write_json(json_path, &export)?;
        log_success(format!("Wrote {}", json_path.display()));
    }

    Ok(ExtractReport {
        encoding: report.encoding,
        rows_read: report.rows.len(),
        activities: activities.len(),
        sub_activities,
        output_path: config.output_path.clone(),
        json_path: config.json_path.clone(),
    })
}

/// Clean the flattened table.
pub fn run_cleanup(config: &StageConfig) -> PipelineResult<CleanupReport> {
    log_info(format!("🧹 Cleaning {}", config.input_path.display()));
    clean_file(&config.input_path, &config.output_path)
}

/// Split the cleaned table into its three segment files.
///
/// Every segment file is written, header only when its block is empty.
/// An empty table is an error and nothing is written.
pub fn run_partition(config: &PartitionConfig) -> PipelineResult<PartitionReport> {
    log_info(format!("✂️  Partitioning {}", config.input_path.display()));
    let table = read_table(&config.input_path)?;
    let partition = partition_table(&table)?;

    let mut blocks = Vec::with_capacity(Segment::ALL.len());
    for block in partition.blocks() {
        let path = config.outputs.path_for(block.segment);
        write_table(path, &table.headers, block.rows)?;
        log_info_indent(format!("{}: {} rows → {}", block.segment, block.len(), path.display()), 1);
        blocks.push(BlockOutput {
            segment: block.segment,
            rows: block.len(),
            path: path.to_path_buf(),
        });
    }

    if !partition.discarded.is_empty() {
        log_warning(format!(
            "{} rows above the third sentinel were left out",
            partition.discarded.len()
        ));
    }
    log_success(format!("Partitioned {} rows", partition.consumed()));

    Ok(PartitionReport {
        rows_read: table.len(),
        blocks,
        discarded: partition.discarded.len(),
    })
}

/// Run extract, cleanup and partition in order.
pub fn run_all(config: &PipelineConfig) -> PipelineResult<PipelineReport> {
    let extract = stage("extract", run_extract(&config.extract))?;
    let cleanup = stage("cleanup", run_cleanup(&config.cleanup))?;
    let partition = stage("partition", run_partition(&config.partition))?;
    log_success("✨ Done!");
    Ok(PipelineReport {
        extract,
        cleanup,
        partition,
    })
}

fn stage<T>(name: &str, result: PipelineResult<T>) -> PipelineResult<T> {
    result.map_err(|e| {
        log_error(format!("Stage '{}' failed, later stages skipped", name));
        e
    })
}

/// Partition a flattened table in memory and summarize its blocks.
pub fn run_stats(input: &Path) -> PipelineResult<BlockStats> {
    let table = read_table(input)?;
    if table.is_empty() {
        return Err(PartitionError::EmptyInput.into());
    }
    if table.column_index(NAME_COLUMN).is_none() {
        return Err(PartitionError::MissingColumn {
            column: NAME_COLUMN.to_string(),
            line: 1,
        }
        .into());
    }
    let rows = table.to_flattened();
    let partition = partition(&rows)?;
    Ok(BlockStats::from_partition(&partition))
}
