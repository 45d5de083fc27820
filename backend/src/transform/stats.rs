//! Summary figures for partitioned activity blocks.

use serde::Serialize;

use crate::models::{progress, FlattenedRow, ProgressColor, Segment, Status};

use super::partition::Partition;

/// Figures for one procedure segment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStats {
    pub segment: Segment,
    pub label: &'static str,
    pub activities: usize,
    pub sub_activities: usize,
    /// Rounded mean of per-activity progress
    pub avg_progress: u32,
    pub status: Status,
    pub progress_color: ProgressColor,
}

/// Figures for all three segments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    pub total_activities: usize,
    pub total_sub_activities: usize,
    pub avg_progress: u32,
    pub status: Status,
    pub progress_color: ProgressColor,
    pub discarded: usize,
    pub segments: Vec<SegmentStats>,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

fn mean_progress<'a>(rows: impl IntoIterator<Item = &'a FlattenedRow>) -> u32 {
    let (sum, count) = rows
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), row| {
            (sum + u64::from(progress(&row.value, &row.baseline)), count + 1)
        });
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u32
    }
}

impl SegmentStats {
    fn from_rows(segment: Segment, rows: &[FlattenedRow]) -> Self {
        let avg_progress = mean_progress(rows);
        Self {
            segment,
            label: segment.label(),
            activities: rows.len(),
            sub_activities: rows.iter().map(FlattenedRow::sub_activity_count).sum(),
            avg_progress,
            status: Status::classify(avg_progress),
            progress_color: ProgressColor::classify(avg_progress),
        }
    }
}

impl BlockStats {
    pub fn from_partition(partition: &Partition<'_, FlattenedRow>) -> Self {
        let segments: Vec<SegmentStats> = partition
            .blocks()
            .iter()
            .map(|block| SegmentStats::from_rows(block.segment, block.rows))
            .collect();

        let avg_progress = mean_progress(partition.blocks().iter().flat_map(|b| b.rows.iter()));

        Self {
            total_activities: segments.iter().map(|s| s.activities).sum(),
            total_sub_activities: segments.iter().map(|s| s.sub_activities).sum(),
            avg_progress,
            status: Status::classify(avg_progress),
            progress_color: ProgressColor::classify(avg_progress),
            discarded: partition.discarded.len(),
            segments,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn segment(&self, segment: Segment) -> Option<&SegmentStats> {
        self.segments.iter().find(|s| s.segment == segment)
    }
}
