//! Domain models for report rows, activities and procedure blocks.
//!
//! # Report hierarchy
//!
//! ```text
//! Report rows (level column)          Flattened table
//! ┌──────────────────────────────┐   ┌────────────────────────────────────┐
//! │ 3  Forno          40  50     │   │ name   value baseline sub_activities│
//! │ 4  Refratário  S  30  45     │ → │ Forno  40    50       Refratário:30|45│
//! │ 4  Queimador   N  10  10     │   └────────────────────────────────────┘
//! └──────────────────────────────┘
//! ```
//!
//! Level-4 rows become sub-activities of the preceding level-3 row only when
//! their `Dashboard` flag is `S`.

pub mod progress;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ExtractError, ExtractResult};

pub use progress::{parse_percentage, progress, ProgressColor, ProgressSummary, Status};

// =============================================================================
// Report columns
// =============================================================================

/// Activity or sub-activity name.
pub const COL_NAME: &str = "Nome";
/// Outline level (`"3"` activity, `"4"` sub-activity).
pub const COL_LEVEL: &str = "Nível_da_estrutura_de_tópicos";
/// Actual progress percentage.
pub const COL_REAL: &str = "Porcentagem_Prev_Real";
/// Baseline (planned) progress percentage.
pub const COL_BASELINE: &str = "Porcentagem_Prev_LB";
/// Dashboard inclusion flag.
pub const COL_DASHBOARD: &str = "Dashboard";

pub const LEVEL_ACTIVITY: &str = "3";
pub const LEVEL_SUB_ACTIVITY: &str = "4";
pub const DASHBOARD_INCLUDE: &str = "S";

/// Header of the flattened activity table.
pub const FLAT_HEADERS: [&str; 4] = ["name", "value", "baseline", "sub_activities"];

/// Column of the flattened table holding the block name.
pub const NAME_COLUMN: &str = "name";

/// First activity of every procedure segment in the report.
pub const SENTINEL: &str = "Pátio de Alimentação";

/// Separator between encoded sub-activities in one field.
pub const SUB_ACTIVITY_SEPARATOR: &str = "; ";

/// Whether a block name marks a segment boundary.
pub fn is_sentinel(name: &str) -> bool {
    name.trim() == SENTINEL
}

// =============================================================================
// Raw report rows
// =============================================================================

/// One data row of the source report, keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: usize,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(line: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Optional lookup, `""` when the column is absent.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Mandatory lookup.
    pub fn require(&self, column: &str) -> ExtractResult<&str> {
        self.get(column).ok_or_else(|| ExtractError::MissingField {
            column: column.to_string(),
            line: self.line,
        })
    }
}

// =============================================================================
// Activities
// =============================================================================

/// A level-4 entry attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubActivity {
    pub name: String,
    pub real: String,
    pub baseline: String,
}

impl SubActivity {
    pub fn new(name: impl Into<String>, real: impl Into<String>, baseline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            real: real.into(),
            baseline: baseline.into(),
        }
    }

    /// `name:real|baseline`. Nothing is escaped.
    pub fn encode(&self) -> String {
        format!("{}:{}|{}", self.name, self.real, self.baseline)
    }

    /// Inverse of [`SubActivity::encode`], splitting at the last `|` and the
    /// last `:` before it.
    pub fn parse(encoded: &str) -> Option<Self> {
        let (head, baseline) = encoded.rsplit_once('|')?;
        let (name, real) = head.rsplit_once(':')?;
        Some(Self::new(name, real, baseline))
    }
}

impl fmt::Display for SubActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Join encoded sub-activities into one field.
pub fn join_sub_activities<S: AsRef<str>>(encoded: &[S]) -> String {
    let parts: Vec<&str> = encoded.iter().map(|s| s.as_ref()).collect();
    parts.join(SUB_ACTIVITY_SEPARATOR)
}

/// Split a joined field back into encoded sub-activities.
pub fn split_sub_activities(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field
        .split(SUB_ACTIVITY_SEPARATOR)
        .map(String::from)
        .collect()
}

/// A level-3 report entry with its dashboard sub-activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    /// Actual progress.
    pub value: String,
    /// Planned progress.
    pub baseline: String,
    pub sub_activities: Vec<SubActivity>,
}

impl Activity {
    pub fn new(name: impl Into<String>, value: impl Into<String>, baseline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            baseline: baseline.into(),
            sub_activities: Vec::new(),
        }
    }

    pub fn has_sub_activities(&self) -> bool {
        !self.sub_activities.is_empty()
    }

    /// Sub-activities in their joined on-disk form.
    pub fn encoded_sub_activities(&self) -> String {
        let encoded: Vec<String> = self.sub_activities.iter().map(SubActivity::encode).collect();
        join_sub_activities(&encoded)
    }
}

/// One row of the flattened activity table.
///
/// Field order matches [`FLAT_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRow {
    pub name: String,
    pub value: String,
    pub baseline: String,
    pub sub_activities: String,
}

impl FlattenedRow {
    /// Decode the joined sub-activity field; entries that do not parse are skipped.
    pub fn sub_activities(&self) -> Vec<SubActivity> {
        split_sub_activities(&self.sub_activities)
            .iter()
            .filter_map(|s| SubActivity::parse(s))
            .collect()
    }

    pub fn sub_activity_count(&self) -> usize {
        split_sub_activities(&self.sub_activities).len()
    }
}

impl From<&Activity> for FlattenedRow {
    fn from(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            value: activity.value.clone(),
            baseline: activity.baseline.clone(),
            sub_activities: activity.encoded_sub_activities(),
        }
    }
}

/// Sub-activity as written to the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubActivityExport {
    pub name: String,
    pub real: String,
    pub baseline: String,
    #[serde(flatten)]
    pub progress: ProgressSummary,
}

impl From<&SubActivity> for SubActivityExport {
    fn from(sub: &SubActivity) -> Self {
        Self {
            name: sub.name.clone(),
            real: sub.real.clone(),
            baseline: sub.baseline.clone(),
            progress: ProgressSummary::of(&sub.real, &sub.baseline),
        }
    }
}

/// Activity as written to the JSON export, with progress classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityExport {
    pub name: String,
    pub value: String,
    pub baseline: String,
    #[serde(flatten)]
    pub progress: ProgressSummary,
    pub sub_activities: Vec<SubActivityExport>,
}

impl From<&Activity> for ActivityExport {
    fn from(activity: &Activity) -> Self {
        Self {
            name: activity.name.clone(),
            value: activity.value.clone(),
            baseline: activity.baseline.clone(),
            progress: ProgressSummary::of(&activity.value, &activity.baseline),
            sub_activities: activity.sub_activities.iter().map(SubActivityExport::from).collect(),
        }
    }
}

// =============================================================================
// Tables and blocks
// =============================================================================

/// A header-aligned table read from CSV, values kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Interpret rows as flattened activities. Missing cells read as `""`.
    pub fn to_flattened(&self) -> Vec<FlattenedRow> {
        let idx: Vec<Option<usize>> = FLAT_HEADERS.iter().map(|h| self.column_index(h)).collect();
        let cell = |row: &Vec<String>, i: usize| -> String {
            idx[i]
                .and_then(|c| row.get(c))
                .cloned()
                .unwrap_or_default()
        };
        self.rows
            .iter()
            .map(|row| FlattenedRow {
                name: cell(row, 0),
                value: cell(row, 1),
                baseline: cell(row, 2),
                sub_activities: cell(row, 3),
            })
            .collect()
    }
}

/// The three procedure segments of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    StopProcedure,
    Maintenance,
    StartProcedure,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::StopProcedure, Segment::Maintenance, Segment::StartProcedure];

    pub fn index(self) -> usize {
        match self {
            Segment::StopProcedure => 0,
            Segment::Maintenance => 1,
            Segment::StartProcedure => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::StopProcedure => "Procedimento de Parada",
            Segment::Maintenance => "Manutenção",
            Segment::StartProcedure => "Procedimento de Partida",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Segment::StopProcedure => "parada",
            Segment::Maintenance => "manutencao",
            Segment::StartProcedure => "partida",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows of one segment, in original file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a, T> {
    pub segment: Segment,
    pub rows: &'a [T],
}

impl<'a, T> Block<'a, T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
