//! Split the flattened activity table into procedure blocks.
//!
//! Every procedure segment of the report starts with the same activity,
//! [`SENTINEL`]. The table is scanned from its last row upwards: rows go
//! to the current block, and each sentinel closes it. The first block met
//! from the end is the stop procedure, then maintenance, then the start
//! procedure. Whatever sits above the third sentinel is left out.
//!
//! ```text
//!  r1  r2 │ S  r3  r4 │ S  r5 │ S  r6
//!  ───────┴───────────┴───────┴──────
//! discarded   start    maint.   stop      ◀── scan direction
//! ```

use crate::error::{PartitionError, PartitionResult};
use crate::models::{is_sentinel, Block, FlattenedRow, Segment, Table, NAME_COLUMN};

/// A row with a block-name field.
pub trait NamedRow {
    /// Value of the `name` column, `None` when the row lacks it.
    fn name(&self) -> Option<&str>;
}

impl NamedRow for FlattenedRow {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// The three blocks of a table, borrowed from it in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<'a, T> {
    pub stop_procedure: Block<'a, T>,
    pub maintenance: Block<'a, T>,
    pub start_procedure: Block<'a, T>,
    /// Rows above the third sentinel, never scanned.
    pub discarded: &'a [T],
}

impl<'a, T> Partition<'a, T> {
    pub fn block(&self, segment: Segment) -> &Block<'a, T> {
        match segment {
            Segment::StopProcedure => &self.stop_procedure,
            Segment::Maintenance => &self.maintenance,
            Segment::StartProcedure => &self.start_procedure,
        }
    }

    /// Blocks in write order.
    pub fn blocks(&self) -> [&Block<'a, T>; 3] {
        [&self.stop_procedure, &self.maintenance, &self.start_procedure]
    }

    /// Rows assigned to some block.
    pub fn consumed(&self) -> usize {
        self.blocks().iter().map(|b| b.len()).sum()
    }
}

/// Partition rows that expose their name through [`NamedRow`].
pub fn partition<T: NamedRow>(rows: &[T]) -> PartitionResult<Partition<'_, T>> {
    partition_by(rows, T::name)
}

/// Partition rows using `name_of` to read each row's name.
///
/// Missing names are reported with the row's 1-based file line, counting
/// the header as line 1.
pub fn partition_by<T, F>(rows: &[T], name_of: F) -> PartitionResult<Partition<'_, T>>
where
    F: Fn(&T) -> Option<&str>,
{
    if rows.is_empty() {
        return Err(PartitionError::EmptyInput);
    }

    // cuts[k] is the exclusive end of block k; cuts[k + 1] its start.
    // Unreached cuts stay 0, so short tables end in empty blocks.
    let mut cuts = [0usize; 4];
    cuts[0] = rows.len();
    let mut counter = 0;

    for (idx, row) in rows.iter().enumerate().rev() {
        if counter == 3 {
            break;
        }
        let name = name_of(row).ok_or_else(|| PartitionError::MissingColumn {
            column: NAME_COLUMN.to_string(),
            line: idx + 2,
        })?;
        if is_sentinel(name) {
            counter += 1;
            cuts[counter] = idx;
        }
    }

    Ok(Partition {
        stop_procedure: slice_block(rows, &cuts, Segment::StopProcedure),
        maintenance: slice_block(rows, &cuts, Segment::Maintenance),
        start_procedure: slice_block(rows, &cuts, Segment::StartProcedure),
        discarded: &rows[..cuts[3]],
    })
}

fn slice_block<'a, T>(rows: &'a [T], cuts: &[usize; 4], segment: Segment) -> Block<'a, T> {
    let k = segment.index();
    Block {
        segment,
        rows: &rows[cuts[k + 1]..cuts[k]],
    }
}

/// Partition a CSV table on its `name` column.
pub fn partition_table(table: &Table) -> PartitionResult<Partition<'_, Vec<String>>> {
    if table.is_empty() {
        return Err(PartitionError::EmptyInput);
    }
    let column = table
        .column_index(NAME_COLUMN)
        .ok_or_else(|| PartitionError::MissingColumn {
            column: NAME_COLUMN.to_string(),
            line: 1,
        })?;
    partition_by(&table.rows, |row| row.get(column).map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SENTINEL;

    fn flat(name: &str) -> FlattenedRow {
        FlattenedRow {
            name: name.to_string(),
            value: String::new(),
            baseline: String::new(),
            sub_activities: String::new(),
        }
    }

    fn names<T: NamedRow>(rows: &[T]) -> Vec<&str> {
        rows.iter().map(|r| r.name().unwrap_or("")).collect()
    }

    const S: &str = SENTINEL;

    #[test]
    fn test_three_blocks_from_the_tail() {
        let rows: Vec<_> = ["r1", "r2", S, "r3", "r4", S, "r5", S, "r6"]
            .into_iter()
            .map(flat)
            .collect();
        let p = partition(&rows).unwrap();

        assert_eq!(names(p.stop_procedure.rows), vec![S, "r6"]);
        assert_eq!(names(p.maintenance.rows), vec![S, "r5"]);
        assert_eq!(names(p.start_procedure.rows), vec![S, "r3", "r4"]);
        assert_eq!(names(p.discarded), vec!["r1", "r2"]);
        assert_eq!(p.consumed(), 7);
    }

    #[test]
    fn test_blocks_carry_their_segment() {
        let rows: Vec<_> = [S, "a", S, "b", S, "c"].into_iter().map(flat).collect();
        let p = partition(&rows).unwrap();
        for segment in Segment::ALL {
            assert_eq!(p.block(segment).segment, segment);
        }
        assert!(p.discarded.is_empty());
    }

    #[test]
    fn test_fewer_than_three_sentinels() {
        let rows: Vec<_> = ["r1", S, "r2"].into_iter().map(flat).collect();
        let p = partition(&rows).unwrap();

        assert_eq!(names(p.stop_procedure.rows), vec![S, "r2"]);
        assert_eq!(names(p.maintenance.rows), vec!["r1"]);
        assert!(p.start_procedure.is_empty());
        assert!(p.discarded.is_empty());
    }

    #[test]
    fn test_no_sentinel_puts_everything_in_first_block() {
        let rows: Vec<_> = ["r1", "r2"].into_iter().map(flat).collect();
        let p = partition(&rows).unwrap();
        assert_eq!(p.stop_procedure.len(), 2);
        assert!(p.maintenance.is_empty());
        assert!(p.start_procedure.is_empty());
    }

    #[test]
    fn test_sentinel_match_is_trimmed_and_exact() {
        let padded = format!("  {}  ", S);
        let rows: Vec<_> = ["r1", padded.as_str(), "Pátio de Alimentação Norte", "r2"]
            .into_iter()
            .map(flat)
            .collect();
        let p = partition(&rows).unwrap();
        assert_eq!(p.stop_procedure.len(), 3);
        assert_eq!(names(p.maintenance.rows), vec!["r1"]);
    }

    #[test]
    fn test_trailing_sentinel_forms_single_row_block() {
        let rows: Vec<_> = ["r1", S].into_iter().map(flat).collect();
        let p = partition(&rows).unwrap();
        assert_eq!(names(p.stop_procedure.rows), vec![S]);
        assert_eq!(names(p.maintenance.rows), vec!["r1"]);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<FlattenedRow> = Vec::new();
        assert!(matches!(partition(&rows), Err(PartitionError::EmptyInput)));
    }

    #[test]
    fn test_table_without_name_column() {
        let table = Table::new(vec!["nome".into()], vec![vec!["r1".into()]]);
        match partition_table(&table) {
            Err(PartitionError::MissingColumn { column, line }) => {
                assert_eq!(column, "name");
                assert_eq!(line, 1);
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_checked_before_header() {
        let table = Table::new(vec!["nome".into()], Vec::new());
        assert!(matches!(partition_table(&table), Err(PartitionError::EmptyInput)));
    }

    #[test]
    fn test_short_row_in_scanned_range() {
        let table = Table::new(
            vec!["value".into(), "name".into()],
            vec![
                vec!["1".into(), "r1".into()],
                vec!["2".into()],
                vec!["3".into(), "r3".into()],
            ],
        );
        match partition_table(&table) {
            Err(PartitionError::MissingColumn { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_above_third_sentinel_is_never_read() {
        let s = S.to_string();
        let table = Table::new(
            vec!["name".into()],
            vec![
                vec![],
                vec![s.clone()],
                vec![s.clone()],
                vec![s.clone()],
                vec!["r".into()],
            ],
        );
        let p = partition_table(&table).unwrap();
        assert_eq!(p.discarded.len(), 1);
        assert_eq!(p.stop_procedure.len(), 2);
    }

    #[test]
    fn test_input_left_untouched() {
        let rows: Vec<_> = ["r1", S, "r2"].into_iter().map(flat).collect();
        let before = rows.clone();
        let _ = partition(&rows).unwrap();
        assert_eq!(rows, before);
    }
}
