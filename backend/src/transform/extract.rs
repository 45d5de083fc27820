//! Group report rows into activities.
//!
//! ```text
//! level 3  Forno           ─┐
//! level 4  Refratário  S    ├─▶ Activity "Forno" [Refratário]
//! level 4  Queimador   N   ─┘        (N: not on the dashboard)
//! level 3  Secagem         ───▶ dropped, no sub-activities
//! ```

use crate::error::ExtractResult;
use crate::models::{
    Activity, RawRow, SubActivity, COL_BASELINE, COL_DASHBOARD, COL_LEVEL, COL_NAME, COL_REAL,
    DASHBOARD_INCLUDE, LEVEL_ACTIVITY, LEVEL_SUB_ACTIVITY,
};

/// Activities built so far plus the one still collecting sub-activities.
#[derive(Debug, Default)]
struct Accumulator {
    done: Vec<Activity>,
    current: Option<Activity>,
}

impl Accumulator {
    /// Close the current activity. Activities without sub-activities are dropped.
    fn flush(&mut self) {
        if let Some(activity) = self.current.take() {
            if activity.has_sub_activities() {
                self.done.push(activity);
            }
        }
    }

    fn step(mut self, row: &RawRow) -> ExtractResult<Self> {
        match row.get_or_empty(COL_LEVEL) {
            LEVEL_ACTIVITY => {
                self.flush();
                self.current = Some(Activity::new(
                    row.require(COL_NAME)?,
                    row.require(COL_REAL)?,
                    row.require(COL_BASELINE)?,
                ));
            }
            LEVEL_SUB_ACTIVITY if row.get_or_empty(COL_DASHBOARD) == DASHBOARD_INCLUDE => {
                if let Some(activity) = self.current.as_mut() {
                    activity.sub_activities.push(SubActivity::new(
                        row.require(COL_NAME)?,
                        row.require(COL_REAL)?,
                        row.require(COL_BASELINE)?,
                    ));
                }
            }
            _ => {}
        }
        Ok(self)
    }
}

/// Build activities from report rows in file order.
///
/// Only level-4 rows flagged `S` on the dashboard become sub-activities,
/// and only activities with at least one of them are returned.
pub fn extract(rows: &[RawRow]) -> ExtractResult<Vec<Activity>> {
    let mut acc = rows
        .iter()
        .try_fold(Accumulator::default(), |acc, row| acc.step(row))?;
    acc.flush();
    Ok(acc.done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use proptest::prelude::*;

    fn row(line: usize, level: &str, name: &str, dashboard: &str) -> RawRow {
        RawRow::from_pairs(
            line,
            [
                (COL_NAME, name),
                (COL_LEVEL, level),
                (COL_REAL, "10"),
                (COL_BASELINE, "20"),
                (COL_DASHBOARD, dashboard),
            ],
        )
    }

    #[test]
    fn test_groups_sub_activities_under_activity() {
        let rows = vec![
            row(2, "3", "Forno", ""),
            row(3, "4", "Refratário", "S"),
            row(4, "4", "Queimador", "S"),
        ];
        let activities = extract(&rows).unwrap();

        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].name, "Forno");
        assert_eq!(activities[0].value, "10");
        assert_eq!(activities[0].baseline, "20");
        assert_eq!(activities[0].encoded_sub_activities(), "Refratário:10|20; Queimador:10|20");
    }

    #[test]
    fn test_activity_without_sub_activities_dropped() {
        let rows = vec![
            row(2, "3", "Secagem", ""),
            row(3, "3", "Forno", ""),
            row(4, "4", "Refratário", "S"),
            row(5, "3", "Mistura", ""),
        ];
        let names: Vec<_> = extract(&rows).unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Forno"]);
    }

    #[test]
    fn test_sub_activity_needs_flag_and_level() {
        let rows = vec![
            row(2, "3", "Forno", ""),
            row(3, "4", "sem flag", "N"),
            row(4, "4", "minúsculo", "s"),
            row(5, "5", "nível 5", "S"),
            row(6, "4", "incluída", "S"),
        ];
        let activities = extract(&rows).unwrap();
        let subs: Vec<_> = activities[0].sub_activities.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, vec!["incluída"]);
    }

    #[test]
    fn test_sub_activity_before_any_activity_ignored() {
        let rows = vec![row(2, "4", "órfã", "S"), row(3, "3", "Forno", "")];
        assert!(extract(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_optional_columns_default_to_empty() {
        let rows = vec![
            RawRow::from_pairs(2, [(COL_NAME, "sem nível")]),
            RawRow::from_pairs(
                3,
                [(COL_NAME, "Forno"), (COL_LEVEL, "3"), (COL_REAL, "1"), (COL_BASELINE, "2")],
            ),
            RawRow::from_pairs(
                4,
                [(COL_NAME, "sem dashboard"), (COL_LEVEL, "4"), (COL_REAL, "1"), (COL_BASELINE, "2")],
            ),
        ];
        assert!(extract(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_missing_mandatory_field_on_activity() {
        let rows = vec![RawRow::from_pairs(
            7,
            [(COL_NAME, "Forno"), (COL_LEVEL, "3"), (COL_REAL, "1")],
        )];
        match extract(&rows) {
            Err(ExtractError::MissingField { column, line }) => {
                assert_eq!(column, COL_BASELINE);
                assert_eq!(line, 7);
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(extract(&[]).unwrap().is_empty());
    }

    fn level_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("3"), Just("4"), Just("4"), Just("5"), Just("")]
    }

    fn flag_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("S"), Just("N"), Just("")]
    }

    proptest! {
        #[test]
        fn prop_activity_emitted_iff_it_collected_a_flagged_row(
            shape in prop::collection::vec((level_strategy(), flag_strategy()), 0..40)
        ) {
            let rows: Vec<RawRow> = shape
                .iter()
                .enumerate()
                .map(|(i, (level, flag))| row(i + 2, level, &format!("r{}", i), flag))
                .collect();

            // Expected: every level-3 row whose run (up to the next level-3 row)
            // holds at least one level-4 row flagged S.
            let mut expected = Vec::new();
            for (i, (level, _)) in shape.iter().enumerate() {
                if *level != "3" {
                    continue;
                }
                let qualifies = shape[i + 1..]
                    .iter()
                    .take_while(|(l, _)| *l != "3")
                    .any(|(l, f)| *l == "4" && *f == "S");
                if qualifies {
                    expected.push(format!("r{}", i));
                }
            }

            let activities = extract(&rows).unwrap();
            let names: Vec<String> = activities.iter().map(|a| a.name.clone()).collect();
            prop_assert_eq!(names, expected);
            for activity in &activities {
                prop_assert!(activity.has_sub_activities());
            }
        }
    }
}
