//! Progress metrics for activities.
//!
//! Report percentages come as text, often with a decimal comma (`"12,5"`).

use serde::{Deserialize, Serialize};

/// Parse a report percentage. Empty or unparsable values read as `0.0`;
/// the result never exceeds 100.
pub fn parse_percentage(raw: &str) -> f64 {
    let cleaned = raw.trim().trim_end_matches('%').trim().replacen(',', ".", 1);
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v.min(100.0),
        _ => 0.0,
    }
}

/// Actual progress relative to plan, as a rounded percentage.
pub fn progress(real: &str, planned: &str) -> u32 {
    let planned = parse_percentage(planned);
    if planned == 0.0 {
        return 0;
    }
    let ratio = (parse_percentage(real) / planned * 100.0).round();
    if ratio <= 0.0 {
        0
    } else {
        ratio as u32
    }
}

/// Schedule status derived from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotStarted,
    AtRisk,
    InProgress,
    Completed,
}

impl Status {
    pub fn classify(progress: u32) -> Self {
        match progress {
            0 => Status::NotStarted,
            p if p >= 100 => Status::Completed,
            p if p >= 50 => Status::InProgress,
            _ => Status::AtRisk,
        }
    }
}

/// Dashboard color for a progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressColor {
    Green,
    Yellow,
    Red,
}

impl ProgressColor {
    pub fn classify(progress: u32) -> Self {
        match progress {
            p if p >= 90 => ProgressColor::Green,
            p if p >= 70 => ProgressColor::Yellow,
            _ => ProgressColor::Red,
        }
    }
}

/// Progress of one activity with its dashboard classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub progress: u32,
    pub status: Status,
    pub progress_color: ProgressColor,
}

impl ProgressSummary {
    pub fn from_percent(progress: u32) -> Self {
        Self {
            progress,
            status: Status::classify(progress),
            progress_color: ProgressColor::classify(progress),
        }
    }

    /// Summary of `real` against `planned`, both report percentages.
    pub fn of(real: &str, planned: &str) -> Self {
        Self::from_percent(progress(real, planned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage_formats() {
        assert_eq!(parse_percentage("42"), 42.0);
        assert_eq!(parse_percentage(" 12,5 "), 12.5);
        assert_eq!(parse_percentage("80%"), 80.0);
        assert_eq!(parse_percentage(""), 0.0);
        assert_eq!(parse_percentage("n/a"), 0.0);
        assert_eq!(parse_percentage("150"), 100.0);
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress("25", "50"), 50);
        assert_eq!(progress("10", "30"), 33);
        assert_eq!(progress("40", "0"), 0);
        assert_eq!(progress("", ""), 0);
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(Status::classify(0), Status::NotStarted);
        assert_eq!(Status::classify(1), Status::AtRisk);
        assert_eq!(Status::classify(49), Status::AtRisk);
        assert_eq!(Status::classify(50), Status::InProgress);
        assert_eq!(Status::classify(99), Status::InProgress);
        assert_eq!(Status::classify(100), Status::Completed);
        assert_eq!(Status::classify(180), Status::Completed);
    }

    #[test]
    fn test_color_boundaries() {
        assert_eq!(ProgressColor::classify(95), ProgressColor::Green);
        assert_eq!(ProgressColor::classify(90), ProgressColor::Green);
        assert_eq!(ProgressColor::classify(70), ProgressColor::Yellow);
        assert_eq!(ProgressColor::classify(69), ProgressColor::Red);
    }

    #[test]
    fn test_summary_classifies_ratio() {
        let summary = ProgressSummary::of("45", "50");
        assert_eq!(summary.progress, 90);
        assert_eq!(summary.status, Status::InProgress);
        assert_eq!(summary.progress_color, ProgressColor::Green);

        let json = serde_json::to_value(ProgressSummary::of("0", "50")).unwrap();
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["progressColor"], "red");
    }
}
