//! Detection of position drops between consecutive checks.

use std::collections::BTreeMap;

use serpwatch_db::PositionHistoryRow;

use crate::thresholds::ThreatThresholds;
use crate::types::{Threat, ThreatLevel};

/// Compares the two most recent checks of every keyword and reports drops
/// that meet the configured thresholds.
///
/// Keywords with fewer than `min_checks` observations are skipped, as are
/// pairs where either check recorded no position.
#[must_use]
pub fn detect_position_drops(
    grouped: &BTreeMap<String, Vec<PositionHistoryRow>>,
    thresholds: &ThreatThresholds,
) -> Vec<Threat> {
    let mut threats = Vec::new();

    for (keyword, series) in grouped {
        // Comparing the two most recent checks needs at least two rows even
        // if min_checks is configured lower.
        if series.len() < thresholds.min_checks.max(2) {
            continue;
        }
        let latest = &series[series.len() - 1];
        let previous = &series[series.len() - 2];
        let (Some(current), Some(prior)) = (latest.position, previous.position) else {
            continue;
        };

        let change = current - prior;
        let threat_level = if change >= thresholds.critical_drop {
            ThreatLevel::Critical
        } else if change >= thresholds.significant_drop {
            ThreatLevel::Warning
        } else {
            continue;
        };

        threats.push(Threat::PositionDrop {
            keyword: keyword.clone(),
            previous_position: prior,
            current_position: current,
            change,
            threat_level,
            detected_at: latest.check_date,
            timeframe_hours: hours_between(previous, latest),
        });
    }

    threats
}

#[allow(clippy::cast_precision_loss)]
fn hours_between(earlier: &PositionHistoryRow, later: &PositionHistoryRow) -> f64 {
    let earlier = earlier.check_date.and_time(earlier.check_time);
    let later = later.check_date.and_time(later.check_time);
    (later - earlier).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::history::group_by_keyword;

    fn row(keyword: &str, day: u32, position: Option<i32>) -> PositionHistoryRow {
        PositionHistoryRow {
            check_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            check_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            keyword: keyword.to_string(),
            position,
            url: None,
            search_engine: "yandex".to_string(),
            total_results: 0,
            session_id: None,
        }
    }

    #[test]
    fn large_drop_is_critical() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5)), row("alpha", 11, Some(18))]);
        let threats = detect_position_drops(&grouped, &ThreatThresholds::default());

        assert_eq!(threats.len(), 1);
        let Threat::PositionDrop {
            change,
            threat_level,
            previous_position,
            current_position,
            ..
        } = &threats[0]
        else {
            panic!("expected a position drop");
        };
        assert_eq!(*change, 13);
        assert_eq!(*threat_level, ThreatLevel::Critical);
        assert_eq!(*previous_position, 5);
        assert_eq!(*current_position, 18);
    }

    #[test]
    fn moderate_drop_is_a_warning() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5)), row("alpha", 11, Some(9))]);
        let threats = detect_position_drops(&grouped, &ThreatThresholds::default());

        assert_eq!(threats.len(), 1);
        assert!(matches!(
            threats[0],
            Threat::PositionDrop {
                change: 4,
                threat_level: ThreatLevel::Warning,
                ..
            }
        ));
    }

    #[test]
    fn small_movement_is_ignored() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5)), row("alpha", 11, Some(7))]);
        assert!(detect_position_drops(&grouped, &ThreatThresholds::default()).is_empty());
    }

    #[test]
    fn missing_position_in_either_check_is_skipped() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5)), row("alpha", 11, None)]);
        assert!(detect_position_drops(&grouped, &ThreatThresholds::default()).is_empty());
    }

    #[test]
    fn single_check_is_below_the_minimum() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5))]);
        assert!(detect_position_drops(&grouped, &ThreatThresholds::default()).is_empty());
    }

    #[test]
    fn timeframe_reflects_the_gap_between_the_compared_checks() {
        let grouped = group_by_keyword(&[row("alpha", 10, Some(5)), row("alpha", 11, Some(18))]);
        let threats = detect_position_drops(&grouped, &ThreatThresholds::default());

        let Threat::PositionDrop { timeframe_hours, .. } = &threats[0] else {
            panic!("expected a position drop");
        };
        assert!((timeframe_hours - 24.0).abs() < f64::EPSILON);
    }
}
