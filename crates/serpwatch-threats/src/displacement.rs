//! Detection of keywords pushed out of the top 20.

use std::collections::BTreeMap;

use serpwatch_db::PositionHistoryRow;

use crate::types::{Threat, ThreatLevel};

/// Compares the oldest and newest check of every keyword in the window and
/// reports keywords that held a top-20 position and lost it.
///
/// Falling past position 50 is critical; any other exit from the top 20 is
/// a warning.
#[must_use]
pub fn detect_displacements(grouped: &BTreeMap<String, Vec<PositionHistoryRow>>) -> Vec<Threat> {
    let mut threats = Vec::new();

    for (keyword, series) in grouped {
        if series.len() < 2 {
            continue;
        }
        let oldest = &series[0];
        let newest = &series[series.len() - 1];
        let (Some(old_position), Some(new_position)) = (oldest.position, newest.position) else {
            continue;
        };
        if old_position > 20 || new_position <= 20 {
            continue;
        }

        let threat_level = if new_position > 50 {
            ThreatLevel::Critical
        } else {
            ThreatLevel::Warning
        };

        threats.push(Threat::Displacement {
            keyword: keyword.clone(),
            old_position,
            new_position,
            dropped_from_top20: true,
            positions_lost: new_position - old_position,
            time_period_days: (newest.check_date - oldest.check_date).num_days(),
            threat_level,
        });
    }

    threats
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
    fn fall_past_fifty_is_critical() {
        let grouped = group_by_keyword(&[row("alpha", 1, Some(15)), row("alpha", 30, Some(55))]);
        let threats = detect_displacements(&grouped);

        assert_eq!(threats.len(), 1);
        let Threat::Displacement {
            positions_lost,
            time_period_days,
            threat_level,
            dropped_from_top20,
            ..
        } = &threats[0]
        else {
            panic!("expected a displacement");
        };
        assert_eq!(*positions_lost, 40);
        assert_eq!(*time_period_days, 29);
        assert_eq!(*threat_level, ThreatLevel::Critical);
        assert!(dropped_from_top20);
    }

    #[test]
    fn exit_from_top20_without_collapse_is_a_warning() {
        let grouped = group_by_keyword(&[row("alpha", 1, Some(15)), row("alpha", 30, Some(25))]);
        let threats = detect_displacements(&grouped);

        assert_eq!(threats.len(), 1);
        assert!(matches!(
            threats[0],
            Threat::Displacement {
                threat_level: ThreatLevel::Warning,
                ..
            }
        ));
    }

    #[test]
    fn keyword_already_outside_top20_is_not_a_displacement() {
        let grouped = group_by_keyword(&[row("alpha", 1, Some(25)), row("alpha", 30, Some(55))]);
        assert!(detect_displacements(&grouped).is_empty());
    }

    #[test]
    fn movement_inside_top20_is_not_a_displacement() {
        let grouped = group_by_keyword(&[row("alpha", 1, Some(15)), row("alpha", 30, Some(18))]);
        assert!(detect_displacements(&grouped).is_empty());
    }
}
