//! Per-keyword trend classification and the project-wide verdict.

use std::collections::BTreeMap;

use serpwatch_db::PositionHistoryRow;

use crate::types::{
    KeywordTrend, OverallStatus, ProjectTrend, TrendAssessment, TrendDirection, TrendMetrics,
};

/// Classifies every keyword with at least three usable checks and derives
/// the project verdict from the improving/declining ratios.
///
/// A keyword is improving when its last three recorded positions strictly
/// fall, declining when they strictly rise, and fluctuating otherwise.
/// Checks where the domain was not found carry no position and are ignored.
#[must_use]
pub fn assess_trends(grouped: &BTreeMap<String, Vec<PositionHistoryRow>>) -> TrendAssessment {
    let mut keyword_trends = Vec::new();

    for (keyword, series) in grouped {
        let recent: Vec<i32> = series.iter().filter_map(|row| row.position).collect();
        if recent.len() < 3 {
            continue;
        }
        let window = &recent[recent.len() - 3..];

        let trend = if window[0] > window[1] && window[1] > window[2] {
            TrendDirection::Improving
        } else if window[0] < window[1] && window[1] < window[2] {
            TrendDirection::Declining
        } else {
            TrendDirection::Fluctuating
        };

        keyword_trends.push(KeywordTrend {
            keyword: keyword.clone(),
            trend,
            current_position: window[2],
            change_3_checks: window[0] - window[2],
        });
    }

    let improving = keyword_trends
        .iter()
        .filter(|t| t.trend == TrendDirection::Improving)
        .count();
    let declining = keyword_trends
        .iter()
        .filter(|t| t.trend == TrendDirection::Declining)
        .count();
    let total = keyword_trends.len();
    let fluctuating = total - improving - declining;

    let (improvement_ratio, decline_ratio) = if total == 0 {
        (0.0, 0.0)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let ratios = (improving as f64 / total as f64, declining as f64 / total as f64);
        ratios
    };

    let (overall_status, trend) = if decline_ratio > 0.5 {
        (OverallStatus::Critical, ProjectTrend::Negative)
    } else if decline_ratio > 0.3 {
        (OverallStatus::Warning, ProjectTrend::SlightlyNegative)
    } else if improvement_ratio > 0.5 {
        (OverallStatus::Good, ProjectTrend::Positive)
    } else {
        (OverallStatus::Stable, ProjectTrend::Neutral)
    };

    TrendAssessment {
        keyword_trends,
        metrics: TrendMetrics {
            total_keywords_tracked: total,
            improving,
            declining,
            fluctuating,
            improvement_ratio: round2(improvement_ratio),
            decline_ratio: round2(decline_ratio),
        },
        overall_status,
        trend,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
