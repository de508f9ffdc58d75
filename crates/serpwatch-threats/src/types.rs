//! Report shapes produced by the classifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a detected threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Critical,
    Warning,
}

/// A single detected threat against one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Threat {
    /// The keyword fell between the two most recent checks.
    PositionDrop {
        keyword: String,
        previous_position: i32,
        current_position: i32,
        /// Positive: positions lost (larger number = further down the page).
        change: i32,
        threat_level: ThreatLevel,
        detected_at: NaiveDate,
        /// Wall-clock distance between the two compared checks.
        timeframe_hours: f64,
    },
    /// The keyword held a top-20 position at the start of the window and
    /// does not any more.
    Displacement {
        keyword: String,
        old_position: i32,
        new_position: i32,
        dropped_from_top20: bool,
        positions_lost: i32,
        time_period_days: i64,
        threat_level: ThreatLevel,
    },
}

/// Direction of one keyword's recent movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Fluctuating,
}

/// Classified movement for one keyword over its last three usable checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrend {
    pub keyword: String,
    pub trend: TrendDirection,
    pub current_position: i32,
    /// Oldest minus newest over the window; positive when the keyword
    /// climbed.
    pub change_3_checks: i32,
}

/// Aggregate counters over all classified keywords, ratios rounded to two
/// decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMetrics {
    pub total_keywords_tracked: usize,
    pub improving: usize,
    pub declining: usize,
    pub fluctuating: usize,
    pub improvement_ratio: f64,
    pub decline_ratio: f64,
}

/// Project-wide health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Critical,
    Warning,
    Good,
    Stable,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Critical => write!(f, "critical"),
            OverallStatus::Warning => write!(f, "warning"),
            OverallStatus::Good => write!(f, "good"),
            OverallStatus::Stable => write!(f, "stable"),
        }
    }
}

/// Project-wide movement direction backing the status verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectTrend {
    Negative,
    SlightlyNegative,
    Positive,
    Neutral,
}

impl std::fmt::Display for ProjectTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectTrend::Negative => write!(f, "negative"),
            ProjectTrend::SlightlyNegative => write!(f, "slightly_negative"),
            ProjectTrend::Positive => write!(f, "positive"),
            ProjectTrend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Everything the trend phase produces: per-keyword classifications, the
/// aggregate counters, and the project verdict they imply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
    pub keyword_trends: Vec<KeywordTrend>,
    pub metrics: TrendMetrics,
    pub overall_status: OverallStatus,
    pub trend: ProjectTrend,
}

/// The full analysis report for one project domain.
///
/// `error` carries phase failure messages when parts of the analysis could
/// not run; the remaining fields still reflect the phases that did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project_name: String,
    pub domain: String,
    pub analysis_date: DateTime<Utc>,
    pub threats: Vec<Threat>,
    pub recommendations: Vec<String>,
    pub overall_status: OverallStatus,
    pub trend: ProjectTrend,
    pub metrics: TrendMetrics,
    pub error: Option<String>,
}
