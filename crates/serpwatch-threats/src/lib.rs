//! Trend and threat analysis over recorded position history.
//!
//! A pure classification layer (drops, displacements, trends, and
//! recommendations) operates on per-keyword groups of history rows; the
//! [`ThreatDetector`] reads those rows from Postgres and assembles a
//! best-effort [`ProjectAnalysis`] report per project domain.

pub mod analyzer;
pub mod displacement;
pub mod drops;
pub mod error;
pub mod history;
pub mod recommend;
pub mod thresholds;
pub mod trend;
pub mod types;

pub use analyzer::ThreatDetector;
pub use displacement::detect_displacements;
pub use drops::detect_position_drops;
pub use error::ThreatError;
pub use history::group_by_keyword;
pub use recommend::generate_recommendations;
pub use thresholds::ThreatThresholds;
pub use trend::assess_trends;
pub use types::{
    KeywordTrend, OverallStatus, ProjectAnalysis, ProjectTrend, Threat, ThreatLevel,
    TrendAssessment, TrendDirection, TrendMetrics,
};
