//! The detector that ties history reads to the detection phases.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::PgPool;

use crate::displacement::detect_displacements;
use crate::drops::detect_position_drops;
use crate::error::ThreatError;
use crate::history::group_by_keyword;
use crate::recommend::generate_recommendations;
use crate::thresholds::ThreatThresholds;
use crate::trend::assess_trends;
use crate::types::{ProjectAnalysis, Threat, TrendAssessment};

/// Runs the detection phases over a project's recorded history.
pub struct ThreatDetector {
    pool: PgPool,
    thresholds: ThreatThresholds,
}

impl ThreatDetector {
    #[must_use]
    pub fn new(pool: PgPool, thresholds: ThreatThresholds) -> Self {
        Self { pool, thresholds }
    }

    /// Detects drops between the two most recent checks of each keyword.
    ///
    /// # Errors
    ///
    /// Returns an error when the history read fails.
    pub async fn position_drops(&self, domain: &str) -> Result<Vec<Threat>, ThreatError> {
        let rows =
            serpwatch_db::get_position_history(&self.pool, domain, self.thresholds.days_to_analyze)
                .await?;
        Ok(detect_position_drops(&group_by_keyword(&rows), &self.thresholds))
    }

    /// Detects keywords pushed out of the top 20 over the displacement
    /// window.
    ///
    /// # Errors
    ///
    /// Returns an error when the history read fails.
    pub async fn displacements(&self, domain: &str) -> Result<Vec<Threat>, ThreatError> {
        let rows = serpwatch_db::get_position_history(
            &self.pool,
            domain,
            self.thresholds.displacement_days,
        )
        .await?;
        Ok(detect_displacements(&group_by_keyword(&rows)))
    }

    /// Classifies per-keyword trends and derives the project verdict.
    ///
    /// # Errors
    ///
    /// Returns an error when the history read fails.
    pub async fn trend_assessment(&self, domain: &str) -> Result<TrendAssessment, ThreatError> {
        let rows =
            serpwatch_db::get_position_history(&self.pool, domain, self.thresholds.days_to_analyze)
                .await?;
        Ok(assess_trends(&group_by_keyword(&rows)))
    }

    /// Runs every phase and assembles the full report.
    ///
    /// Phase failures never abort the analysis. A failed phase is logged,
    /// noted in the report's `error` field, and the report carries whatever
    /// the other phases produced.
    pub async fn analyze_project(&self, project_name: &str, domain: &str) -> ProjectAnalysis {
        let analysis_date = Utc::now();
        let mut threats = Vec::new();
        let mut error = None;

        match self.position_drops(domain).await {
            Ok(found) => threats.extend(found),
            Err(e) => {
                tracing::error!(domain, error = %e, "position drop analysis failed");
                note_phase_error(&mut error, "position drops", &e);
            }
        }
        match self.displacements(domain).await {
            Ok(found) => threats.extend(found),
            Err(e) => {
                tracing::error!(domain, error = %e, "displacement analysis failed");
                note_phase_error(&mut error, "displacement", &e);
            }
        }
        let assessment = match self.trend_assessment(domain).await {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::error!(domain, error = %e, "trend assessment failed");
                note_phase_error(&mut error, "trend assessment", &e);
                assess_trends(&BTreeMap::new())
            }
        };

        let recommendations = generate_recommendations(&threats);

        ProjectAnalysis {
            project_name: project_name.to_string(),
            domain: domain.to_string(),
            analysis_date,
            threats,
            recommendations,
            overall_status: assessment.overall_status,
            trend: assessment.trend,
            metrics: assessment.metrics,
            error,
        }
    }
}

fn note_phase_error(error: &mut Option<String>, phase: &str, e: &ThreatError) {
    let message = format!("{phase}: {e}");
    match error {
        Some(existing) => {
            existing.push_str("; ");
            existing.push_str(&message);
        }
        None => *error = Some(message),
    }
}
