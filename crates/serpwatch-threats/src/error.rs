use thiserror::Error;

/// Error from a single analysis phase.
///
/// The phase methods on [`crate::ThreatDetector`] return these directly;
/// [`crate::ThreatDetector::analyze_project`] absorbs them into the report's
/// `error` field instead of failing the whole analysis.
#[derive(Debug, Error)]
pub enum ThreatError {
    /// Reading the position history window failed.
    #[error("history read failed: {0}")]
    History(#[from] serpwatch_db::DbError),
}
