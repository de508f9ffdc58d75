//! Per-keyword batch results.

use serde::{Deserialize, Serialize};

/// What was recorded for one successfully persisted keyword check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCheck {
    pub keyword: String,
    /// `None` records that the tracked domain was not found.
    pub position: Option<i32>,
    pub url: Option<String>,
    pub found: bool,
    pub total_results: i64,
    /// Newly inserted competitor rows (zero when tracking is off or the
    /// source sent none).
    pub competitors_recorded: usize,
    /// Whether the top-10 snapshot changed; `None` when no snapshot was fed.
    pub snapshot_changed: Option<bool>,
    /// Upstream error text carried on the observation, if any.
    pub error: Option<String>,
}

/// Outcome of processing a single keyword within a batch.
///
/// A batch never aborts on one keyword: storage failures become `Failed`
/// entries and the loop moves on to the next keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum KeywordOutcome {
    /// The observation was written (possibly as a not-found null position).
    Saved(KeywordCheck),
    /// Persisting the observation failed; nothing was recorded for it.
    Failed { keyword: String, reason: String },
}

impl KeywordOutcome {
    /// Returns `true` for a saved check that found the tracked domain.
    #[must_use]
    pub fn has_position(&self) -> bool {
        matches!(self, Self::Saved(check) if check.position.is_some())
    }
}
