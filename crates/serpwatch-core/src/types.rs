//! Result shapes exchanged with the position-source collaborator.

use serde::{Deserialize, Serialize};

/// One competing result from a ranked result page.
///
/// Field order is load-bearing: snapshot change detection serializes entries
/// with `serde_json`, so the emitted key order must stay stable across
/// releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub position: i32,
    pub domain: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Options forwarded to [`crate::PositionSource::fetch_position`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub search_engine: String,
    pub include_competitors: bool,
    pub competitors_limit: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            search_engine: "yandex".to_string(),
            include_competitors: true,
            competitors_limit: 20,
        }
    }
}

/// One keyword's raw check result as returned by a position source.
///
/// `position` is `None` when the tracked domain was not found within the
/// inspected result window. `error` carries an upstream failure message; a
/// populated `error` always comes with a `None` position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPosition {
    pub position: Option<i32>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub total_results: i64,
    pub found: bool,
    pub competitors: Vec<CompetitorEntry>,
    pub error: Option<String>,
}

impl FetchedPosition {
    /// The result recorded when the upstream fetch itself failed: no
    /// position, no competitors, the failure message attached.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            position: None,
            url: None,
            title: None,
            total_results: 0,
            found: false,
            competitors: Vec::new(),
            error: Some(message.into()),
        }
    }
}
