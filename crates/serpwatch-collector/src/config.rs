//! Collector behavior knobs, separated from the ambient [`AppConfig`] so the
//! engine can be driven directly in tests and embedded callers.

use serpwatch_core::AppConfig;

/// How the collector queries the position source and what it persists.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Search engine label stamped on every observation.
    pub search_engine: String,
    /// Whether competitor lists are persisted and snapshotted at all.
    pub track_competitors: bool,
    /// Upper bound on competitor entries kept per keyword check.
    pub competitors_limit: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            search_engine: "yandex".to_string(),
            track_competitors: true,
            competitors_limit: 20,
        }
    }
}

impl CollectorConfig {
    /// Builds a collector config from the loaded application config.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_engine: config.collector_search_engine.clone(),
            track_competitors: config.collector_track_competitors,
            competitors_limit: config.collector_competitors_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tracks_twenty_competitors_on_yandex() {
        let config = CollectorConfig::default();

        assert_eq!(config.search_engine, "yandex");
        assert!(config.track_competitors);
        assert_eq!(config.competitors_limit, 20);
    }
}
