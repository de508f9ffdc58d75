//! Tunable limits for the detection phases.

use serpwatch_core::AppConfig;

/// Limits controlling when movement counts as a threat.
#[derive(Debug, Clone)]
pub struct ThreatThresholds {
    /// Position loss at or above this is a critical drop.
    pub critical_drop: i32,
    /// Position loss at or above this is a warning.
    pub significant_drop: i32,
    /// History window for drops and trends, in days.
    pub days_to_analyze: i32,
    /// History window for displacement detection, in days.
    pub displacement_days: i32,
    /// Minimum checks a keyword needs before drop detection applies.
    pub min_checks: usize,
}

impl Default for ThreatThresholds {
    fn default() -> Self {
        Self {
            critical_drop: 10,
            significant_drop: 3,
            days_to_analyze: 7,
            displacement_days: 30,
            min_checks: 2,
        }
    }
}

impl ThreatThresholds {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            critical_drop: config.threat_critical_drop,
            significant_drop: config.threat_significant_drop,
            days_to_analyze: config.threat_days_to_analyze,
            displacement_days: config.threat_displacement_days,
            min_checks: config.threat_min_checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let thresholds = ThreatThresholds::default();
        assert_eq!(thresholds.critical_drop, 10);
        assert_eq!(thresholds.significant_drop, 3);
        assert_eq!(thresholds.days_to_analyze, 7);
        assert_eq!(thresholds.displacement_days, 30);
        assert_eq!(thresholds.min_checks, 2);
    }
}
