//! Recommendation lines derived from the detected threats.

use crate::types::{Threat, ThreatLevel};

/// Turns the detected threats into short actionable recommendations.
///
/// The list is never empty: a clean report still recommends continuing the
/// regular monitoring schedule.
#[must_use]
pub fn generate_recommendations(threats: &[Threat]) -> Vec<String> {
    let critical_drops: Vec<&str> = threats
        .iter()
        .filter_map(|threat| match threat {
            Threat::PositionDrop {
                keyword,
                threat_level: ThreatLevel::Critical,
                ..
            } => Some(keyword.as_str()),
            _ => None,
        })
        .collect();
    let warning_drops: Vec<&str> = threats
        .iter()
        .filter_map(|threat| match threat {
            Threat::PositionDrop {
                keyword,
                threat_level: ThreatLevel::Warning,
                ..
            } => Some(keyword.as_str()),
            _ => None,
        })
        .collect();
    let displaced: Vec<&str> = threats
        .iter()
        .filter_map(|threat| match threat {
            Threat::Displacement { keyword, .. } => Some(keyword.as_str()),
            _ => None,
        })
        .collect();

    let mut recommendations = Vec::new();
    if !critical_drops.is_empty() {
        recommendations.push(format!(
            "URGENT: investigate critical position drops for: {}",
            join_first(&critical_drops, 3),
        ));
    }
    if !warning_drops.is_empty() {
        recommendations.push(format!(
            "Review content and on-page signals for: {}",
            join_first(&warning_drops, 5),
        ));
    }
    if !displaced.is_empty() {
        recommendations.push(format!(
            "Rebuild top-20 presence for: {}",
            join_first(&displaced, 3),
        ));
    }
    if recommendations.is_empty() {
        if threats.is_empty() {
            recommendations
                .push("No active threats detected; continue regular monitoring.".to_string());
        } else {
            recommendations
                .push("Review detected threats and adjust the monitoring plan.".to_string());
        }
    }
    recommendations
}

fn join_first(keywords: &[&str], limit: usize) -> String {
    keywords[..keywords.len().min(limit)].join(", ")
}
