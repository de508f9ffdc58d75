//! Live analysis tests for serpwatch-threats using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database. History is
//! seeded through the serpwatch-db write path so the detector reads the
//! same rows production would.

use chrono::{Duration, NaiveTime, Utc};
use serpwatch_db::{resolve_keyword, resolve_project, save_position};
use serpwatch_threats::{
    OverallStatus, ProjectTrend, Threat, ThreatDetector, ThreatLevel, ThreatThresholds,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Record one observation per `(days_ago, position)` pair for a keyword,
/// all at noon so consecutive days sit exactly 24 hours apart.
async fn seed_series(pool: &PgPool, domain: &str, keyword: &str, series: &[(i64, Option<i32>)]) {
    let project_id = resolve_project(pool, "Test Project", domain)
        .await
        .unwrap_or_else(|e| panic!("resolve_project failed for domain '{domain}': {e}"));
    let keyword_id = resolve_keyword(pool, project_id, keyword)
        .await
        .unwrap_or_else(|e| panic!("resolve_keyword failed for keyword '{keyword}': {e}"));
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    for (days_ago, position) in series {
        let check_date = (Utc::now() - Duration::days(*days_ago)).date_naive();
        save_position(
            pool,
            project_id,
            keyword_id,
            None,
            check_date,
            noon,
            *position,
            None,
            1_000,
            "yandex",
        )
        .await
        .unwrap_or_else(|e| panic!("save_position failed for '{keyword}' {days_ago}d ago: {e}"));
    }
}

// ---------------------------------------------------------------------------
// Section 1: Full Project Analysis
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_project_reports_drops_displacements_and_trends(pool: PgPool) {
    // alpha collapses between its last two checks, beta climbs steadily,
    // gamma held a top-20 spot a month ago and is far outside it now.
    seed_series(&pool, "example.com", "alpha", &[(2, Some(5)), (1, Some(5)), (0, Some(18))]).await;
    seed_series(&pool, "example.com", "beta", &[(2, Some(3)), (1, Some(2)), (0, Some(1))]).await;
    seed_series(&pool, "example.com", "gamma", &[(29, Some(15)), (0, Some(55))]).await;

    let detector = ThreatDetector::new(pool, ThreatThresholds::default());
    let analysis = detector.analyze_project("Test Project", "example.com").await;

    assert_eq!(analysis.project_name, "Test Project");
    assert_eq!(analysis.domain, "example.com");
    assert_eq!(analysis.error, None);

    // gamma has a single check inside the drop window, so only alpha's
    // collapse and gamma's displacement qualify.
    assert_eq!(analysis.threats.len(), 2, "expected one drop and one displacement");
    let Threat::PositionDrop {
        keyword,
        change,
        threat_level,
        timeframe_hours,
        ..
    } = &analysis.threats[0]
    else {
        panic!("expected the first threat to be a position drop");
    };
    assert_eq!(keyword, "alpha");
    assert_eq!(*change, 13);
    assert_eq!(*threat_level, ThreatLevel::Critical);
    assert!((timeframe_hours - 24.0).abs() < f64::EPSILON);

    let Threat::Displacement {
        keyword,
        positions_lost,
        time_period_days,
        threat_level,
        ..
    } = &analysis.threats[1]
    else {
        panic!("expected the second threat to be a displacement");
    };
    assert_eq!(keyword, "gamma");
    assert_eq!(*positions_lost, 40);
    assert_eq!(*time_period_days, 29);
    assert_eq!(*threat_level, ThreatLevel::Critical);

    // alpha fluctuates (5, 5, 18 is not strictly rising), beta improves;
    // half improving is not a majority, so the project reads as stable.
    assert_eq!(analysis.metrics.total_keywords_tracked, 2);
    assert_eq!(analysis.metrics.improving, 1);
    assert_eq!(analysis.metrics.declining, 0);
    assert_eq!(analysis.metrics.fluctuating, 1);
    assert_eq!(analysis.overall_status, OverallStatus::Stable);
    assert_eq!(analysis.trend, ProjectTrend::Neutral);

    assert_eq!(analysis.recommendations.len(), 2);
    assert!(analysis.recommendations[0].starts_with("URGENT"));
    assert!(analysis.recommendations[0].contains("alpha"));
    assert!(analysis.recommendations[1].contains("gamma"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn analyze_project_without_history_recommends_continued_monitoring(pool: PgPool) {
    let detector = ThreatDetector::new(pool, ThreatThresholds::default());
    let analysis = detector.analyze_project("Test Project", "empty.example.com").await;

    assert!(analysis.threats.is_empty());
    assert_eq!(analysis.metrics.total_keywords_tracked, 0);
    assert_eq!(analysis.overall_status, OverallStatus::Stable);
    assert_eq!(analysis.trend, ProjectTrend::Neutral);
    assert_eq!(analysis.recommendations.len(), 1);
    assert!(analysis.recommendations[0].contains("continue regular monitoring"));
    assert_eq!(analysis.error, None);
}

// ---------------------------------------------------------------------------
// Section 2: Phase Windows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn position_drops_ignore_history_outside_the_window(pool: PgPool) {
    // The collapse happened three weeks ago, outside the 7-day drop window.
    seed_series(&pool, "example.com", "alpha", &[(21, Some(5)), (20, Some(18))]).await;

    let detector = ThreatDetector::new(pool, ThreatThresholds::default());
    let drops = detector
        .position_drops("example.com")
        .await
        .expect("position_drops failed");

    assert!(drops.is_empty(), "stale history must not trigger drop threats");
}

#[sqlx::test(migrations = "../../migrations")]
async fn displacements_use_the_wider_window(pool: PgPool) {
    seed_series(&pool, "example.com", "alpha", &[(25, Some(10)), (0, Some(30))]).await;

    let detector = ThreatDetector::new(pool, ThreatThresholds::default());
    let displacements = detector
        .displacements("example.com")
        .await
        .expect("displacements failed");

    assert_eq!(displacements.len(), 1);
    assert!(matches!(
        displacements[0],
        Threat::Displacement {
            old_position: 10,
            new_position: 30,
            threat_level: ThreatLevel::Warning,
            ..
        }
    ));
}
