//! Whole-database statistics for reporting collaborators.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::DbError;

/// Row counts, observation date coverage, and session outcome totals.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseStats {
    pub projects: i64,
    pub keywords: i64,
    pub sessions: i64,
    pub positions: i64,
    pub competitors: i64,
    pub domains: i64,
    pub snapshots: i64,
    pub first_check_date: Option<NaiveDate>,
    pub last_check_date: Option<NaiveDate>,
    pub completed_sessions: i64,
    pub failed_sessions: i64,
    pub avg_keywords_per_session: Option<f64>,
}

/// Collects the stats in a single round-trip.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_database_stats(pool: &PgPool) -> Result<DatabaseStats, DbError> {
    let stats = sqlx::query_as::<_, DatabaseStats>(
        "SELECT \
             (SELECT COUNT(*) FROM projects)            AS projects, \
             (SELECT COUNT(*) FROM keywords)            AS keywords, \
             (SELECT COUNT(*) FROM monitoring_sessions) AS sessions, \
             (SELECT COUNT(*) FROM positions)           AS positions, \
             (SELECT COUNT(*) FROM competitors)         AS competitors, \
             (SELECT COUNT(*) FROM domains)             AS domains, \
             (SELECT COUNT(*) FROM snapshots)           AS snapshots, \
             (SELECT MIN(check_date) FROM positions)    AS first_check_date, \
             (SELECT MAX(check_date) FROM positions)    AS last_check_date, \
             (SELECT COUNT(*) FILTER (WHERE status = 'completed') \
              FROM monitoring_sessions)                 AS completed_sessions, \
             (SELECT COUNT(*) FILTER (WHERE status = 'failed') \
              FROM monitoring_sessions)                 AS failed_sessions, \
             (SELECT AVG(total_keywords)::DOUBLE PRECISION \
              FROM monitoring_sessions)                 AS avg_keywords_per_session",
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
