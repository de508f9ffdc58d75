//! Database operations for the `positions` table.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One historical position observation joined with its keyword text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PositionHistoryRow {
    pub check_date: NaiveDate,
    pub check_time: NaiveTime,
    pub keyword: String,
    pub position: Option<i32>,
    pub url: Option<String>,
    pub search_engine: String,
    pub total_results: i64,
    pub session_id: Option<i64>,
}

/// One position observation belonging to a monitoring session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionPositionRow {
    pub check_date: NaiveDate,
    pub check_time: NaiveTime,
    pub keyword: String,
    pub position: Option<i32>,
    pub url: Option<String>,
    pub search_engine: String,
    pub total_results: i64,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Saves one position observation, updating in place on repeat submission.
///
/// At most one row exists per `(project_id, keyword_id, check_date,
/// search_engine)`. A conflicting write overwrites `position`, `url`,
/// `total_results`, and `check_time`; `session_id` is only overwritten when
/// the new value is non-null, so a session-less retry never erases a
/// previously recorded session. Returns the id of the (possibly pre-existing)
/// row.
///
/// `position = None` records that the tracked domain was not found within the
/// inspected result window.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
#[allow(clippy::too_many_arguments)] // mirrors the observation's full column set; no sensible grouping
pub async fn save_position(
    pool: &PgPool,
    project_id: i64,
    keyword_id: i64,
    session_id: Option<i64>,
    check_date: NaiveDate,
    check_time: NaiveTime,
    position: Option<i32>,
    url: Option<&str>,
    total_results: i64,
    search_engine: &str,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO positions \
             (project_id, keyword_id, session_id, check_date, check_time, \
              position, url, total_results, search_engine) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (project_id, keyword_id, check_date, search_engine) DO UPDATE SET \
             position      = EXCLUDED.position, \
             url           = EXCLUDED.url, \
             total_results = EXCLUDED.total_results, \
             check_time    = EXCLUDED.check_time, \
             session_id    = COALESCE(EXCLUDED.session_id, positions.session_id) \
         RETURNING id",
    )
    .bind(project_id)
    .bind(keyword_id)
    .bind(session_id)
    .bind(check_date)
    .bind(check_time)
    .bind(position)
    .bind(url)
    .bind(total_results)
    .bind(search_engine)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns a domain's position observations from the last `days` days.
///
/// Ordered newest-first by `(check_date, check_time)`, then by keyword for a
/// stable layout within one check run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_position_history(
    pool: &PgPool,
    domain: &str,
    days: i32,
) -> Result<Vec<PositionHistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, PositionHistoryRow>(
        "SELECT p.check_date, p.check_time, k.keyword, p.position, p.url, \
                p.search_engine, p.total_results, p.session_id \
         FROM positions p \
         JOIN keywords k ON p.keyword_id = k.id \
         JOIN projects pr ON p.project_id = pr.id \
         WHERE pr.domain = $1 \
           AND p.check_date >= CURRENT_DATE - $2 \
         ORDER BY p.check_date DESC, p.check_time DESC, k.keyword",
    )
    .bind(domain)
    .bind(days)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every position observation recorded under a monitoring session.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_session_positions(
    pool: &PgPool,
    session_id: i64,
) -> Result<Vec<SessionPositionRow>, DbError> {
    let rows = sqlx::query_as::<_, SessionPositionRow>(
        "SELECT p.check_date, p.check_time, k.keyword, p.position, p.url, \
                p.search_engine, p.total_results \
         FROM positions p \
         JOIN keywords k ON p.keyword_id = k.id \
         WHERE p.session_id = $1 \
         ORDER BY p.check_time, k.keyword",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
