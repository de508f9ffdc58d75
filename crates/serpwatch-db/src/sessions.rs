//! Database operations for the `monitoring_sessions` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `monitoring_sessions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub session_id: i64,
    pub public_id: Uuid,
    pub project_id: i64,
    pub session_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub total_keywords: Option<i32>,
    pub completed_keywords: Option<i32>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Creates a new monitoring session in `running` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. The session's
/// `start_time` defaults to `NOW()` and becomes the shared timestamp for
/// every observation recorded under this session. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn create_monitoring_session(
    pool: &PgPool,
    project_id: i64,
    session_name: Option<&str>,
) -> Result<SessionRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, SessionRow>(
        "INSERT INTO monitoring_sessions (public_id, project_id, session_name) \
         VALUES ($1, $2, $3) \
         RETURNING session_id, public_id, project_id, session_name, start_time, end_time, \
                   status, total_keywords, completed_keywords, error_message, created_at",
    )
    .bind(public_id)
    .bind(project_id)
    .bind(session_name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a session as `completed`, sets `end_time = NOW()` and the keyword counts.
///
/// A `None` count preserves whatever the column already holds.
///
/// # Errors
///
/// Returns [`DbError::InvalidSessionTransition`] if the session is not in
/// `running` status, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_monitoring_session(
    pool: &PgPool,
    session_id: i64,
    total_keywords: Option<i32>,
    completed_keywords: Option<i32>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE monitoring_sessions \
         SET status = 'completed', end_time = NOW(), \
             total_keywords     = COALESCE($1, total_keywords), \
             completed_keywords = COALESCE($2, completed_keywords) \
         WHERE session_id = $3 AND status = 'running'",
    )
    .bind(total_keywords)
    .bind(completed_keywords)
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidSessionTransition {
            id: session_id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a session as `failed`, sets `end_time = NOW()` and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidSessionTransition`] if the session is not in
/// `running` status, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_monitoring_session(
    pool: &PgPool,
    session_id: i64,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE monitoring_sessions \
         SET status = 'failed', end_time = NOW(), error_message = $1 \
         WHERE session_id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidSessionTransition {
            id: session_id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single session by its internal id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_monitoring_session(pool: &PgPool, session_id: i64) -> Result<SessionRow, DbError> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT session_id, public_id, project_id, session_name, start_time, end_time, \
                status, total_keywords, completed_keywords, error_message, created_at \
         FROM monitoring_sessions \
         WHERE session_id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Fetches a session only if it belongs to the given project.
///
/// Used by ingestion to validate a caller-supplied session id before trusting
/// its timestamp; a missing or foreign session returns `None` so the caller
/// can fall back to session-less mode.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_session_for_project(
    pool: &PgPool,
    session_id: i64,
    project_id: i64,
) -> Result<Option<SessionRow>, DbError> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT session_id, public_id, project_id, session_name, start_time, end_time, \
                status, total_keywords, completed_keywords, error_message, created_at \
         FROM monitoring_sessions \
         WHERE session_id = $1 AND project_id = $2",
    )
    .bind(session_id)
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the most recently started session for a project, if any.
///
/// Ordered by `start_time DESC, session_id DESC` so the result is stable even
/// when two sessions share a start timestamp.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_session(
    pool: &PgPool,
    project_id: i64,
) -> Result<Option<SessionRow>, DbError> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT session_id, public_id, project_id, session_name, start_time, end_time, \
                status, total_keywords, completed_keywords, error_message, created_at \
         FROM monitoring_sessions \
         WHERE project_id = $1 \
         ORDER BY start_time DESC, session_id DESC \
         LIMIT 1",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
