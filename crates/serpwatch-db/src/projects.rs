//! Database operations for the `projects` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `projects` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Resolves a project by domain, creating it on first sight.
///
/// The domain is the natural key. An existing row gets its `name` overwritten
/// in place; the domain itself is never changed here. Returns the internal id
/// either way.
///
/// # Errors
///
/// Returns [`DbError::InvalidArgument`] if `domain` is empty or whitespace
/// (nothing is written), or [`DbError::Sqlx`] if the upsert fails.
pub async fn resolve_project(pool: &PgPool, name: &str, domain: &str) -> Result<i64, DbError> {
    if domain.trim().is_empty() {
        return Err(DbError::InvalidArgument(
            "project domain must not be empty".to_string(),
        ));
    }

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO projects (name, domain) \
         VALUES ($1, $2) \
         ON CONFLICT (domain) DO UPDATE SET \
             name       = EXCLUDED.name, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(name)
    .bind(domain)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns the project keyed by `domain`, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_project_by_domain(
    pool: &PgPool,
    domain: &str,
) -> Result<Option<ProjectRow>, DbError> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, domain, created_at, updated_at \
         FROM projects \
         WHERE domain = $1",
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
