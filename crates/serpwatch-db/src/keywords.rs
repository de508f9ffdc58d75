//! Database operations for the `keywords` table.

use sqlx::PgPool;

use crate::DbError;

/// Resolves a keyword under a project, creating it on first sight.
///
/// The natural key is `(project_id, keyword)`. Re-submitting a soft-deactivated
/// keyword reactivates the existing row instead of duplicating it. Returns the
/// internal id either way.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails, including when `project_id`
/// references no project.
pub async fn resolve_keyword(pool: &PgPool, project_id: i64, keyword: &str) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO keywords (project_id, keyword) \
         VALUES ($1, $2) \
         ON CONFLICT (project_id, keyword) DO UPDATE SET \
             is_active  = TRUE, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(project_id)
    .bind(keyword)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Soft-deactivates a keyword by setting `is_active = false`.
///
/// The row and its observations stay in place; a later
/// [`resolve_keyword`] for the same text reactivates it.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no keyword exists with the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn deactivate_keyword(pool: &PgPool, keyword_id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE keywords \
         SET is_active = false, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(keyword_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
