//! Database operations for the `domains` reference table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `domains` table: the cross-project running aggregate for a
/// competitor domain.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DomainRow {
    pub id: i64,
    pub domain: String,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub total_appearances: i32,
    pub avg_position: f64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Folds one sighting of a competitor domain into its running aggregate.
///
/// First sight inserts with `total_appearances = 1` and `avg_position =
/// position`; afterwards the average is recomputed as
/// `(avg * n + position) / (n + 1)` and `last_seen` advances. The whole
/// read-modify-write happens inside one `ON CONFLICT` arm, so concurrent
/// sightings never lose an appearance.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn record_domain_appearance(
    pool: &PgPool,
    domain: &str,
    seen_date: NaiveDate,
    position: i32,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO domains (domain, first_seen, last_seen, total_appearances, avg_position) \
         VALUES ($1, $2, $2, 1, $3) \
         ON CONFLICT (domain) DO UPDATE SET \
             avg_position      = (domains.avg_position * domains.total_appearances \
                                  + EXCLUDED.avg_position) \
                                 / (domains.total_appearances + 1), \
             total_appearances = domains.total_appearances + 1, \
             last_seen         = EXCLUDED.last_seen, \
             updated_at        = NOW()",
    )
    .bind(domain)
    .bind(seen_date)
    .bind(f64::from(position))
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the reference aggregate for a domain, or `None` if never seen.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_domain_reference(pool: &PgPool, domain: &str) -> Result<Option<DomainRow>, DbError> {
    let row = sqlx::query_as::<_, DomainRow>(
        "SELECT id, domain, first_seen, last_seen, total_appearances, avg_position, \
                category, created_at, updated_at \
         FROM domains \
         WHERE domain = $1",
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
