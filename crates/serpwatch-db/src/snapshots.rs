//! Database operations for the `snapshots` table: top-10 change detection.

use chrono::{DateTime, NaiveDate, Utc};
use serpwatch_core::CompetitorEntry;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `snapshots` table.
///
/// `has_changes` reflects only the latest write: whether that write differed
/// from what the row held before it, not whether the snapshot ever changed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotRow {
    pub id: i64,
    pub project_id: i64,
    pub keyword_id: i64,
    pub snapshot_date: NaiveDate,
    pub top_10_json: String,
    pub previous_top_10_hash: String,
    pub has_changes: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Canonical form
// ---------------------------------------------------------------------------

/// Serializes a top-10 list to its canonical JSON text.
///
/// `CompetitorEntry`'s field order fixes the key order, and the entries are
/// kept in the order given, so two lists hash equal exactly when the same
/// domains sit at the same positions.
fn canonical_top_10_json(top_10: &[CompetitorEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(top_10)
}

fn content_hash(json: &str) -> String {
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Stores the top-10 snapshot for `(project_id, keyword_id, snapshot_date)`,
/// reporting whether the ranking changed since the last stored write.
///
/// A first write for the key always counts as a change. A repeat write with
/// an identical canonical hash only flips `has_changes` to `false`; a repeat
/// write with a different hash replaces the stored JSON/hash and sets
/// `has_changes = true`. Two writers racing on the first insert fall into the
/// conflict arm: the last writer's data persists and the call still reports a
/// change rather than failing.
///
/// # Errors
///
/// Returns [`DbError::Json`] if the list cannot be serialized, or
/// [`DbError::Sqlx`] if a statement fails.
pub async fn save_snapshot_if_changed(
    pool: &PgPool,
    project_id: i64,
    keyword_id: i64,
    snapshot_date: NaiveDate,
    top_10: &[CompetitorEntry],
) -> Result<bool, DbError> {
    let top_10_json = canonical_top_10_json(top_10)?;
    let current_hash = content_hash(&top_10_json);

    let existing = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, previous_top_10_hash \
         FROM snapshots \
         WHERE project_id = $1 AND keyword_id = $2 AND snapshot_date = $3",
    )
    .bind(project_id)
    .bind(keyword_id)
    .bind(snapshot_date)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some((id, previous_hash)) => {
            if previous_hash == current_hash {
                sqlx::query("UPDATE snapshots SET has_changes = FALSE WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(false)
            } else {
                sqlx::query(
                    "UPDATE snapshots \
                     SET top_10_json = $1, previous_top_10_hash = $2, has_changes = TRUE \
                     WHERE id = $3",
                )
                .bind(&top_10_json)
                .bind(&current_hash)
                .bind(id)
                .execute(pool)
                .await?;
                Ok(true)
            }
        }
        None => {
            // A concurrent writer may insert between the SELECT above and this
            // statement; the conflict arm keeps the call from failing and lets
            // the last writer's data persist.
            sqlx::query(
                "INSERT INTO snapshots \
                     (project_id, keyword_id, snapshot_date, top_10_json, \
                      previous_top_10_hash, has_changes) \
                 VALUES ($1, $2, $3, $4, $5, TRUE) \
                 ON CONFLICT (project_id, keyword_id, snapshot_date) DO UPDATE SET \
                     top_10_json          = EXCLUDED.top_10_json, \
                     previous_top_10_hash = EXCLUDED.previous_top_10_hash, \
                     has_changes          = TRUE",
            )
            .bind(project_id)
            .bind(keyword_id)
            .bind(snapshot_date)
            .bind(&top_10_json)
            .bind(&current_hash)
            .execute(pool)
            .await?;
            Ok(true)
        }
    }
}

/// Returns the stored snapshot for `(project_id, keyword_id, snapshot_date)`,
/// or `None` if never written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_snapshot(
    pool: &PgPool,
    project_id: i64,
    keyword_id: i64,
    snapshot_date: NaiveDate,
) -> Result<Option<SnapshotRow>, DbError> {
    let row = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, project_id, keyword_id, snapshot_date, top_10_json, \
                previous_top_10_hash, has_changes, created_at \
         FROM snapshots \
         WHERE project_id = $1 AND keyword_id = $2 AND snapshot_date = $3",
    )
    .bind(project_id)
    .bind(keyword_id)
    .bind(snapshot_date)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
