//! Database operations for the `competitors` table.

use chrono::{NaiveDate, NaiveTime};
use serpwatch_core::CompetitorEntry;
use sqlx::PgPool;

use crate::domains::record_domain_appearance;
use crate::DbError;

const MAX_TITLE_CHARS: usize = 500;
const MAX_SNIPPET_CHARS: usize = 1000;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Counts returned by [`save_competitors`]: newly inserted rows, rows ignored
/// as exact duplicates, and entries skipped during validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompetitorWriteSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// One competitor observation on a given date, joined with its keyword text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompetitorForDateRow {
    pub check_date: NaiveDate,
    pub keyword: String,
    pub competitor_domain: String,
    pub competitor_position: i32,
    pub competitor_url: Option<String>,
    pub competitor_title: Option<String>,
    pub session_id: Option<i64>,
}

/// Aggregate ranking of a competitor domain across all of a project's checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopCompetitorRow {
    pub domain: String,
    pub appearances: i64,
    pub best_position: i32,
    pub avg_position: f64,
    pub category: Option<String>,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Saves a batch of competitor observations for one keyword check.
///
/// Entries with a blank domain or a position outside `1..=100` are skipped
/// and counted, not reported as errors. Duplicate rows per the uniqueness key
/// `(project_id, keyword_id, check_date, check_time, competitor_domain,
/// competitor_position)` are silently ignored so retried ingestion stays
/// side-effect-free. Each genuinely new row also feeds the running aggregate
/// in `domains`. Titles are truncated to 500 characters and snippets to 1000.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if an insert or the domain reference update
/// fails.
pub async fn save_competitors(
    pool: &PgPool,
    project_id: i64,
    keyword_id: i64,
    session_id: Option<i64>,
    check_date: NaiveDate,
    check_time: NaiveTime,
    competitors: &[CompetitorEntry],
) -> Result<CompetitorWriteSummary, DbError> {
    let mut summary = CompetitorWriteSummary::default();

    for entry in competitors {
        if entry.domain.trim().is_empty() || !(1..=100).contains(&entry.position) {
            tracing::warn!(
                domain = %entry.domain,
                position = entry.position,
                "skipping competitor entry with missing domain or out-of-range position"
            );
            summary.skipped += 1;
            continue;
        }

        let title: String = entry.title.chars().take(MAX_TITLE_CHARS).collect();
        let snippet: String = entry.snippet.chars().take(MAX_SNIPPET_CHARS).collect();

        let rows_affected = sqlx::query(
            "INSERT INTO competitors \
                 (project_id, keyword_id, session_id, check_date, check_time, \
                  competitor_domain, competitor_position, competitor_url, \
                  competitor_title, competitor_snippet) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (project_id, keyword_id, check_date, check_time, \
                          competitor_domain, competitor_position) DO NOTHING",
        )
        .bind(project_id)
        .bind(keyword_id)
        .bind(session_id)
        .bind(check_date)
        .bind(check_time)
        .bind(&entry.domain)
        .bind(entry.position)
        .bind(&entry.url)
        .bind(title)
        .bind(snippet)
        .execute(pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            summary.duplicates += 1;
            continue;
        }

        summary.inserted += 1;
        record_domain_appearance(pool, &entry.domain, check_date, entry.position).await?;
    }

    Ok(summary)
}

/// Returns the competitors observed for a domain's keywords on one date,
/// optionally narrowed to a single keyword.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_competitors_for_date(
    pool: &PgPool,
    domain: &str,
    check_date: NaiveDate,
    keyword: Option<&str>,
) -> Result<Vec<CompetitorForDateRow>, DbError> {
    let rows = sqlx::query_as::<_, CompetitorForDateRow>(
        "SELECT c.check_date, k.keyword, c.competitor_domain, c.competitor_position, \
                c.competitor_url, c.competitor_title, c.session_id \
         FROM competitors c \
         JOIN keywords k ON c.keyword_id = k.id \
         JOIN projects pr ON c.project_id = pr.id \
         WHERE pr.domain = $1 AND c.check_date = $2 \
           AND ($3::TEXT IS NULL OR k.keyword = $3) \
         ORDER BY k.keyword, c.competitor_position",
    )
    .bind(domain)
    .bind(check_date)
    .bind(keyword)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a project's most frequently seen competitor domains.
///
/// Ranked by appearance count, then by average position. Joined against the
/// `domains` reference for category and first/last-seen dates where known.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_top_competitors(
    pool: &PgPool,
    domain: &str,
    limit: i64,
) -> Result<Vec<TopCompetitorRow>, DbError> {
    let rows = sqlx::query_as::<_, TopCompetitorRow>(
        "SELECT c.competitor_domain AS domain, \
                COUNT(*) AS appearances, \
                MIN(c.competitor_position) AS best_position, \
                AVG(c.competitor_position)::DOUBLE PRECISION AS avg_position, \
                d.category, d.first_seen, d.last_seen \
         FROM competitors c \
         JOIN projects pr ON c.project_id = pr.id \
         LEFT JOIN domains d ON c.competitor_domain = d.domain \
         WHERE pr.domain = $1 \
         GROUP BY c.competitor_domain, d.category, d.first_seen, d.last_seen \
         ORDER BY appearances DESC, avg_position ASC \
         LIMIT $2",
    )
    .bind(domain)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
