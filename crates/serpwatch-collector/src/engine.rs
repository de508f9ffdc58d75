//! Keyword check orchestration: fetch, persist, snapshot.
//!
//! Per-keyword fetch and storage failures are logged and folded into the
//! returned outcome list rather than propagated, so a single bad keyword
//! does not abort the batch.

use chrono::{NaiveDate, NaiveTime, Utc};
use serpwatch_core::{CompetitorEntry, FetchOptions, FetchedPosition, PositionSource};
use serpwatch_db::{DbError, SessionRow};
use sqlx::PgPool;

use crate::{CollectError, CollectorConfig, KeywordCheck, KeywordOutcome};

/// Runs keyword checks against a position source and persists the results.
pub struct Collector<S> {
    pool: PgPool,
    source: S,
    config: CollectorConfig,
}

impl<S: PositionSource> Collector<S> {
    #[must_use]
    pub fn new(pool: PgPool, source: S, config: CollectorConfig) -> Self {
        Self {
            pool,
            source,
            config,
        }
    }

    /// Checks a batch of keywords for one project, one source call each.
    ///
    /// The project is resolved (created or updated) once up front. When
    /// `session_id` names a session of this project, every observation in the
    /// batch is stamped with that session's start date and time; an unknown
    /// or foreign session id is logged and the batch proceeds without
    /// session correlation. Without a session each keyword is stamped at the
    /// moment it is processed.
    ///
    /// Source failures are recorded as not-found observations carrying the
    /// error text. Storage failures yield a [`KeywordOutcome::Failed`] entry
    /// and the loop continues with the next keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Db`] if the project cannot be resolved (for
    /// example a blank domain) or the session probe itself fails.
    pub async fn check_keywords(
        &self,
        project_name: &str,
        domain: &str,
        keywords: &[String],
        session_id: Option<i64>,
    ) -> Result<Vec<KeywordOutcome>, CollectError> {
        let project_id = serpwatch_db::resolve_project(&self.pool, project_name, domain).await?;
        let session = self.resolve_session(project_id, session_id).await?;
        Ok(self
            .run_batch(project_id, domain, keywords, session.as_ref())
            .await)
    }

    /// Checks a batch of keywords under a freshly created monitoring session.
    ///
    /// Creates the session, runs the batch with it, then completes the
    /// session with `total = keywords.len()` and `completed` counting the
    /// outcomes that found a position. If completing fails, the session is
    /// marked failed on a best-effort basis before the error propagates.
    /// Returns the outcomes together with the session id.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Db`] if the project cannot be resolved or the
    /// session cannot be created or completed.
    pub async fn check_keywords_with_session(
        &self,
        project_name: &str,
        domain: &str,
        keywords: &[String],
        session_name: Option<&str>,
    ) -> Result<(Vec<KeywordOutcome>, i64), CollectError> {
        let project_id = serpwatch_db::resolve_project(&self.pool, project_name, domain).await?;
        let session =
            serpwatch_db::create_monitoring_session(&self.pool, project_id, session_name).await?;

        let outcomes = self
            .run_batch(project_id, domain, keywords, Some(&session))
            .await;

        let total = i32::try_from(keywords.len()).unwrap_or(i32::MAX);
        let completed = i32::try_from(
            outcomes
                .iter()
                .filter(|outcome| outcome.has_position())
                .count(),
        )
        .unwrap_or(i32::MAX);

        if let Err(e) = serpwatch_db::complete_monitoring_session(
            &self.pool,
            session.session_id,
            Some(total),
            Some(completed),
        )
        .await
        {
            fail_session_best_effort(&self.pool, session.session_id, &e.to_string()).await;
            return Err(e.into());
        }
        tracing::info!(
            session_id = session.session_id,
            total,
            completed,
            "monitoring session completed"
        );

        Ok((outcomes, session.session_id))
    }

    /// Validates a caller-supplied session id against the project.
    async fn resolve_session(
        &self,
        project_id: i64,
        session_id: Option<i64>,
    ) -> Result<Option<SessionRow>, CollectError> {
        let Some(id) = session_id else {
            return Ok(None);
        };
        let session = serpwatch_db::get_session_for_project(&self.pool, id, project_id).await?;
        if session.is_none() {
            tracing::warn!(
                session_id = id,
                project_id,
                "session not found for this project; continuing without session correlation"
            );
        }
        Ok(session)
    }

    async fn run_batch(
        &self,
        project_id: i64,
        domain: &str,
        keywords: &[String],
        session: Option<&SessionRow>,
    ) -> Vec<KeywordOutcome> {
        let options = FetchOptions {
            search_engine: self.config.search_engine.clone(),
            include_competitors: self.config.track_competitors,
            competitors_limit: self.config.competitors_limit,
        };
        // All observations of a session share its start timestamp, so reruns
        // during one session land on the same upsert key.
        let shared_stamp = session.map(|s| (s.start_time.date_naive(), s.start_time.time()));
        let session_id = session.map(|s| s.session_id);

        let mut outcomes = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let (check_date, check_time) = shared_stamp.unwrap_or_else(|| {
                let now = Utc::now();
                (now.date_naive(), now.time())
            });

            let fetched = match self.source.fetch_position(domain, keyword, &options).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!(
                        keyword = %keyword,
                        error = %e,
                        "position source failed; recording the check as not found"
                    );
                    FetchedPosition::failure(e.to_string())
                }
            };

            match self
                .record_check(
                    project_id,
                    session_id,
                    keyword,
                    check_date,
                    check_time,
                    &fetched,
                )
                .await
            {
                Ok(check) => {
                    tracing::debug!(
                        keyword = %keyword,
                        position = ?check.position,
                        "keyword check persisted"
                    );
                    outcomes.push(KeywordOutcome::Saved(check));
                }
                Err(e) => {
                    tracing::error!(
                        keyword = %keyword,
                        error = %e,
                        "failed to persist keyword check"
                    );
                    outcomes.push(KeywordOutcome::Failed {
                        keyword: keyword.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcomes
    }

    /// Persists one keyword's observation, competitors, and snapshot.
    ///
    /// The snapshot is fed from the capped competitor list as delivered,
    /// sorted ascending by position and cut to the first ten entries.
    async fn record_check(
        &self,
        project_id: i64,
        session_id: Option<i64>,
        keyword: &str,
        check_date: NaiveDate,
        check_time: NaiveTime,
        fetched: &FetchedPosition,
    ) -> Result<KeywordCheck, DbError> {
        let keyword_id = serpwatch_db::resolve_keyword(&self.pool, project_id, keyword).await?;
        serpwatch_db::save_position(
            &self.pool,
            project_id,
            keyword_id,
            session_id,
            check_date,
            check_time,
            fetched.position,
            fetched.url.as_deref(),
            fetched.total_results,
            &self.config.search_engine,
        )
        .await?;

        let mut competitors_recorded = 0;
        let mut snapshot_changed = None;
        if self.config.track_competitors && !fetched.competitors.is_empty() {
            let cap = fetched.competitors.len().min(self.config.competitors_limit);
            let capped = &fetched.competitors[..cap];

            let summary = serpwatch_db::save_competitors(
                &self.pool,
                project_id,
                keyword_id,
                session_id,
                check_date,
                check_time,
                capped,
            )
            .await?;
            competitors_recorded = summary.inserted;

            let mut top_10: Vec<CompetitorEntry> = capped.to_vec();
            top_10.sort_by_key(|entry| entry.position);
            top_10.truncate(10);
            snapshot_changed = Some(
                serpwatch_db::save_snapshot_if_changed(
                    &self.pool,
                    project_id,
                    keyword_id,
                    check_date,
                    &top_10,
                )
                .await?,
            );
        }

        Ok(KeywordCheck {
            keyword: keyword.to_string(),
            position: fetched.position,
            url: fetched.url.clone(),
            found: fetched.found,
            total_results: fetched.total_results,
            competitors_recorded,
            snapshot_changed,
            error: fetched.error.clone(),
        })
    }
}

/// Attempt to mark a monitoring session as failed, logging any secondary
/// error so the original failure stays the one reported to the caller.
pub async fn fail_session_best_effort(pool: &PgPool, session_id: i64, message: &str) {
    if let Err(mark_err) = serpwatch_db::fail_monitoring_session(pool, session_id, message).await {
        tracing::error!(
            session_id,
            error = %mark_err,
            "failed to mark monitoring session as failed"
        );
    }
}
