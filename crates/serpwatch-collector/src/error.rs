use thiserror::Error;

/// Errors that abort a whole check batch.
///
/// Per-keyword fetch and storage failures never surface here; they are folded
/// into [`crate::KeywordOutcome::Failed`] entries instead.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Project resolution, session bookkeeping, or another batch-level
    /// database operation failed.
    #[error("database error: {0}")]
    Db(#[from] serpwatch_db::DbError),
}
