//! Contract for the external position-source collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{FetchOptions, FetchedPosition};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream source error: {0}")]
    Upstream(String),
    #[error("source response could not be interpreted: {0}")]
    Malformed(String),
}

/// A provider of ranked search results for a `(domain, keyword)` pair.
///
/// Implementations live outside this workspace (HTTP/XML clients, fixtures).
/// The collector treats a returned `Err` the same as a result whose `error`
/// field is set: the keyword is recorded as a miss, never as a batch failure.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetches the ranked-result view for one keyword.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the upstream call fails or its response
    /// cannot be interpreted.
    async fn fetch_position(
        &self,
        domain: &str,
        keyword: &str,
        options: &FetchOptions,
    ) -> Result<FetchedPosition, SourceError>;
}
