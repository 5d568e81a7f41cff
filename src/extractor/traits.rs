//! Trait for deriving search queries from an input reference

use crate::diagnostics::Diagnostics;
use crate::types::TrackQuery;
use async_trait::async_trait;

/// Turns a playlist, album or track reference into one query per track
///
/// Implementations are stateless between calls: any credentials or tokens needed to talk
/// to the catalog are obtained inside [`extract`](MetadataExtractor::extract).
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Derive queries for every track behind `input`, in source order
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is malformed or the catalog is unreachable.
    /// Nothing is retried.
    async fn extract(&self, input: &str, diagnostics: &Diagnostics)
    -> crate::Result<Vec<TrackQuery>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
