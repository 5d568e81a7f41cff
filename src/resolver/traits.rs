//! Trait for resolving a query to a single resource locator

use crate::diagnostics::Diagnostics;
use crate::types::{ResourceLocator, TrackQuery};
use async_trait::async_trait;

/// Finds the best-matching audio resource for a query
///
/// "Best" is whatever the backing search index ranks first; there is no tie-breaking or
/// caching beyond that.
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Resolve `query` to one resource locator
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoMatch`](crate::error::ResolveError::NoMatch) when the search
    /// is empty and [`ResolveError::Lookup`](crate::error::ResolveError::Lookup) when the
    /// search backend cannot be queried.
    async fn resolve(
        &self,
        query: &TrackQuery,
        diagnostics: &Diagnostics,
    ) -> crate::Result<ResourceLocator>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
