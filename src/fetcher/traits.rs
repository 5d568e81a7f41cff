//! Trait for fetching and persisting audio content

use crate::diagnostics::Diagnostics;
use crate::types::{FetchedFile, ResourceLocator};
use async_trait::async_trait;
use std::path::Path;

/// Downloads the audio behind a resource locator into a directory
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `locator` and save it under `destination`
    ///
    /// The file name comes from the resource's own title metadata. No integrity check is
    /// performed and collisions are handled however the underlying mechanism handles them.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is unavailable or the directory is not writable.
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        destination: &Path,
        diagnostics: &Diagnostics,
    ) -> crate::Result<FetchedFile>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
