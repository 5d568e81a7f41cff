//! Stage implementations written against the public traits

use async_trait::async_trait;
use playlist_dl::{
    ContentFetcher, Diagnostics, FetchedFile, MetadataExtractor, ResolveError, ResourceLocator,
    ResourceResolver, TrackQuery,
};
use std::path::Path;
use std::sync::Mutex;

/// Splits the input on ';' into queries
pub struct ListExtractor;

#[async_trait]
impl MetadataExtractor for ListExtractor {
    async fn extract(
        &self,
        input: &str,
        diagnostics: &Diagnostics,
    ) -> playlist_dl::Result<Vec<TrackQuery>> {
        let queries: Vec<TrackQuery> = input
            .split(';')
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(TrackQuery::from)
            .collect();
        diagnostics.line(format!("Listed {} track(s)", queries.len()));
        Ok(queries)
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

/// Resolves every query except ones starting with "?"
pub struct PrefixResolver;

#[async_trait]
impl ResourceResolver for PrefixResolver {
    async fn resolve(
        &self,
        query: &TrackQuery,
        _diagnostics: &Diagnostics,
    ) -> playlist_dl::Result<ResourceLocator> {
        if query.as_str().starts_with('?') {
            return Err(ResolveError::NoMatch {
                query: query.to_string(),
            }
            .into());
        }
        Ok(ResourceLocator::youtube(&query.as_str().replace(' ', "_")))
    }

    fn name(&self) -> &'static str {
        "prefix"
    }
}

/// Remembers fetched locators without touching the filesystem
#[derive(Default)]
pub struct MemoryFetcher {
    pub fetched: Mutex<Vec<String>>,
}

#[async_trait]
impl ContentFetcher for MemoryFetcher {
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        destination: &Path,
        _diagnostics: &Diagnostics,
    ) -> playlist_dl::Result<FetchedFile> {
        self.fetched.lock().unwrap().push(locator.to_string());
        Ok(FetchedFile {
            path: destination.join("memory.mp3"),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
