//! In-memory stage fakes shared by pipeline and API tests

use super::Pipeline;
use crate::diagnostics::Diagnostics;
use crate::error::{ExtractError, FetchError, ResolveError};
use crate::extractor::MetadataExtractor;
use crate::fetcher::ContentFetcher;
use crate::resolver::ResourceResolver;
use crate::types::{FetchedFile, ResourceLocator, TrackQuery};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed list of queries, or a fixed failure
pub(crate) struct FakeExtractor {
    queries: Option<Vec<TrackQuery>>,
    pub(crate) calls: AtomicUsize,
}

impl FakeExtractor {
    pub(crate) fn with_queries(queries: &[&str]) -> Self {
        Self {
            queries: Some(queries.iter().map(|q| TrackQuery::from(*q)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            queries: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataExtractor for FakeExtractor {
    async fn extract(
        &self,
        input: &str,
        diagnostics: &Diagnostics,
    ) -> crate::Result<Vec<TrackQuery>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.queries {
            Some(queries) => {
                diagnostics.line(format!("Found {} track(s)", queries.len()));
                Ok(queries.clone())
            }
            None => Err(ExtractError::InvalidReference {
                input: input.to_string(),
                reason: "not a catalog reference".to_string(),
            }
            .into()),
        }
    }

    fn name(&self) -> &'static str {
        "fake-extractor"
    }
}

/// Maps each query to `https://www.youtube.com/watch?v=<n>` by position of first sight,
/// except for queries listed as unmatched
pub(crate) struct FakeResolver {
    unmatched: Vec<String>,
    pub(crate) calls: AtomicUsize,
}

impl FakeResolver {
    pub(crate) fn new() -> Self {
        Self::failing_on(&[])
    }

    pub(crate) fn failing_on(unmatched: &[&str]) -> Self {
        Self {
            unmatched: unmatched.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ResourceResolver for FakeResolver {
    async fn resolve(
        &self,
        query: &TrackQuery,
        _diagnostics: &Diagnostics,
    ) -> crate::Result<ResourceLocator> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.unmatched.iter().any(|q| q == query.as_str()) {
            return Err(ResolveError::NoMatch {
                query: query.to_string(),
            }
            .into());
        }
        Ok(ResourceLocator::youtube(&format!("vid{n}")))
    }

    fn name(&self) -> &'static str {
        "fake-resolver"
    }
}

/// Records every locator it is asked to fetch, optionally failing for some of them
pub(crate) struct RecordingFetcher {
    failing: Vec<String>,
    pub(crate) fetched: Mutex<Vec<ResourceLocator>>,
}

impl RecordingFetcher {
    pub(crate) fn new() -> Self {
        Self::failing_on(&[])
    }

    pub(crate) fn failing_on(locators: &[&str]) -> Self {
        Self {
            failing: locators.iter().map(|s| s.to_string()).collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fetched(&self) -> Vec<ResourceLocator> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for RecordingFetcher {
    async fn fetch(
        &self,
        locator: &ResourceLocator,
        destination: &Path,
        _diagnostics: &Diagnostics,
    ) -> crate::Result<FetchedFile> {
        if self.failing.iter().any(|l| l == locator.as_str()) {
            return Err(FetchError::ToolFailed {
                locator: locator.to_string(),
                code: Some(1),
                stderr: "ERROR: Video unavailable".to_string(),
            }
            .into());
        }
        self.fetched.lock().unwrap().push(locator.clone());
        let id = locator.as_str().rsplit('=').next().unwrap_or_default();
        Ok(FetchedFile {
            path: destination.join(format!("{id}.mp3")),
        })
    }

    fn name(&self) -> &'static str {
        "recording-fetcher"
    }
}

/// Stage fakes plus the pipeline built from them
pub(crate) struct FakeStages {
    pub(crate) extractor: Arc<FakeExtractor>,
    pub(crate) resolver: Arc<FakeResolver>,
    pub(crate) fetcher: Arc<RecordingFetcher>,
    pub(crate) pipeline: Pipeline,
}

pub(crate) fn pipeline_with(
    extractor: FakeExtractor,
    resolver: FakeResolver,
    fetcher: RecordingFetcher,
) -> FakeStages {
    let extractor = Arc::new(extractor);
    let resolver = Arc::new(resolver);
    let fetcher = Arc::new(fetcher);
    let pipeline = Pipeline::new(
        extractor.clone(),
        resolver.clone(),
        fetcher.clone(),
        "/music",
    );
    FakeStages {
        extractor,
        resolver,
        fetcher,
        pipeline,
    }
}

/// Two tracks, both resolve and fetch
pub(crate) fn two_track_pipeline() -> FakeStages {
    pipeline_with(
        FakeExtractor::with_queries(&["Artist A - Song 1", "Artist B - Song 2"]),
        FakeResolver::new(),
        RecordingFetcher::new(),
    )
}
