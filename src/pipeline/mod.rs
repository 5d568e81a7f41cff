//! Pipeline orchestration
//!
//! [`Pipeline`] drives the three stages for one input reference:
//!
//! ```text
//! extract ──► [ resolve ──► fetch ] for each query, in source order
//! ```
//!
//! Stages run strictly one after another on the calling task. Each stage returns a
//! `Result`; the orchestrator turns failures into [`ItemOutcome::Failed`] entries and then
//! either stops ([`FailurePolicy::Abort`]) or moves on to the next query
//! ([`FailurePolicy::Skip`]).

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::config::{Config, FailurePolicy, SearchBackend};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::extractor::{MetadataExtractor, SpotifyExtractor};
use crate::fetcher::{ContentFetcher, YtDlpFetcher};
use crate::resolver::{ResourceResolver, YouTubeApiResolver, YtDlpResolver};
use crate::tools::YtDlp;
use crate::types::{ItemOutcome, PipelineReport, ResourceLocator, Stage, StageFailure, TrackQuery};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sequential extract → resolve → fetch pipeline (cloneable - all stages are Arc-wrapped)
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn MetadataExtractor>,
    resolver: Arc<dyn ResourceResolver>,
    fetcher: Arc<dyn ContentFetcher>,
    download_dir: PathBuf,
    policy: FailurePolicy,
}

impl Pipeline {
    /// Assemble a pipeline from explicit stages
    ///
    /// The failure policy starts as [`FailurePolicy::Abort`].
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        resolver: Arc<dyn ResourceResolver>,
        fetcher: Arc<dyn ContentFetcher>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            resolver,
            fetcher,
            download_dir: download_dir.into(),
            policy: FailurePolicy::default(),
        }
    }

    /// Change what happens when one item fails
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the production pipeline described by `config`
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or yt-dlp cannot be located.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let ytdlp = YtDlp::discover(&config.tools)?;
        tracing::info!(binary = %ytdlp.binary_path().display(), "using yt-dlp");

        let extractor: Arc<dyn MetadataExtractor> =
            Arc::new(SpotifyExtractor::new(&config.spotify)?);
        let resolver: Arc<dyn ResourceResolver> = match config.search.backend {
            SearchBackend::YtDlp => Arc::new(YtDlpResolver::new(ytdlp.clone())),
            SearchBackend::YoutubeApi => Arc::new(YouTubeApiResolver::new(&config.search)?),
        };
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(YtDlpFetcher::new(
            ytdlp,
            config.download.audio_format.clone(),
        ));

        tracing::info!(
            extractor = extractor.name(),
            resolver = resolver.name(),
            fetcher = fetcher.name(),
            download_dir = %config.download_dir().display(),
            policy = ?config.pipeline.on_failure,
            "pipeline initialized"
        );

        Ok(Self::new(extractor, resolver, fetcher, config.download_dir())
            .with_failure_policy(config.pipeline.on_failure))
    }

    /// Destination directory for fetched files
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Current failure policy
    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Process one input reference end to end
    ///
    /// Never panics on stage failures: every failure is recorded in the returned report and
    /// as a diagnostic line.
    pub async fn run(&self, input: &str, diagnostics: &Diagnostics) -> PipelineReport {
        let started_at = Utc::now();
        tracing::info!(input = %input, "pipeline started");

        let queries = match self.extractor.extract(input, diagnostics).await {
            Ok(queries) => queries,
            Err(e) => {
                diagnostics.warn(format!("Could not read tracks: {e}"));
                tracing::warn!(input = %input, error = %e, "extraction failed");
                return PipelineReport {
                    input: input.to_string(),
                    queries: Vec::new(),
                    items: Vec::new(),
                    extraction_failure: Some(StageFailure::new(Stage::Extract, &e)),
                    aborted: true,
                    started_at,
                    finished_at: Utc::now(),
                };
            }
        };

        let total = queries.len();
        let mut items = Vec::with_capacity(total);
        let mut aborted = false;

        for (index, query) in queries.iter().enumerate() {
            let position = index + 1;
            diagnostics.line(format!("[{position}/{total}] {query}"));

            let outcome = self.process_item(position, query, diagnostics).await;
            let failed = !outcome.is_fetched();
            items.push(outcome);

            if failed && self.policy == FailurePolicy::Abort {
                let remaining = total - position;
                if remaining > 0 {
                    diagnostics.warn(format!(
                        "Stopping: {remaining} remaining track(s) not attempted"
                    ));
                    aborted = true;
                }
                break;
            }
        }

        let report = PipelineReport {
            input: input.to_string(),
            queries,
            items,
            extraction_failure: None,
            aborted,
            started_at,
            finished_at: Utc::now(),
        };

        diagnostics.line(format!(
            "Done: {}/{} track(s) saved to {}",
            report.fetched_count(),
            total,
            self.download_dir.display()
        ));
        tracing::info!(
            input = %input,
            fetched = report.fetched_count(),
            total,
            aborted,
            "pipeline finished"
        );
        report
    }

    async fn process_item(
        &self,
        position: usize,
        query: &TrackQuery,
        diagnostics: &Diagnostics,
    ) -> ItemOutcome {
        let locator = match self.resolver.resolve(query, diagnostics).await {
            Ok(locator) => locator,
            Err(e) => return failed(position, query, None, Stage::Resolve, &e, diagnostics),
        };
        diagnostics.line(format!("Match: {locator}"));

        match self
            .fetcher
            .fetch(&locator, &self.download_dir, diagnostics)
            .await
        {
            Ok(file) => ItemOutcome::Fetched {
                position,
                query: query.clone(),
                locator,
                file,
            },
            Err(e) => failed(position, query, Some(locator), Stage::Fetch, &e, diagnostics),
        }
    }
}

fn failed(
    position: usize,
    query: &TrackQuery,
    locator: Option<ResourceLocator>,
    stage: Stage,
    error: &Error,
    diagnostics: &Diagnostics,
) -> ItemOutcome {
    diagnostics.warn(format!("Failed to {stage} \"{query}\": {error}"));
    tracing::warn!(position, query = %query, stage = %stage, error = %error, "item failed");
    ItemOutcome::Failed {
        position,
        query: query.clone(),
        locator,
        failure: StageFailure::new(stage, error),
    }
}
