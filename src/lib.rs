//! # playlist-dl
//!
//! Turn a Spotify playlist, album or track into local audio files.
//!
//! For every track behind the submitted reference, playlist-dl builds a search query from the
//! track's title and artists, finds the best-matching YouTube video and extracts its audio into
//! a local directory with `yt-dlp`. A small web front end accepts the reference and shows the
//! diagnostic text produced along the way.
//!
//! ## Stages
//!
//! - [`extractor`] - reference → ordered [`TrackQuery`] list ([`SpotifyExtractor`])
//! - [`resolver`] - query → [`ResourceLocator`] (yt-dlp search or the YouTube Data API)
//! - [`fetcher`] - locator → audio file on disk ([`YtDlpFetcher`])
//! - [`pipeline`] - runs the three in order for one reference
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_dl::{Config, Diagnostics, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.spotify.client_id = Some("client-id".to_string());
//!     config.spotify.client_secret = Some("client-secret".to_string());
//!
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let diagnostics = Diagnostics::new();
//!     let report = pipeline
//!         .run("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M", &diagnostics)
//!         .await;
//!
//!     println!("{}", diagnostics.text());
//!     println!("saved {} file(s)", report.fetched_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP front end and JSON API
pub mod api;
/// Configuration types
pub mod config;
/// Request-scoped diagnostic text
pub mod diagnostics;
/// Error types
pub mod error;
/// Metadata extraction from catalog references
pub mod extractor;
/// Audio fetching
pub mod fetcher;
/// Stage orchestration
pub mod pipeline;
/// Query resolution
pub mod resolver;
/// External tool discovery
pub mod tools;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, FailurePolicy, SearchBackend};
pub use diagnostics::Diagnostics;
pub use error::{
    ApiError, Error, ErrorDetail, ExtractError, FetchError, ResolveError, Result, ToHttpStatus,
};
pub use extractor::{MetadataExtractor, SpotifyExtractor};
pub use fetcher::{ContentFetcher, YtDlpFetcher};
pub use pipeline::Pipeline;
pub use resolver::{ResourceResolver, YouTubeApiResolver, YtDlpResolver};
pub use tools::YtDlp;
pub use types::{
    FetchedFile, ItemOutcome, PipelineReport, ResourceLocator, SourceKind, SourceReference,
    Stage, StageFailure, TrackQuery,
};

/// Run the HTTP server until SIGTERM or SIGINT (Ctrl+C on other platforms)
///
/// # Example
///
/// ```no_run
/// use playlist_dl::{Config, Pipeline, serve_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let pipeline = Pipeline::from_config(&config)?;
///
///     serve_with_shutdown(pipeline, config).await?;
///     Ok(())
/// }
/// ```
pub async fn serve_with_shutdown(pipeline: Pipeline, config: Config) -> Result<()> {
    api::start_api_server(
        std::sync::Arc::new(pipeline),
        std::sync::Arc::new(config),
        wait_for_signal(),
    )
    .await
}

/// Resolve once a termination signal arrives
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Resolve once a termination signal arrives
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
