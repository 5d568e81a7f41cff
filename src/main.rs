//! playlist-dl server binary
//!
//! Loads configuration (TOML file, then environment, then flags), builds the pipeline and
//! serves the web front end until SIGTERM/SIGINT.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use playlist_dl::{Config, Pipeline, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Command-line arguments for playlist-dl
#[derive(Parser, Debug)]
#[command(name = "playlist-dl")]
#[command(about = "Download the audio of Spotify playlists, albums and tracks via YouTube")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "PLAYLIST_DL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.bind_address)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Directory audio files are saved to (overrides download.download_dir)
    #[arg(short, long)]
    download_dir: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!(path = %path.display(), "loading configuration file");
                Config::load(path)?
            }
            None => Config::default(),
        };

        config.apply_env()?;

        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(dir) = &self.download_dir {
            config.download.download_dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Log filter from `RUST_LOG` directives, falling back to INFO when none are given
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let dotenv = dotenvy::dotenv();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    info!("Starting playlist-dl v{}", env!("CARGO_PKG_VERSION"));

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "playlist-dl stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    info!(
        download_dir = %config.download_dir().display(),
        backend = ?config.search.backend,
        "configuration loaded"
    );

    let pipeline = Pipeline::from_config(&config)?;
    playlist_dl::serve_with_shutdown(pipeline, config).await
}
