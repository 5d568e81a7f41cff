//! HTTP server module
//!
//! Serves the HTML front end (a form and a result page) plus a small JSON API for the same
//! pipeline.

use crate::{Config, Pipeline, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the router with all route definitions
///
/// # Routes
///
/// ## HTML front end
/// - `GET /` - Input form
/// - `POST /process_input` - Run the pipeline for the form's `user_input`, render the result
/// - any other method on `/process_input` - `405 Unsupported method: <METHOD>`
///
/// ## JSON API
/// - `POST /api/v1/process` - Run the pipeline, return the report and diagnostic lines
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(pipeline: Arc<Pipeline>, config: Arc<Config>) -> Router {
    let state = AppState::new(pipeline, config);

    Router::new()
        // HTML front end
        .route("/", get(routes::serve_index))
        .route(
            "/process_input",
            post(routes::process_input).fallback(routes::unsupported_method),
        )
        // JSON API
        .route("/api/v1/process", post(routes::process))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until `shutdown` resolves, then stops accepting connections and lets in-flight
/// requests finish.
///
/// # Example
///
/// ```no_run
/// use playlist_dl::{Config, Pipeline};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let pipeline = Arc::new(Pipeline::from_config(&config)?);
///
/// playlist_dl::api::start_api_server(pipeline, config, playlist_dl::wait_for_signal()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(
    pipeline: Arc<Pipeline>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting HTTP server"
    );

    let app = create_router(pipeline, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    // Port 0 in the config resolves to the real port here
    let local_address = listener.local_addr().map_err(crate::error::Error::Io)?;
    tracing::info!(
        address = %local_address,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
