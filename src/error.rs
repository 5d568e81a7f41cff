//! Error types for playlist-dl
//!
//! This module provides error handling for the library, including:
//! - Per-stage error types (extraction, resolution, fetching)
//! - HTTP status code mapping for the web front end
//! - Structured JSON error bodies with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for playlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-dl
///
/// Every pipeline stage returns this type. Stage-specific failures are grouped into
/// [`ExtractError`], [`ResolveError`] and [`FetchError`] so callers can tell which
/// external collaborator failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "spotify.client_id")
        key: Option<String>,
    },

    /// Metadata extraction failed
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Resolving a query to a resource locator failed
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Fetching content for a resource locator failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Caller supplied input that cannot be processed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// Web server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// External tool missing or unusable (yt-dlp)
    #[error("external tool error: {0}")]
    ExternalTool(String),
}

/// Metadata extraction errors (Spotify Web API)
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input is not a recognised playlist, album or track reference
    #[error("invalid reference {input:?}: {reason}")]
    InvalidReference {
        /// The raw input as supplied by the caller
        input: String,
        /// Why the input was rejected
        reason: String,
    },

    /// The catalog rejected our client credentials
    #[error("authentication with the catalog failed: {0}")]
    Unauthorized(String),

    /// The catalog answered with a non-success status
    #[error("catalog returned status {status}: {message}")]
    Api {
        /// HTTP status code returned by the catalog
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    /// The catalog answered with a body we could not interpret
    #[error("unexpected catalog response: {0}")]
    Malformed(String),
}

/// Resolution errors (video platform search)
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The search produced no results
    #[error("no match found for {query:?}")]
    NoMatch {
        /// The query string that was searched
        query: String,
    },

    /// The search backend could not be queried
    #[error("lookup failed for {query:?}: {reason}")]
    Lookup {
        /// The query string that was searched
        query: String,
        /// The reason the lookup failed
        reason: String,
    },
}

/// Fetch errors (audio download)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The download tool could not be started
    #[error("failed to start download tool for {locator}: {reason}")]
    Spawn {
        /// The resource being fetched
        locator: String,
        /// The reason the process could not be spawned
        reason: String,
    },

    /// The download tool exited unsuccessfully
    #[error("download of {locator} failed (exit code {code:?}): {stderr}")]
    ToolFailed {
        /// The resource being fetched
        locator: String,
        /// Process exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error of the tool
        stderr: String,
    },

    /// The download tool succeeded but did not report a written file
    #[error("download of {locator} reported no output file")]
    MissingOutput {
        /// The resource being fetched
        locator: String,
    },

    /// The destination directory is not usable
    #[error("destination {path} is not writable: {reason}")]
    Destination {
        /// The configured destination directory
        path: PathBuf,
        /// The reason the directory could not be used
        reason: String,
    },
}

/// API error response format
///
/// Returned by JSON endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "no_match",
///     "message": "resolution error: no match found for \"Artist - Song\"",
///     "details": { "query": "Artist - Song" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "no_match", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::InvalidInput(_) => 400,
            Error::Extract(ExtractError::InvalidReference { .. }) => 400,

            // 404 Not Found - the catalog item or a search match does not exist
            Error::Extract(ExtractError::Api { status: 404, .. }) => 404,
            Error::Resolve(ResolveError::NoMatch { .. }) => 404,

            // 502 Bad Gateway - External service errors
            Error::Extract(_) => 502,
            Error::Resolve(ResolveError::Lookup { .. }) => 502,
            Error::Fetch(FetchError::ToolFailed { .. }) => 502,
            Error::Fetch(FetchError::MissingOutput { .. }) => 502,
            Error::Network(_) => 502,

            // 503 Service Unavailable - local tooling missing
            Error::Fetch(FetchError::Spawn { .. }) => 503,
            Error::ExternalTool(_) => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Fetch(FetchError::Destination { .. }) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ConfigFile(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Extract(e) => match e {
                ExtractError::InvalidReference { .. } => "invalid_reference",
                ExtractError::Unauthorized(_) => "catalog_unauthorized",
                ExtractError::Api { .. } => "catalog_error",
                ExtractError::Malformed(_) => "catalog_malformed_response",
            },
            Error::Resolve(e) => match e {
                ResolveError::NoMatch { .. } => "no_match",
                ResolveError::Lookup { .. } => "lookup_failed",
            },
            Error::Fetch(e) => match e {
                FetchError::Spawn { .. } => "fetch_spawn_failed",
                FetchError::ToolFailed { .. } => "fetch_failed",
                FetchError::MissingOutput { .. } => "fetch_missing_output",
                FetchError::Destination { .. } => "destination_unwritable",
            },
            Error::InvalidInput(_) => "validation_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ConfigFile(_) => "config_file_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::ExternalTool(_) => "external_tool_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let mut api_error = ApiError::new(error.error_code(), error.to_string());
        api_error.error.details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Extract(ExtractError::InvalidReference { input, .. }) => {
                Some(serde_json::json!({
                    "input": input,
                }))
            }
            Error::Extract(ExtractError::Api { status, .. }) => Some(serde_json::json!({
                "upstream_status": status,
            })),
            Error::Resolve(ResolveError::NoMatch { query })
            | Error::Resolve(ResolveError::Lookup { query, .. }) => Some(serde_json::json!({
                "query": query,
            })),
            Error::Fetch(FetchError::ToolFailed { locator, code, .. }) => {
                Some(serde_json::json!({
                    "locator": locator,
                    "exit_code": code,
                }))
            }
            Error::Fetch(FetchError::Destination { path, .. }) => Some(serde_json::json!({
                "path": path,
            })),
            _ => None,
        };
        api_error
    }
}
