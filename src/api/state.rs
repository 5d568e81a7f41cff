//! Application state for the HTTP server

use crate::{Config, Pipeline};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Per-request data such as diagnostics is never
/// stored here.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline used to process submitted references
    pub pipeline: Arc<Pipeline>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(pipeline: Arc<Pipeline>, config: Arc<Config>) -> Self {
        Self { pipeline, config }
    }
}
