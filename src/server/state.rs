//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pipeline::Stylizer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The model, loaded once at startup.
    pub stylizer: Arc<Stylizer>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(stylizer: Stylizer, config: ServerConfig) -> Self {
        Self {
            stylizer: Arc::new(stylizer),
            config: Arc::new(config),
        }
    }
}
