use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ResumeGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: ResumeGenerator,
    pub config: Arc<Config>,
}
