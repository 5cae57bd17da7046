use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::synthesizer::ReportSynthesizer;
use crate::llm_client::TextGenerator;
use crate::store::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default: `LlmClient`. Tests swap in a fake.
    pub generator: Arc<dyn TextGenerator>,
    pub store: Arc<dyn ResultStore>,
    pub synthesizer: ReportSynthesizer,
    pub config: Config,
}
