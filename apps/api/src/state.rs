use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportService;
use crate::images::ImageService;
use crate::llm_client::TextCompletion;
use crate::session::SessionStore;
use crate::storage::FileStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text completion used by every generation call. `LlmClient` in production.
    pub llm: Arc<dyn TextCompletion>,
    pub images: ImageService,
    pub exports: ExportService,
    pub storage: FileStorage,
    /// Redis-backed when `REDIS_URL` is set, in-memory otherwise.
    pub sessions: Arc<dyn SessionStore>,
}
