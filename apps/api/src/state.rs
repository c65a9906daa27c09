use std::sync::Arc;

use crate::assist::client::AssistClient;
use crate::auth::TokenKeys;
use crate::jobs::store::JobStore;
use crate::resumes::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL in production; in-memory when no database is configured.
    pub jobs: Arc<dyn JobStore>,
    /// S3 or local disk, depending on configuration.
    pub resumes: Arc<dyn ResumeStore>,
    pub auth: TokenKeys,
    /// Absent when no AI key is configured; the chat route then answers 501.
    pub assist: Option<AssistClient>,
}
