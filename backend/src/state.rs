//! Application state shared by every request handler.
//!
//! Built once in `main.rs` and handed to Actix as `web::Data<AppState>`. The
//! clients inside are constructed from the configuration at startup; handlers
//! never reach for globals.

use crate::submission::SubmissionOrchestrator;
use crate::uploads::UploadStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Runs submissions; also owns the report sender and the upload store.
    pub orchestrator: Arc<SubmissionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SubmissionOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        self.orchestrator.sender().uploads()
    }
}
