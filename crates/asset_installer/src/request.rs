//! Asset download request abstraction
//!
//! The dialog only polls these; the work happens on whatever the factory
//! spawns it on.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::extract::InstallManifest;

/// A running download-and-extract job.
pub trait AssetRequest: Send {
    /// Download progress in [0, 1]; negative once the download failed.
    fn progress(&self) -> f32;
    /// Terminal: finished, failed or cancelled.
    fn is_done(&self) -> bool;
    /// Download or extraction failed.
    fn had_error(&self) -> bool;
    /// Ask the job to stop. Leftover files are removed by the job itself.
    fn cancel(&self);
    /// Human readable failure, if any.
    fn error_message(&self) -> Option<String> {
        None
    }
    /// Manifest of the finished install.
    fn manifest(&self) -> Option<InstallManifest> {
        None
    }
}

/// Creates and starts requests for the configured bundle.
pub trait RequestFactory {
    fn start(&self) -> Box<dyn AssetRequest>;
}

#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub progress: f32,
    pub done: bool,
    pub download_error: Option<String>,
    pub extraction_error: Option<String>,
    pub manifest: Option<InstallManifest>,
}

/// State shared between a request handle and its worker.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus(Arc<Mutex<RequestState>>);

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RequestState {
        self.0.lock().clone()
    }

    pub fn manifest(&self) -> Option<InstallManifest> {
        self.0.lock().manifest.clone()
    }

    pub fn progress(&self) -> f32 {
        self.0.lock().progress
    }

    pub fn is_done(&self) -> bool {
        self.0.lock().done
    }

    pub fn had_error(&self) -> bool {
        let state = self.0.lock();
        state.download_error.is_some() || state.extraction_error.is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        let state = self.0.lock();
        state.download_error.clone().or_else(|| state.extraction_error.clone())
    }

    pub fn set_progress(&self, progress: f32) {
        let mut state = self.0.lock();
        if state.progress >= 0.0 {
            state.progress = progress;
        }
    }

    /// Download failed: progress goes negative and the request ends.
    pub fn fail_download(&self, message: String) {
        let mut state = self.0.lock();
        state.progress = -1.0;
        state.download_error = Some(message);
        state.done = true;
    }

    pub fn finish_extraction(&self, result: std::result::Result<InstallManifest, String>) {
        let mut state = self.0.lock();
        match result {
            Ok(manifest) => state.manifest = Some(manifest),
            Err(message) => state.extraction_error = Some(message),
        }
        state.done = true;
    }

    /// Cancelled and cleaned up.
    pub fn finish_cancelled(&self) {
        self.0.lock().done = true;
    }
}
