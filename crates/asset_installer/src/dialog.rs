//! "Download full assets" modal dialog
//!
//! Front-end agnostic: the dialog owns the view model ([`DialogWidgets`]) and
//! a queue of [`DialogEvent`]s; the engine renders the former and drains the
//! latter every frame.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::AssetsConfig;
use crate::extract::{format_size_mb, InstallManifest};
use crate::request::{AssetRequest, RequestFactory};

pub const ACTIONS_SOURCE: &str = "actions";
pub const ACTION_BACK: &str = "back";
pub const ACTION_INSTALL: &str = "install";

pub const DESCRIPTION_TEXT: &str = "The game will download full assets (including all tracks, \
high quality textures and music) for better gaming experience, this will use your mobile data \
if you don't have a wifi connection.";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Sorry, downloading the add-on failed";
pub const INSTALL_FAILED_TEXT: &str = "Failed to download assets, check your storage space or \
internet connection and try again later.";
pub const INSTALL_LABEL: &str = "Install";
pub const TRY_AGAIN_LABEL: &str = "Try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Idle,
    Downloading,
    Extracting,
    Done,
    Error,
}

/// Whether the front end should keep routing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPropagation {
    Block,
    Let,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogEvent {
    /// Open a message box on top of whatever is below the dialog
    ShowMessage { text: String },
    /// Assets are in place; reload the asset search paths from `dir`
    AssetsReady { dir: PathBuf },
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogWidgets {
    pub description: String,
    pub size_label: String,
    /// 0..99, the last percent covers unzipping
    pub progress_value: f32,
    pub progress_visible: bool,
    pub actions_visible: bool,
    pub install_label: String,
    pub focused_action: String,
    pub uninstall_visible: bool,
    pub rating_visible: bool,
}

impl DialogWidgets {
    fn initial(expected_size_bytes: u64) -> Self {
        Self {
            description: DESCRIPTION_TEXT.to_string(),
            size_label: format!("Size: {}", format_size_mb(expected_size_bytes)),
            progress_value: 0.0,
            progress_visible: false,
            actions_visible: true,
            install_label: INSTALL_LABEL.to_string(),
            focused_action: ACTION_BACK.to_string(),
            uninstall_visible: false,
            rating_visible: false,
        }
    }
}

pub struct DownloadAssetsDialog<F: RequestFactory> {
    factory: F,
    download_dir: PathBuf,
    request: Option<Box<dyn AssetRequest>>,
    widgets: DialogWidgets,
    state: DialogState,
    dismissed: bool,
    events: Vec<DialogEvent>,
    /// Time spent on the current request
    elapsed: f32,
    installed: Option<InstallManifest>,
}

impl<F: RequestFactory> DownloadAssetsDialog<F> {
    pub fn new(factory: F, config: &AssetsConfig) -> Self {
        Self {
            factory,
            download_dir: config.download_dir.clone(),
            request: None,
            widgets: DialogWidgets::initial(config.expected_size_bytes),
            state: DialogState::Idle,
            dismissed: false,
            events: Vec::new(),
            elapsed: 0.0,
            installed: None,
        }
    }

    pub fn widgets(&self) -> &DialogWidgets {
        &self.widgets
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn is_downloading(&self) -> bool {
        self.request.is_some()
    }

    /// Set once an install completed.
    pub fn installed_manifest(&self) -> Option<&InstallManifest> {
        self.installed.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Drain events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn process_event(&mut self, source: &str, selection: &str) -> EventPropagation {
        if source != ACTIONS_SOURCE || self.dismissed {
            return EventPropagation::Let;
        }
        match selection {
            ACTION_BACK => {
                self.stop_download();
                self.dismiss();
                EventPropagation::Block
            }
            ACTION_INSTALL => {
                // ribbon is hidden while a download runs
                if self.request.is_some() || !self.widgets.actions_visible {
                    return EventPropagation::Block;
                }
                self.widgets.progress_value = 0.0;
                self.widgets.progress_visible = true;
                self.widgets.actions_visible = false;
                self.start_download();
                EventPropagation::Block
            }
            _ => EventPropagation::Let,
        }
    }

    pub fn on_escape_pressed(&mut self) -> bool {
        self.stop_download();
        self.dismiss();
        true
    }

    pub fn on_update(&mut self, dt: f32) {
        let Some(request) = self.request.as_ref() else {
            return;
        };
        self.elapsed += dt;

        let progress = request.progress();
        self.widgets.progress_value = progress * 99.0;
        if progress < 0.0 {
            log::warn!(
                "Asset download failed after {:.1}s: {}",
                self.elapsed,
                request.error_message().unwrap_or_default()
            );
            self.request = None;
            // no "-100%" on screen
            self.widgets.progress_visible = false;
            self.state = DialogState::Error;
            self.dismiss();
            self.events.push(DialogEvent::ShowMessage { text: DOWNLOAD_FAILED_MESSAGE.to_string() });
        } else if request.is_done() {
            self.do_install();
        } else if progress >= 1.0 {
            self.state = DialogState::Extracting;
        }
    }

    /// No-op while a request is running; two requests would share the same files.
    pub fn start_download(&mut self) {
        if self.request.is_some() {
            log::debug!("Asset download already running");
            return;
        }
        log::info!("Starting asset download into {}", self.download_dir.display());
        self.request = Some(self.factory.start());
        self.elapsed = 0.0;
        self.state = DialogState::Downloading;
    }

    /// Cancel the running request, if any. Its files are removed by the request.
    pub fn stop_download(&mut self) {
        if let Some(request) = self.request.take() {
            log::info!("Cancelling asset download");
            request.cancel();
            self.state = DialogState::Idle;
        }
    }

    fn do_install(&mut self) {
        let Some(request) = self.request.take() else {
            return;
        };

        if request.had_error() {
            log::warn!(
                "Asset install failed: {}",
                request.error_message().unwrap_or_default()
            );
            self.widgets.description = INSTALL_FAILED_TEXT.to_string();
            self.widgets.progress_visible = false;
            self.widgets.actions_visible = true;
            self.widgets.install_label = TRY_AGAIN_LABEL.to_string();
            self.state = DialogState::Error;
        } else {
            log::info!("Assets installed in {:.1}s", self.elapsed);
            self.installed = request.manifest();
            self.state = DialogState::Done;
            self.dismiss();
            self.events.push(DialogEvent::AssetsReady { dir: self.download_dir.clone() });
        }
    }

    fn dismiss(&mut self) {
        if !self.dismissed {
            self.dismissed = true;
            self.events.push(DialogEvent::Dismissed);
        }
    }
}
