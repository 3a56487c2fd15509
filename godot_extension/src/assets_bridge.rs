//! Download Assets Bridge for Godot
//!
//! Wraps `DownloadAssetsDialog`; the GDScript side renders the widget model
//! and forwards ribbon events, escape and per-frame updates.

use asset_installer::{
    AssetsConfig, DialogEvent, DownloadAssetsDialog, EventPropagation, HttpRequestFactory,
};
use godot::prelude::*;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use tokio::runtime::Runtime;

use crate::{error_response, install_panic_hook};

/// Shared runtime for download tasks; outlives every dialog
static RUNTIME: Lazy<std::io::Result<Runtime>> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("asset-download")
        .enable_all()
        .build()
});

type Dialog = DownloadAssetsDialog<HttpRequestFactory>;

#[derive(GodotClass)]
#[class(base=RefCounted)]
pub struct DownloadAssetsBridge {
    base: Base<RefCounted>,
    config: RefCell<AssetsConfig>,
    dialog: RefCell<Option<Dialog>>,
}

#[godot_api]
impl IRefCounted for DownloadAssetsBridge {
    fn init(base: Base<RefCounted>) -> Self {
        install_panic_hook();
        Self {
            base,
            config: RefCell::new(AssetsConfig::default()),
            dialog: RefCell::new(None),
        }
    }
}

#[godot_api]
impl DownloadAssetsBridge {
    /// Open the dialog. `config_yaml` may be empty to use the defaults.
    /// Refused while the previous dialog is still downloading.
    ///
    /// Returns `{success, widgets}` or an error payload.
    #[func]
    pub fn open(&self, config_yaml: GString) -> GString {
        if self.dialog.borrow().as_ref().is_some_and(|d| d.is_downloading()) {
            godot_error!("open: a download is still running");
            return error_response("a download is still running", "DOWNLOAD_IN_PROGRESS");
        }

        let yaml = config_yaml.to_string();
        let config = if yaml.trim().is_empty() {
            AssetsConfig::default()
        } else {
            match AssetsConfig::from_yaml_str(&yaml) {
                Ok(config) => config,
                Err(e) => {
                    godot_error!("Invalid assets config: {}", e);
                    return error_response(&e.to_string(), "INVALID_CONFIG");
                }
            }
        };

        let runtime = match &*RUNTIME {
            Ok(runtime) => runtime,
            Err(e) => {
                godot_error!("Failed to start download runtime: {}", e);
                return error_response(&e.to_string(), "NO_RUNTIME");
            }
        };
        let factory = match HttpRequestFactory::new(config.clone(), runtime.handle().clone()) {
            Ok(factory) => factory,
            Err(e) => {
                godot_error!("Failed to create HTTP client: {}", e);
                return error_response(&e.to_string(), "HTTP_CLIENT");
            }
        };

        let dialog = DownloadAssetsDialog::new(factory, &config);
        let response = serde_json::json!({ "success": true, "widgets": dialog.widgets() });
        *self.config.borrow_mut() = config;
        *self.dialog.borrow_mut() = Some(dialog);
        GString::from(response.to_string().as_str())
    }

    /// Ribbon selection; returns true when the dialog consumed the event.
    #[func]
    pub fn process_event(&self, source: GString, selection: GString) -> bool {
        let mut slot = self.dialog.borrow_mut();
        let Some(dialog) = slot.as_mut() else {
            return false;
        };
        dialog.process_event(&source.to_string(), &selection.to_string())
            == EventPropagation::Block
    }

    #[func]
    pub fn on_escape_pressed(&self) -> bool {
        let mut slot = self.dialog.borrow_mut();
        match slot.as_mut() {
            Some(dialog) => dialog.on_escape_pressed(),
            None => false,
        }
    }

    /// Per-frame tick. Returns `{success, state, dismissed, widgets, events}`.
    #[func]
    pub fn on_update(&self, dt: f64) -> GString {
        let mut slot = self.dialog.borrow_mut();
        let Some(dialog) = slot.as_mut() else {
            return error_response("dialog not open", "NOT_OPEN");
        };

        dialog.on_update(dt as f32);
        let events = dialog.take_events();
        for event in &events {
            match event {
                DialogEvent::ShowMessage { text } => godot_print!("[DownloadAssets] {}", text),
                DialogEvent::AssetsReady { dir } => {
                    godot_print!("[DownloadAssets] assets ready in {}", dir.display())
                }
                DialogEvent::Dismissed => {}
            }
        }

        let response = serde_json::json!({
            "success": true,
            "state": dialog.state(),
            "dismissed": dialog.is_dismissed(),
            "widgets": dialog.widgets(),
            "events": events,
        });
        let dismissed = dialog.is_dismissed() && !dialog.is_downloading();
        if dismissed {
            *slot = None;
        }
        GString::from(response.to_string().as_str())
    }

    /// Whether the configured bundle version is already extracted.
    #[func]
    pub fn is_installed(&self) -> bool {
        let config = self.config.borrow();
        asset_installer::is_installed(&config.download_dir, &config.version)
    }

    #[func]
    pub fn size_label(&self) -> GString {
        let config = self.config.borrow();
        GString::from(format!("Size: {}", asset_installer::format_size_mb(config.expected_size_bytes)).as_str())
    }
}
