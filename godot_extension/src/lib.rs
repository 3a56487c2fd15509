use godot::prelude::*;
use std::sync::Once;

mod assets_bridge;
pub use assets_bridge::DownloadAssetsBridge;

mod soccer_bridge;
pub use soccer_bridge::SoccerAiBridge;

static PANIC_HOOK: Once = Once::new();

/// Route Rust panics to the Godot console.
pub(crate) fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(s) = info.payload().downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = info.payload().downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            let loc = if let Some(l) = info.location() {
                format!("{}:{}:{}", l.file(), l.line(), l.column())
            } else {
                "unknown".to_string()
            };
            godot_error!("Rust panic at {}: {}", loc, msg);
        }));
    });
}

/// `{"success": false, ...}` payload shared by both bridges
pub(crate) fn error_response(message: &str, code: &str) -> GString {
    let response = serde_json::json!({
        "success": false,
        "error": message,
        "error_code": code
    });
    GString::from(response.to_string().as_str())
}

pub(crate) fn build_info() -> GString {
    let response = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "core_version": kart_core::VERSION,
        "git_hash": env!("GIT_HASH"),
        "build_time": env!("BUILD_TIME_UTC"),
    });
    GString::from(response.to_string().as_str())
}

struct KartRustExtension;

#[gdextension]
unsafe impl ExtensionLibrary for KartRustExtension {}
