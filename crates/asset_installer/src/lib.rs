//! Asset Installer Library
//!
//! Downloads the full asset bundle, extracts it and drives the modal
//! "download assets" dialog on top of the request.

pub mod config;
pub mod dialog;
pub mod error;
pub mod extract;
pub mod http_request;
pub mod request;

pub use config::AssetsConfig;
pub use dialog::{DialogEvent, DialogState, DialogWidgets, DownloadAssetsDialog, EventPropagation};
pub use error::{InstallError, Result};
pub use extract::{extract_assets, file_checksum, format_size_mb, installed_manifest, is_installed, InstallManifest};
pub use http_request::{HttpAssetRequest, HttpRequestFactory};
pub use request::{AssetRequest, RequestFactory, RequestState, SharedStatus};
