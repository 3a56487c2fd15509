//! HTTP implementation of [`AssetRequest`]
//!
//! One tokio task per request: stream the bundle into `<archive>.part`,
//! rename, optionally verify, extract on the blocking pool, delete the archive.

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AssetsConfig;
use crate::error::{InstallError, Result};
use crate::extract::{extract_assets, file_checksum, InstallManifest};
use crate::request::{AssetRequest, RequestFactory, SharedStatus};

/// Download progress stays below this until the archive is complete
const MAX_DOWNLOAD_PROGRESS: f32 = 0.99;

pub struct HttpRequestFactory {
    client: reqwest::Client,
    config: Arc<AssetsConfig>,
    runtime: Handle,
}

impl HttpRequestFactory {
    pub fn new(config: AssetsConfig, runtime: Handle) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("asset_installer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config: Arc::new(config), runtime })
    }

    pub fn config(&self) -> &AssetsConfig {
        &self.config
    }
}

impl RequestFactory for HttpRequestFactory {
    fn start(&self) -> Box<dyn AssetRequest> {
        Box::new(HttpAssetRequest::spawn(
            &self.runtime,
            self.client.clone(),
            Arc::clone(&self.config),
        ))
    }
}

pub struct HttpAssetRequest {
    status: SharedStatus,
    cancel: CancellationToken,
}

impl HttpAssetRequest {
    pub fn spawn(runtime: &Handle, client: reqwest::Client, config: Arc<AssetsConfig>) -> Self {
        let status = SharedStatus::new();
        let cancel = CancellationToken::new();
        runtime.spawn(run(client, config, status.clone(), cancel.clone()));
        Self { status, cancel }
    }

    pub fn status(&self) -> &SharedStatus {
        &self.status
    }
}

impl AssetRequest for HttpAssetRequest {
    fn progress(&self) -> f32 {
        self.status.progress()
    }

    fn is_done(&self) -> bool {
        self.status.is_done()
    }

    fn had_error(&self) -> bool {
        self.status.had_error()
    }

    fn cancel(&self) {
        self.cancel.cancel();
    }

    fn error_message(&self) -> Option<String> {
        self.status.error_message()
    }

    fn manifest(&self) -> Option<InstallManifest> {
        self.status.manifest()
    }
}

impl Drop for HttpAssetRequest {
    fn drop(&mut self) {
        if !self.status.is_done() {
            self.cancel.cancel();
        }
    }
}

async fn run(
    client: reqwest::Client,
    config: Arc<AssetsConfig>,
    status: SharedStatus,
    cancel: CancellationToken,
) {
    let downloaded = tokio::select! {
        result = download(&client, &config, &status) => result,
        _ = cancel.cancelled() => Err(InstallError::Cancelled),
    };

    if let Err(e) = downloaded {
        if matches!(e, InstallError::Cancelled) {
            info!("Asset download cancelled");
            cleanup(&config).await;
            status.finish_cancelled();
        } else {
            warn!(error = %e, recoverable = e.is_recoverable(), "Asset download failed");
            remove_file_quiet(&config.partial_path()).await;
            remove_file_quiet(&config.archive_path()).await;
            status.fail_download(e.to_string());
        }
        return;
    }

    if let Err(e) = verify(&config).await {
        warn!(error = %e, "Asset archive rejected");
        remove_file_quiet(&config.archive_path()).await;
        status.fail_download(e.to_string());
        return;
    }

    status.set_progress(1.0);
    if cancel.is_cancelled() {
        cleanup(&config).await;
        status.finish_cancelled();
        return;
    }

    let archive = config.archive_path();
    let dest = config.download_dir.clone();
    let version = config.version.clone();
    debug!(archive = %archive.display(), dest = %dest.display(), "Extracting asset bundle");
    let extracted = tokio::task::spawn_blocking(move || extract_assets(&archive, &dest, &version))
        .await
        .map_err(|e| InstallError::Extraction(e.to_string()))
        .and_then(|r| r.map_err(InstallError::from));

    // extraction itself can't be interrupted; honour a cancel that came in meanwhile
    if cancel.is_cancelled() {
        cleanup(&config).await;
        status.finish_cancelled();
        return;
    }

    remove_file_quiet(&config.archive_path()).await;
    match extracted {
        Ok(manifest) => {
            info!(files = manifest.files, bytes = manifest.bytes, "Asset bundle installed");
            status.finish_extraction(Ok(manifest));
        }
        Err(e) => {
            warn!(error = %e, "Asset extraction failed");
            status.finish_extraction(Err(e.to_string()));
        }
    }
}

async fn download(
    client: &reqwest::Client,
    config: &AssetsConfig,
    status: &SharedStatus,
) -> Result<()> {
    tokio::fs::create_dir_all(&config.cache_dir).await?;

    let url = config.download_url();
    info!(url = %url, "Downloading asset bundle");
    let mut resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        return Err(InstallError::HttpStatus(resp.status().as_u16()));
    }

    let total = resp
        .content_length()
        .filter(|&len| len > 0)
        .unwrap_or(config.expected_size_bytes)
        .max(1);

    let part = config.partial_path();
    let mut file = tokio::fs::File::create(&part).await?;
    let mut received = 0u64;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        let progress = (received as f64 / total as f64) as f32;
        status.set_progress(progress.min(MAX_DOWNLOAD_PROGRESS));
    }
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&part, config.archive_path()).await?;
    debug!(bytes = received, "Asset bundle downloaded");
    Ok(())
}

async fn verify(config: &AssetsConfig) -> Result<()> {
    let Some(expected) = config.expected_sha256.clone() else {
        return Ok(());
    };
    let archive = config.archive_path();
    let actual = tokio::task::spawn_blocking(move || file_checksum(&archive))
        .await
        .map_err(|e| InstallError::Extraction(e.to_string()))??;
    if !actual.eq_ignore_ascii_case(&expected) {
        return Err(InstallError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// Remove everything a cancelled request may have left behind.
async fn cleanup(config: &AssetsConfig) {
    remove_file_quiet(&config.archive_path()).await;
    remove_file_quiet(&config.partial_path()).await;
    match tokio::fs::remove_dir_all(&config.download_dir).await {
        Ok(()) => debug!(dir = %config.download_dir.display(), "Removed download dir"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, "Failed to remove download dir"),
    }
}

async fn remove_file_quiet(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove"),
    }
}
