//! Asset bundle extraction
//!
//! zip → download dir, then a manifest marking the install as complete

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

/// Written last; its presence means the extraction finished
pub const MANIFEST_FILE: &str = ".assets_manifest.json";

/// Install manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Game version of the bundle
    pub version: String,
    /// Number of extracted files
    pub files: usize,
    /// Total extracted bytes
    pub bytes: u64,
    /// Extraction time (RFC3339)
    pub installed_at: String,
}

/// Extract `archive` into `dest` and write the install manifest.
///
/// Entries that would land outside `dest` abort the extraction.
pub fn extract_assets(archive: &Path, dest: &Path, version: &str) -> Result<InstallManifest> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive: {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Not a zip archive: {}", archive.display()))?;

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let mut files = 0usize;
    let mut bytes = 0u64;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).context("Failed to read zip entry")?;
        let Some(rel) = entry.enclosed_name() else {
            bail!("Unsafe path in archive: {}", entry.name());
        };
        let out = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create directory: {}", out.display()))?;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut writer = File::create(&out)
            .with_context(|| format!("Failed to create file: {}", out.display()))?;
        bytes += io::copy(&mut entry, &mut writer)
            .with_context(|| format!("Failed to write file: {}", out.display()))?;
        files += 1;
    }

    let manifest = InstallManifest {
        version: version.to_string(),
        files,
        bytes,
        installed_at: chrono::Utc::now().to_rfc3339(),
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    fs::write(dest.join(MANIFEST_FILE), manifest_json)
        .with_context(|| format!("Failed to write manifest in {}", dest.display()))?;

    log::info!(
        "Extracted {} files ({} bytes) from {} into {}",
        files,
        bytes,
        archive.display(),
        dest.display()
    );
    Ok(manifest)
}

/// Manifest of a completed install, `None` if nothing (complete) is installed.
pub fn installed_manifest(dest: &Path) -> Option<InstallManifest> {
    let text = fs::read_to_string(dest.join(MANIFEST_FILE)).ok()?;
    serde_json::from_str(&text).ok()
}

pub fn is_installed(dest: &Path, version: &str) -> bool {
    installed_manifest(dest).is_some_and(|m| m.version == version)
}

/// SHA256 of a file (hex)
pub fn file_checksum(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Size label shown before downloading, one decimal in MB, halves round up.
pub fn format_size_mb(bytes: u64) -> String {
    let tenths = (bytes as f64 / 1024.0 / 1024.0 * 10.0 + 0.5).floor();
    format!("{:.1} MB", tenths / 10.0)
}
