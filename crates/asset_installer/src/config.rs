//! Asset bundle configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Prefix of the bundle URL; the version and archive name are appended
    pub download_url_base: String,
    /// Game version the bundle belongs to
    pub version: String,
    pub archive_name: String,
    /// Where the archive is downloaded to
    pub cache_dir: PathBuf,
    /// Where the bundle is extracted to
    pub download_dir: PathBuf,
    /// Bundle size shown before downloading, and the progress denominator
    /// when the server sends no Content-Length
    pub expected_size_bytes: u64,
    /// Optional SHA256 (hex) the archive must match
    pub expected_sha256: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            download_url_base: "https://downloads.kartsoccer.net/assets/".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            archive_name: "kart-assets.zip".to_string(),
            cache_dir: PathBuf::from("cache"),
            download_dir: PathBuf::from("assets_download"),
            expected_size_bytes: 214_958_080,
            expected_sha256: None,
        }
    }
}

impl AssetsConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// `<base><version>/<archive>`
    pub fn download_url(&self) -> String {
        format!("{}{}/{}", self.download_url_base, self.version, self.archive_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.cache_dir.join(&self.archive_name)
    }

    /// In-progress download, renamed to `archive_path` once complete
    pub fn partial_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.part", self.archive_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        let cfg = AssetsConfig {
            download_url_base: "http://localhost:8080/dl/".to_string(),
            version: "1.4".to_string(),
            ..AssetsConfig::default()
        };
        assert_eq!(cfg.download_url(), "http://localhost:8080/dl/1.4/kart-assets.zip");
    }

    #[test]
    fn test_partial_path_sits_next_to_archive() {
        let cfg = AssetsConfig::default();
        assert_eq!(cfg.archive_path(), PathBuf::from("cache/kart-assets.zip"));
        assert_eq!(cfg.partial_path(), PathBuf::from("cache/kart-assets.zip.part"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = AssetsConfig::from_yaml_str("version: \"2.0\"\ndownload_dir: /sdcard/kart\n").unwrap();
        assert_eq!(cfg.version, "2.0");
        assert_eq!(cfg.download_dir, PathBuf::from("/sdcard/kart"));
        assert_eq!(cfg.archive_name, "kart-assets.zip");
        assert!(cfg.expected_sha256.is_none());
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = AssetsConfig::from_yaml_str("expected_size_bytes: lots").unwrap_err();
        assert!(!err.is_recoverable());
    }
}
