use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Download cancelled")]
    Cancelled,
}

impl InstallError {
    /// Whether "Try again" has a chance of succeeding.
    pub fn is_recoverable(&self) -> bool {
        match self {
            InstallError::Io(_) => true,
            InstallError::Http(_) => true,
            InstallError::HttpStatus(code) => *code >= 500 || *code == 408 || *code == 429,
            InstallError::ChecksumMismatch { .. } => true,
            InstallError::Extraction(_) => true,
            InstallError::Config(_) => false,
            InstallError::Cancelled => false,
        }
    }
}

impl From<anyhow::Error> for InstallError {
    fn from(err: anyhow::Error) -> Self {
        InstallError::Extraction(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(InstallError::HttpStatus(503).is_recoverable());
        assert!(InstallError::HttpStatus(429).is_recoverable());
        assert!(!InstallError::HttpStatus(404).is_recoverable());
        assert!(!InstallError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_anyhow_keeps_context_chain() {
        let err: InstallError = anyhow::anyhow!("disk full").context("Failed to write tracks/a.txt").into();
        assert_eq!(err.to_string(), "Extraction failed: Failed to write tracks/a.txt: disk full");
    }
}
