use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Invalid kart id: {id} (world has {num_karts} karts)")]
    InvalidKart { id: usize, num_karts: usize },

    #[error("Invalid nav node: {0}")]
    InvalidNode(usize),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AiError {
    /// Snapshot problems are per-frame; the caller can keep the previous controls.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AiError::InvalidSnapshot(_) => true,
            AiError::Json(_) => true,
            AiError::InvalidKart { .. } => false,
            AiError::InvalidNode(_) => false,
            AiError::Yaml(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AiError>;
