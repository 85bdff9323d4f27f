use thiserror::Error;

use crate::calibration::Resolution;

#[derive(Debug, Error)]
pub enum HudScanError {
    #[error("Calibration error: {0}")]
    Calibration(String),

    #[error("No calibration profile for resolution {0}")]
    ProfileNotFound(Resolution),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type HudScanResult<T> = Result<T, HudScanError>;
