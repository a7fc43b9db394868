use thiserror::Error;

#[derive(Error, Debug)]
pub enum KasaneError {
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Invalid mixing rule: {0}")]
    InvalidRule(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KasaneError>;
