//! Error types for configuration loading and part interaction

use thiserror::Error;

/// Errors raised while looking up or moving parts of a loaded model.
///
/// All of these are recoverable: callers log them and keep the UI running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartError {
    #[error("No model root to traverse (asset not loaded)")]
    MissingRoot,
    #[error("Part \"{0}\" not found")]
    NotFound(String),
    #[error("Part \"{0}\" refers to a node that no longer exists")]
    NodeGone(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
    #[error("Part \"{0}\" is configured more than once")]
    DuplicatePart(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Terminal failure reported by the engine's asset loader
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Model failed to load: {0}")]
pub struct LoadError(pub String);
