//! Prerender pass errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrerenderError {
    /// The framework or the project misuses the adapter.
    #[error("[vercout:prerender][Wrong Usage] {0}")]
    Usage(String),

    #[error("failed to parse prerender report `{0}`")]
    Report(PathBuf, #[source] serde_json::Error),

    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

impl PrerenderError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
