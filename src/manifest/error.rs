//! Manifest synthesis errors.

use super::ManifestKind;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    /// A required field could not be resolved from any source.
    #[error("[{manifest}] `{{ {field} }}` is required for route {route}")]
    Usage {
        manifest: ManifestKind,
        field: &'static str,
        route: String,
    },

    /// Two discovered routes publish under the same manifest key.
    #[error("[{manifest}] routes {first} and {second} both publish as {key}")]
    DuplicateRoute {
        manifest: ManifestKind,
        key: String,
        first: String,
        second: String,
    },

    // NOTE: No #[from] here, same as ConfigError::Diagnostics
    #[error("{0}")]
    Schema(SchemaDiagnostics),

    #[error("failed to write `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize {0}")]
    Json(ManifestKind, #[source] serde_json::Error),
}

impl ManifestError {
    pub fn usage(manifest: ManifestKind, field: &'static str, route: impl Into<String>) -> Self {
        Self::Usage {
            manifest,
            field,
            route: route.into(),
        }
    }
}

// ============================================================================
// Schema diagnostics
// ============================================================================

/// One structural problem in a manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON path, e.g. `routes./about.srcRoute`.
    pub path: String,
    pub message: String,
}

/// All problems found in one document.
#[derive(Debug)]
pub struct SchemaDiagnostics {
    pub manifest: ManifestKind,
    issues: Vec<SchemaIssue>,
}

impl SchemaDiagnostics {
    pub fn new(manifest: ManifestKind) -> Self {
        Self {
            manifest,
            issues: Vec::new(),
        }
    }

    pub fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(SchemaIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    #[cfg(test)]
    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for SchemaDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manifest, "does not match its schema:".red())?;
        for issue in &self.issues {
            let path = if issue.path.is_empty() {
                "(root)"
            } else {
                issue.path.as_str()
            };
            write!(f, "\n  {} {}: {}", "→".red(), path.cyan(), issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaDiagnostics {}

impl From<SchemaDiagnostics> for ManifestError {
    fn from(diag: SchemaDiagnostics) -> Self {
        Self::Schema(diag)
    }
}
