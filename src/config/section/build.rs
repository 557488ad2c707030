//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! client_dir = "dist/client"              # Bundler client output (prerendered HTML)
//! server_dir = "dist/server"              # Bundler server output (importBuild)
//! output = ".output"                      # Deployment output directory
//! report = "dist/client/prerender.json"   # Prerender report written by the framework
//! initial_revalidate_seconds = 3600       # Default for ISR pages exporting `0`
//! ssr_template = "ssr.template.ts"        # Custom SSR endpoint template
//! ```
//!
//! All paths are relative to the project root (the directory of `vercout.toml`).

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Client build output, where prerendered pages are read from.
    pub client_dir: PathBuf,

    /// Server build output, containing the `importBuild` module.
    pub server_dir: PathBuf,

    /// Deployment output directory.
    pub output: PathBuf,

    /// Prerender report emitted by the framework.
    pub report: PathBuf,

    /// Global revalidation default for ISR pages.
    pub initial_revalidate_seconds: Option<u64>,

    /// SSR endpoint template. The embedded template is used when unset.
    pub ssr_template: Option<PathBuf>,

    /// Remove the output directory before building.
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            client_dir: "dist/client".into(),
            server_dir: "dist/server".into(),
            output: ".output".into(),
            report: "dist/client/prerender.json".into(),
            initial_revalidate_seconds: None,
            ssr_template: None,
            clean: false,
        }
    }
}

impl BuildConfig {
    /// Validate build paths. Expects normalized (absolute) paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.client_dir.starts_with(&self.output) {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                "output directory contains the client build",
                "point `output` at a dedicated directory such as `.output`",
            );
        }

        if let Some(template) = &self.ssr_template
            && !template.is_file()
        {
            diag.error(
                FieldPath::new("build.ssr_template"),
                format!("template `{}` not found", template.display()),
            );
        }

        if self.initial_revalidate_seconds == Some(0) {
            diag.warn(
                FieldPath::new("build.initial_revalidate_seconds"),
                "0 disables revalidation for pages that rely on the default",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.client_dir, PathBuf::from("dist/client"));
        assert_eq!(config.build.server_dir, PathBuf::from("dist/server"));
        assert_eq!(config.build.output, PathBuf::from(".output"));
        assert_eq!(
            config.build.report,
            PathBuf::from("dist/client/prerender.json")
        );
        assert_eq!(config.build.initial_revalidate_seconds, None);
        assert!(config.build.ssr_template.is_none());
        assert!(!config.build.clean);
    }

    #[test]
    fn test_custom_paths() {
        let config = test_parse_config(
            r#"
[build]
client_dir = "build/client"
output = "deploy"
initial_revalidate_seconds = 120
"#,
        );
        assert_eq!(config.build.client_dir, PathBuf::from("build/client"));
        assert_eq!(config.build.output, PathBuf::from("deploy"));
        assert_eq!(config.build.initial_revalidate_seconds, Some(120));
        // untouched fields keep defaults
        assert_eq!(config.build.server_dir, PathBuf::from("dist/server"));
    }

    #[test]
    fn test_output_inside_client_dir_is_allowed() {
        let build = BuildConfig {
            client_dir: "/site/dist/client".into(),
            output: "/site/dist/client/.output".into(),
            ..BuildConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_output_containing_client_dir_is_rejected() {
        let build = BuildConfig {
            client_dir: "/site/dist/client".into(),
            output: "/site/dist".into(),
            ..BuildConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.errors()[0].field.as_str(), "build.output");
    }

    #[test]
    fn test_missing_template_is_rejected() {
        let build = BuildConfig {
            ssr_template: Some("/nonexistent/ssr.template.ts".into()),
            ..BuildConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_zero_default_warns() {
        let build = BuildConfig {
            initial_revalidate_seconds: Some(0),
            ..BuildConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
