//! Project configuration management for `vercout.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── prerender  # [prerender_manifest]
//! │   ├── routes     # [routes_manifest]
//! │   └── functions  # [functions_manifest]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section                | Purpose                                        |
//! |------------------------|------------------------------------------------|
//! | `[build]`              | Bundler output paths, report, global defaults  |
//! | `[prerender_manifest]` | Pre-declared ISR routes and preview mode id    |
//! | `[routes_manifest]`    | Base path, rewrites, redirects, headers        |
//! | `[functions_manifest]` | Per-function runtime, memory, duration         |
//!
//! The file is optional: without one, every section uses its defaults and
//! the current directory is the project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use section::{BuildConfig, FunctionsManifestConfig, PrerenderManifestConfig, RoutesManifestConfig};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    debug, log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "vercout.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing vercout.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build paths and defaults
    #[serde(default)]
    pub build: BuildConfig,

    /// Pre-declared prerender manifest entries
    #[serde(default)]
    pub prerender_manifest: PrerenderManifestConfig,

    /// Routes manifest rules
    #[serde(default)]
    pub routes_manifest: RoutesManifestConfig,

    /// Functions manifest pages
    #[serde(default)]
    pub functions_manifest: FunctionsManifestConfig,
}

impl ProjectConfig {
    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist. Otherwise `vercout.toml` is searched
    /// upward from cwd, falling back to defaults rooted at cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => Some(cwd.join(path)),
            None => find_config_file(Path::new(CONFIG_FILE)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.clone(), Path::to_path_buf);

        config.config_path = config_path.unwrap_or_default();
        config.finalize(cli, &root);
        config.log_source();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
        if let Commands::Build { build_args } = &cli.command {
            self.apply_build_args(build_args);
        }
        self.normalize_paths(root);
    }

    /// Report which file the configuration came from (verbose only).
    fn log_source(&self) {
        if self.config_path.as_os_str().is_empty() {
            debug!("config"; "no {} found, using defaults in {}", CONFIG_FILE, self.get_root().display());
        } else {
            debug!("config"; "loaded {}", self.config_path.display());
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        // `--clean` only ever turns cleaning on
        self.build.clean |= args.clean;
        if let Some(report) = &args.report {
            self.build.report = report.clone();
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Deployment output directory
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        if !self.config_path.as_os_str().is_empty() {
            self.config_path = normalize_path(&self.config_path);
        }

        let build = &mut self.build;
        build.client_dir = normalize_path(&root.join(&build.client_dir));
        build.server_dir = normalize_path(&root.join(&build.server_dir));
        build.output = normalize_path(&root.join(&build.output));
        build.report = normalize_path(&root.join(&build.report));
        if let Some(template) = build.ssr_template.take() {
            build.ssr_template = Some(normalize_path(&root.join(template)));
        }

        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.prerender_manifest.validate(&mut diag);
        self.routes_manifest.validate(&mut diag);
        self.functions_manifest.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from TOML without path normalization.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Load `content` as `vercout.toml` rooted at `root`, the way `build` does.
#[cfg(test)]
pub fn test_load_config(root: &Path, content: &str) -> ProjectConfig {
    let path = root.join(CONFIG_FILE);
    fs::write(&path, content).unwrap();

    let cli = <Cli as clap::Parser>::parse_from([
        "vercout",
        "-C",
        path.to_str().unwrap(),
        "build",
    ]);
    ProjectConfig::load(&cli).unwrap()
}

// ============================================================================
// tests
// ============================================================================
