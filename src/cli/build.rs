//! Deployment build orchestration.
//!
//! Build phases:
//! - **Clean** - Remove the output directory (`--clean`)
//! - **Prerender** - Replay the prerender report, write `server/pages/**`
//! - **Endpoint** - Build the SSR endpoint entry
//! - **Synthesize** - Build and validate all three manifests
//! - **Write** - Persist the manifests, stage the endpoint source

use crate::{
    config::ProjectConfig,
    debug, log,
    manifest::{FunctionConfig, Manifests},
    prerender::{self, ApiEntry, ReportRenderer},
    utils::plural::plural_count,
};
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    iter,
    path::{Path, PathBuf},
};

/// Files written by a build.
#[derive(Debug)]
pub struct BuildOutput {
    pub manifests: Vec<PathBuf>,
    pub entry: PathBuf,
}

impl BuildOutput {
    /// Every written manifest, then the staged endpoint source.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.manifests
            .iter()
            .chain(iter::once(&self.entry))
            .map(PathBuf::as_path)
    }
}

/// Run the whole build for `config`.
pub fn build_project(config: &ProjectConfig) -> Result<BuildOutput> {
    let output = config.output_dir();

    if config.build.clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
        debug!("build"; "cleaned {}", config.root_relative(output).display());
    }

    let mut renderer = ReportRenderer::open(&config.build.report, &config.build.client_dir)
        .context("Failed to read prerender report")?;
    let discovered = prerender::collect_routes(config, &mut renderer, output)?;

    let entry = prerender::ssr_endpoint(config)?;
    let pages = function_pages(config, &entry);

    let manifests = Manifests::synthesize(config, &discovered, pages)?;
    let written = BuildOutput {
        manifests: manifests.write(output)?,
        entry: entry.stage()?,
    };

    for path in written.files() {
        debug!("manifest"; "wrote {}", config.root_relative(path).display());
    }

    log!(
        "build";
        "{}, {}, {} in {}",
        plural_count(manifests.prerender.routes.len(), "isr route"),
        plural_count(
            manifests.routes.rewrites.as_ref().map_or(0, Vec::len),
            "rewrite"
        ),
        plural_count(manifests.functions.pages.len(), "function"),
        config.root_relative(output).display()
    );

    Ok(written)
}

/// Configured function pages, plus defaults for every endpoint destination.
fn function_pages(config: &ProjectConfig, entry: &ApiEntry) -> BTreeMap<String, FunctionConfig> {
    let mut pages = config.functions_manifest.pages.clone();
    for page in entry.function_pages() {
        pages.entry(page).or_default();
    }
    pages
}
