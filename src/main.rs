//! vercout - deployment manifests for serverless hosting from a frontend build.

mod cli;
mod config;
mod logger;
mod manifest;
mod prerender;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_project(&config).map(|_| ()),
        Commands::Check { dir, tree } => {
            let dir = dir
                .as_deref()
                .map_or_else(|| config.output_dir().to_path_buf(), utils::path::normalize_path);
            cli::check::check_output(&dir, *tree)
        }
    }
}
