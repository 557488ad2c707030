//! Output directory checks.
//!
//! Verifies that each manifest exists, parses, and matches its schema.
//! With `--tree`, also lists the generated files (`/_ignore` is skipped).

use crate::{
    log,
    manifest::{ManifestKind, schema},
    utils::plural::plural_count,
};
use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use serde_json::Value;
use std::{fs, path::Path};

/// Tree entries under this prefix are scratch space for tooling.
const IGNORED_PREFIX: &str = "/_ignore";

/// Check every manifest in `dir`, reporting all failures before failing.
pub fn check_output(dir: &Path, tree: bool) -> Result<()> {
    let mut failed = 0;
    for kind in ManifestKind::ALL {
        match check_manifest(dir, kind) {
            Ok(()) => log!("check"; "{} ok", kind.file_name()),
            Err(err) => {
                log!("error"; "{:#}", err);
                failed += 1;
            }
        }
    }

    if tree {
        for entry in output_tree(dir)? {
            println!("{entry}");
        }
    }

    if failed > 0 {
        bail!("{} failed the check", plural_count(failed, "manifest"));
    }
    Ok(())
}

/// Check one manifest file.
pub fn check_manifest(dir: &Path, kind: ManifestKind) -> Result<()> {
    let path = kind.destination(dir);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("{} not found in {}", kind.file_name(), dir.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", kind.file_name()))?;
    schema::validate_value(kind, value)?;
    Ok(())
}

/// Files below `dir` as sorted `/`-rooted paths, e.g. `/server/pages/index.html`.
pub fn output_tree(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        bail!("output directory {} does not exist", dir.display());
    }

    let mut entries: Vec<String> = WalkDir::new(dir)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            let relative = path.strip_prefix(dir).ok()?;
            let mut entry = String::new();
            for component in relative.components() {
                entry.push('/');
                entry.push_str(&component.as_os_str().to_string_lossy());
            }
            Some(entry)
        })
        .filter(|entry| !entry.starts_with(IGNORED_PREFIX))
        .collect();

    entries.sort();
    entries.dedup();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{DiscoveredRoutes, Manifests};
    use crate::config::test_parse_config;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn write_manifests(dir: &Path) {
        let config = test_parse_config("");
        Manifests::synthesize(&config, &DiscoveredRoutes::default(), BTreeMap::new())
            .unwrap()
            .write(dir)
            .unwrap();
    }

    #[test]
    fn test_check_written_manifests() {
        let dir = TempDir::new().unwrap();
        write_manifests(dir.path());
        assert!(check_output(dir.path(), false).is_ok());
    }

    #[test]
    fn test_check_missing_manifest() {
        let dir = TempDir::new().unwrap();
        write_manifests(dir.path());
        fs::remove_file(dir.path().join("functions-manifest.json")).unwrap();

        assert!(check_manifest(dir.path(), ManifestKind::Functions).is_err());
        let err = check_output(dir.path(), false).unwrap_err();
        assert_eq!(err.to_string(), "1 manifest failed the check");
    }

    #[test]
    fn test_check_schema_violation() {
        let dir = TempDir::new().unwrap();
        write_manifests(dir.path());
        fs::write(
            dir.path().join("routes-manifest.json"),
            r#"{ "version": 3, "basePath": "docs", "pages404": true }"#,
        )
        .unwrap();

        let err = check_manifest(dir.path(), ManifestKind::Routes).unwrap_err();
        assert!(err.to_string().contains("basePath"));
    }

    #[test]
    fn test_output_tree_skips_ignored() {
        let dir = TempDir::new().unwrap();
        write_manifests(dir.path());
        fs::create_dir_all(dir.path().join("server/pages")).unwrap();
        fs::create_dir_all(dir.path().join("_ignore")).unwrap();
        fs::write(dir.path().join("server/pages/index.html"), "").unwrap();
        fs::write(dir.path().join("_ignore/scratch.txt"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        assert_eq!(
            output_tree(dir.path()).unwrap(),
            vec![
                "/.env",
                "/functions-manifest.json",
                "/prerender-manifest.json",
                "/routes-manifest.json",
                "/server/pages/index.html",
            ]
        );
    }

    #[test]
    fn test_output_tree_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(output_tree(&dir.path().join("missing")).is_err());
    }
}
