//! SSR endpoint entry.
//!
//! Pages that are not prerendered, and ISR pages on revalidation, are
//! served by one function deployed under two names:
//!
//! | Destination | Serves                        |
//! |-------------|-------------------------------|
//! | `api/ssr_`  | SSR rewrites (`/api/ssr_`)    |
//! | `ssr_`      | ISR `srcRoute` (`/ssr_`)      |
//!
//! The entry source is the template (configured or embedded) with an import
//! of the server build prepended. It is staged under the output directory
//! for the bundler to pick up.

use super::PrerenderError;
use crate::config::ProjectConfig;
use crate::utils::path::relative_path;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SSR_ENDPOINT: &str = "api/ssr_";
pub const ISR_ENDPOINT: &str = "ssr_";

/// Staging directory for endpoint sources, relative to the output directory.
pub const ENTRIES_DIR: &str = "_entries";

/// Server build module imported for its side effects.
const IMPORT_BUILD: &str = "importBuild";

const DEFAULT_TEMPLATE_NAME: &str = "ssr_.template.ts";
const DEFAULT_TEMPLATE: &str = include_str!("ssr_.template.ts");

/// How the bundler should parse the entry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Ts,
    Tsx,
    Js,
    Jsx,
    Default,
}

impl Loader {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts") => Self::Ts,
            Some("tsx") => Self::Tsx,
            Some("js") => Self::Js,
            Some("jsx") => Self::Jsx,
            _ => Self::Default,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Default => "default",
        }
    }

    /// File extension of the staged source.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Default => "js",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An additional serverless function for the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEntry {
    pub contents: String,
    /// Template the contents were built from.
    pub source_file: PathBuf,
    pub loader: Loader,
    /// Directory relative imports in `contents` resolve from.
    pub resolve_dir: PathBuf,
    pub destinations: Vec<String>,
}

impl ApiEntry {
    /// Where [`ApiEntry::stage`] writes the source.
    pub fn staged_path(&self) -> PathBuf {
        self.resolve_dir
            .join(format!("{ISR_ENDPOINT}.{}", self.loader.extension()))
    }

    /// Functions manifest page keys, one per destination.
    pub fn function_pages(&self) -> impl Iterator<Item = String> + '_ {
        self.destinations.iter().map(|dest| format!("{dest}.js"))
    }

    /// Write the entry source to [`ApiEntry::staged_path`].
    pub fn stage(&self) -> Result<PathBuf, PrerenderError> {
        fs::create_dir_all(&self.resolve_dir)
            .map_err(|err| PrerenderError::Io(self.resolve_dir.clone(), err))?;
        let path = self.staged_path();
        fs::write(&path, &self.contents).map_err(|err| PrerenderError::Io(path.clone(), err))?;
        Ok(path)
    }
}

/// Build the SSR endpoint entry for this project.
pub fn ssr_endpoint(config: &ProjectConfig) -> Result<ApiEntry, PrerenderError> {
    let (source_file, template) = match &config.build.ssr_template {
        Some(path) => {
            let template = fs::read_to_string(path)
                .map_err(|err| PrerenderError::Io(path.clone(), err))?;
            (path.clone(), template)
        }
        None => (PathBuf::from(DEFAULT_TEMPLATE_NAME), DEFAULT_TEMPLATE.to_string()),
    };

    let resolve_dir = config.output_dir().join(ENTRIES_DIR);
    let import_build = config.build.server_dir.join(IMPORT_BUILD);
    let import = import_specifier(&relative_path(&resolve_dir, &import_build));

    Ok(ApiEntry {
        contents: format!("import '{import}';\n{template}"),
        loader: Loader::from_path(&source_file),
        source_file,
        resolve_dir,
        destinations: vec![SSR_ENDPOINT.to_string(), ISR_ENDPOINT.to_string()],
    })
}

/// ES module specifier for a relative path: forward slashes, `./` prefix.
fn import_specifier(path: &Path) -> String {
    let joined = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn config_at(root: &Path, extra: &str) -> ProjectConfig {
        let mut config = test_parse_config(extra);
        config.build.output = root.join(".output");
        config.build.server_dir = root.join("dist/server");
        config.build.ssr_template = config.build.ssr_template.map(|t| root.join(t));
        config
    }

    #[test]
    fn test_loader_from_extension() {
        assert_eq!(Loader::from_path(Path::new("ssr.ts")), Loader::Ts);
        assert_eq!(Loader::from_path(Path::new("ssr.tsx")), Loader::Tsx);
        assert_eq!(Loader::from_path(Path::new("ssr.js")), Loader::Js);
        assert_eq!(Loader::from_path(Path::new("ssr.jsx")), Loader::Jsx);
        assert_eq!(Loader::from_path(Path::new("ssr.mjs")), Loader::Default);
        assert_eq!(Loader::Default.extension(), "js");
    }

    #[test]
    fn test_default_template_entry() {
        let config = config_at(Path::new("/site"), "");
        let entry = ssr_endpoint(&config).unwrap();

        assert_eq!(entry.loader, Loader::Ts);
        assert_eq!(entry.resolve_dir, PathBuf::from("/site/.output/_entries"));
        assert!(
            entry
                .contents
                .starts_with("import '../../dist/server/importBuild';\n")
        );
        assert!(entry.contents.contains("renderPage"));
        assert_eq!(entry.destinations, vec!["api/ssr_", "ssr_"]);
        assert_eq!(
            entry.function_pages().collect::<Vec<_>>(),
            vec!["api/ssr_.js", "ssr_.js"]
        );
        assert_eq!(
            entry.staged_path(),
            PathBuf::from("/site/.output/_entries/ssr_.ts")
        );
    }

    #[test]
    fn test_custom_template_is_staged() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("handler.jsx"), "export default () => null;\n").unwrap();
        let config = config_at(dir.path(), "[build]\nssr_template = \"handler.jsx\"");

        let entry = ssr_endpoint(&config).unwrap();
        assert_eq!(entry.loader, Loader::Jsx);
        assert_eq!(entry.source_file, dir.path().join("handler.jsx"));

        let staged = entry.stage().unwrap();
        assert_eq!(staged, dir.path().join(".output/_entries/ssr_.jsx"));
        assert_eq!(
            fs::read_to_string(staged).unwrap(),
            "import '../../dist/server/importBuild';\nexport default () => null;\n"
        );
    }

    #[test]
    fn test_missing_template() {
        let config = config_at(Path::new("/nonexistent"), "[build]\nssr_template = \"ssr.ts\"");
        assert!(matches!(ssr_endpoint(&config), Err(PrerenderError::Io(..))));
    }

    #[test]
    fn test_import_specifier() {
        assert_eq!(import_specifier(Path::new("server/importBuild")), "./server/importBuild");
        assert_eq!(import_specifier(Path::new("../server/importBuild")), "../server/importBuild");
    }
}
