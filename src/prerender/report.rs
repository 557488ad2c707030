//! Prerender report written by the framework after rendering.
//!
//! # Format
//!
//! ```json
//! {
//!   "pageRoutes": ["/", "/about", "/star-wars"],
//!   "pages": [
//!     { "url": "/", "filePath": "index.html", "pageExports": { "initialRevalidateSeconds": 30 } },
//!     { "url": "/about", "filePath": "about/index.html" }
//!   ],
//!   "dynamicRoutes": { "/blog/[id]": { "routeRegex": "^/blog/(.+)$" } }
//! }
//! ```
//!
//! `filePath` is relative to the client build directory; absolute paths
//! inside it are accepted too.

use super::{PageRenderer, PrerenderError, RenderedPage};
use crate::manifest::IsrDynamicRoute;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrerenderReport {
    pub page_routes: Vec<String>,
    pub pages: Vec<ReportPage>,
    pub dynamic_routes: BTreeMap<String, IsrDynamicRoute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub url: String,
    pub file_path: PathBuf,
    #[serde(default)]
    pub page_exports: PageExports,
}

/// Page exports relevant to deployment. Other exports are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageExports {
    /// Kept raw; `null` reads as absent.
    pub initial_revalidate_seconds: Option<Value>,
}

/// Replays a prerender report, reading page content from the client build.
pub struct ReportRenderer {
    client_dir: PathBuf,
    report: PrerenderReport,
}

impl ReportRenderer {
    pub fn new(report: PrerenderReport, client_dir: impl Into<PathBuf>) -> Self {
        Self {
            client_dir: client_dir.into(),
            report,
        }
    }

    /// Read the report at `path`.
    pub fn open(path: &Path, client_dir: &Path) -> Result<Self, PrerenderError> {
        let content =
            fs::read_to_string(path).map_err(|err| PrerenderError::Io(path.to_path_buf(), err))?;
        let report = serde_json::from_str(&content)
            .map_err(|err| PrerenderError::Report(path.to_path_buf(), err))?;
        Ok(Self::new(report, client_dir))
    }
}

impl PageRenderer for ReportRenderer {
    fn render(
        &mut self,
        on_page: &mut dyn FnMut(RenderedPage) -> Result<(), PrerenderError>,
    ) -> Result<(), PrerenderError> {
        for page in &self.report.pages {
            let file_path = page
                .file_path
                .strip_prefix(&self.client_dir)
                .unwrap_or(&page.file_path)
                .to_path_buf();
            let source = self.client_dir.join(&file_path);
            let content =
                fs::read_to_string(&source).map_err(|err| PrerenderError::Io(source, err))?;

            on_page(RenderedPage {
                url: page.url.clone(),
                file_path,
                content,
                initial_revalidate_seconds: page.page_exports.initial_revalidate_seconds.clone(),
            })?;
        }
        Ok(())
    }

    fn page_routes(&self) -> Vec<String> {
        self.report.page_routes.clone()
    }

    fn dynamic_routes(&self) -> BTreeMap<String, IsrDynamicRoute> {
        self.report.dynamic_routes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_report() {
        let report: PrerenderReport = serde_json::from_value(json!({
            "pageRoutes": ["/", "/about"],
            "pages": [
                { "url": "/", "filePath": "index.html", "pageExports": { "initialRevalidateSeconds": 30, "title": "Home" } },
                { "url": "/about", "filePath": "about/index.html", "pageExports": { "initialRevalidateSeconds": null } }
            ]
        }))
        .unwrap();

        assert_eq!(report.page_routes, vec!["/", "/about"]);
        assert_eq!(
            report.pages[0].page_exports.initial_revalidate_seconds,
            Some(json!(30))
        );
        assert_eq!(report.pages[1].page_exports.initial_revalidate_seconds, None);
        assert!(report.dynamic_routes.is_empty());
    }

    #[test]
    fn test_render_reads_client_files() {
        let dir = TempDir::new().unwrap();
        let client = dir.path().join("client");
        fs::create_dir_all(client.join("about")).unwrap();
        fs::write(client.join("about/index.html"), "<p>about</p>").unwrap();

        let report: PrerenderReport = serde_json::from_value(json!({
            "pages": [{ "url": "/about", "filePath": client.join("about/index.html") }]
        }))
        .unwrap();
        let mut renderer = ReportRenderer::new(report, &client);

        let mut seen = Vec::new();
        renderer
            .render(&mut |page| {
                seen.push(page);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].file_path, PathBuf::from("about/index.html"));
        assert_eq!(seen[0].content, "<p>about</p>");
    }

    #[test]
    fn test_render_missing_page_file() {
        let dir = TempDir::new().unwrap();
        let report: PrerenderReport = serde_json::from_value(json!({
            "pages": [{ "url": "/", "filePath": "index.html" }]
        }))
        .unwrap();
        let mut renderer = ReportRenderer::new(report, dir.path());

        let err = renderer.render(&mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, PrerenderError::Io(..)));
    }

    #[test]
    fn test_open_invalid_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prerender.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ReportRenderer::open(&path, dir.path()).err().unwrap();
        assert!(matches!(err, PrerenderError::Report(..)));

        let err = ReportRenderer::open(&dir.path().join("missing.json"), dir.path())
            .err()
            .unwrap();
        assert!(matches!(err, PrerenderError::Io(..)));
    }
}
