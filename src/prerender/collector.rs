//! Per-page accumulator for the prerender pass.

use super::{ISR_ENDPOINT, PrerenderError, RenderedPage, SSR_ENDPOINT};
use crate::config::ProjectConfig;
use crate::debug;
use crate::manifest::{
    DiscoveredRoutes, IsrDynamicRoute, IsrRoute, IsrRoutes, RewriteRule, SsrRoutes,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Prerendered pages are served from here, relative to the output directory.
const PAGES_DIR: &str = "server/pages";

/// Accumulates route data while the renderer calls back once per page.
pub struct PrerenderCollector<'a> {
    config: &'a ProjectConfig,
    pages_dir: PathBuf,
    isr_routes: BTreeMap<String, IsrRoute>,
    prerendered: HashSet<String>,
}

impl<'a> PrerenderCollector<'a> {
    pub fn new(config: &'a ProjectConfig, output_dir: &Path) -> Self {
        Self {
            config,
            pages_dir: output_dir.join(PAGES_DIR),
            isr_routes: BTreeMap::new(),
            prerendered: HashSet::new(),
        }
    }

    /// Classify one rendered page and write its HTML.
    pub fn on_page(&mut self, page: RenderedPage) -> Result<(), PrerenderError> {
        let revalidate = revalidate_export(&page)?;

        if self.config.prerender_manifest.is_declared(&page.url)
            || revalidate.is_some_and(|seconds| seconds > 0)
        {
            // `0` defers to the global default
            let initial_revalidate_seconds = match revalidate {
                Some(0) => self.config.build.initial_revalidate_seconds,
                other => other,
            };
            debug!("prerender"; "isr route {} ({:?}s)", page.url, initial_revalidate_seconds);

            self.isr_routes.insert(
                page.url.clone(),
                IsrRoute {
                    initial_revalidate_seconds,
                    src_route: Some(format!("/{ISR_ENDPOINT}")),
                    data_route: None,
                },
            );
        }

        let destination = self.page_destination(&page)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|err| PrerenderError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&destination, &page.content)
            .map_err(|err| PrerenderError::Io(destination.clone(), err))?;

        self.prerendered.insert(page.url);
        Ok(())
    }

    /// Finish the pass: routes never prerendered are served by the SSR endpoint.
    pub fn finish(
        self,
        page_routes: &[String],
        dynamic_routes: BTreeMap<String, IsrDynamicRoute>,
    ) -> DiscoveredRoutes {
        let rewrites: Vec<RewriteRule> = page_routes
            .iter()
            .filter(|route| !self.prerendered.contains(*route))
            .map(|route| self.ssr_rewrite(route))
            .collect();

        let isr = (!self.isr_routes.is_empty() || !dynamic_routes.is_empty()).then(|| IsrRoutes {
            routes: self.isr_routes,
            dynamic_routes,
        });

        let ssr = (!rewrites.is_empty()).then(|| SsrRoutes {
            rewrites,
            ..SsrRoutes::default()
        });

        DiscoveredRoutes { isr, ssr }
    }

    /// A configured rewrite for the same source replaces the generated one.
    fn ssr_rewrite(&self, route: &str) -> RewriteRule {
        self.config
            .routes_manifest
            .rewrite_for(route)
            .cloned()
            .unwrap_or_else(|| RewriteRule {
                source: route.to_string(),
                destination: format!("/{SSR_ENDPOINT}"),
                regex: format!("^{route}.*$"),
            })
    }

    fn page_destination(&self, page: &RenderedPage) -> Result<PathBuf, PrerenderError> {
        let escapes = page
            .file_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || page.file_path.as_os_str().is_empty() {
            return Err(PrerenderError::usage(format!(
                "page {} has file path `{}` outside the client build",
                page.url,
                page.file_path.display()
            )));
        }
        Ok(self.pages_dir.join(&page.file_path))
    }
}

/// The `initialRevalidateSeconds` export: absent, or a non-negative integer.
fn revalidate_export(page: &RenderedPage) -> Result<Option<u64>, PrerenderError> {
    match &page.initial_revalidate_seconds {
        None => Ok(None),
        Some(Value::Number(n)) if n.is_u64() => Ok(n.as_u64()),
        Some(other) => Err(PrerenderError::usage(format!(
            "`{{ initialRevalidateSeconds }}` must be a non-negative integer, found {other} (page {})",
            page.url
        ))),
    }
}
