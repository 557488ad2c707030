//! Prerender pass adapter.
//!
//! The framework renders every static page once at build time. This module
//! sits on the other end of that pass:
//!
//! ```text
//! PageRenderer ──on_page──► PrerenderCollector ──finish──► DiscoveredRoutes
//!   (report.rs)                (collector.rs)                 isr + ssr
//!                                  │
//!                                  └─► <output>/server/pages/**.html
//! ```
//!
//! Pages become ISR routes when they export a revalidation interval or are
//! declared in `[prerender_manifest.routes]`. Filesystem routes that were
//! never prerendered are rewritten to the SSR endpoint built by
//! [`endpoint`].

mod collector;
pub mod endpoint;
mod error;
mod report;

pub use collector::PrerenderCollector;
pub use endpoint::{ApiEntry, ISR_ENDPOINT, SSR_ENDPOINT, ssr_endpoint};
pub use error::PrerenderError;
pub use report::ReportRenderer;

use crate::config::ProjectConfig;
use crate::manifest::{DiscoveredRoutes, IsrDynamicRoute};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One page produced by the prerender pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// URL the page is served at, e.g. `/about`.
    pub url: String,
    /// Output file, relative to the client build directory.
    pub file_path: PathBuf,
    pub content: String,
    /// Raw `initialRevalidateSeconds` page export, checked by the collector.
    pub initial_revalidate_seconds: Option<Value>,
}

/// The framework side of the prerender pass.
pub trait PageRenderer {
    /// Render every page, calling `on_page` once per page, in order.
    ///
    /// An error returned by `on_page` aborts the pass.
    fn render(
        &mut self,
        on_page: &mut dyn FnMut(RenderedPage) -> Result<(), PrerenderError>,
    ) -> Result<(), PrerenderError>;

    /// Filesystem routes of every page, prerendered or not.
    fn page_routes(&self) -> Vec<String>;

    /// Dynamic routes known to the framework.
    fn dynamic_routes(&self) -> BTreeMap<String, IsrDynamicRoute> {
        BTreeMap::new()
    }
}

/// Run the prerender pass and classify its pages.
///
/// Prerendered HTML is written below `output_dir` as pages arrive.
pub fn collect_routes(
    config: &ProjectConfig,
    renderer: &mut dyn PageRenderer,
    output_dir: &Path,
) -> Result<DiscoveredRoutes, PrerenderError> {
    let mut collector = PrerenderCollector::new(config, output_dir);
    renderer.render(&mut |page| collector.on_page(page))?;
    Ok(collector.finish(&renderer.page_routes(), renderer.dynamic_routes()))
}
