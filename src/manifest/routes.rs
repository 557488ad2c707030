//! Routes manifest synthesis.
//!
//! Discovered rules come first, configured rules follow. A rule list that
//! ends up empty is left out of the document; redirects are the exception
//! and are passed through exactly as configured.

use super::{
    DEFAULT_BASE_PATH, ManifestError, ROUTES_MANIFEST_VERSION, RoutesManifest, SsrRoutes, schema,
};
use crate::config::ProjectConfig;

/// Build the routes manifest from discovered SSR routes.
pub fn synthesize(
    config: &ProjectConfig,
    ssr: Option<&SsrRoutes>,
) -> Result<RoutesManifest, ManifestError> {
    let declared = &config.routes_manifest;

    let manifest = RoutesManifest {
        version: ROUTES_MANIFEST_VERSION,
        base_path: declared
            .base_path
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
        pages404: declared.pages404.unwrap_or(true),
        dynamic_routes: concat(ssr.map(|s| s.dynamic_routes.as_slice()), &declared.dynamic_routes),
        rewrites: concat(ssr.map(|s| s.rewrites.as_slice()), &declared.rewrites),
        redirects: declared.redirects.clone(),
        headers: concat(ssr.map(|s| s.headers.as_slice()), &declared.headers),
    };

    schema::validate_routes(&manifest)?;
    Ok(manifest)
}

fn concat<T: Clone>(discovered: Option<&[T]>, declared: &[T]) -> Option<Vec<T>> {
    let rules: Vec<T> = discovered
        .unwrap_or_default()
        .iter()
        .chain(declared)
        .cloned()
        .collect();
    (!rules.is_empty()).then_some(rules)
}
