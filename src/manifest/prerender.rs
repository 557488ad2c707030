//! Prerender (ISR) manifest synthesis.
//!
//! Each overridable field is resolved in this order:
//!
//! 1. the value discovered during the prerender pass
//! 2. the `[prerender_manifest]` entry for the same route in `vercout.toml`
//! 3. the global `build.initial_revalidate_seconds` (revalidation only)
//! 4. a built-in fallback
//!
//! `srcRoute` and `routeRegex` have no built-in fallback: a route that
//! cannot resolve them, or resolves them to an empty string, is a usage
//! error. Two discovered keys publishing under the same manifest key are
//! rejected as well.

use super::{
    DEFAULT_REVALIDATE_SECONDS, IsrDynamicRoute, IsrRoute, IsrRoutes, ManifestError, ManifestKind,
    PRERENDER_MANIFEST_VERSION, PrerenderDynamicRoute, PrerenderManifest, PrerenderRoute, Preview,
    schema,
};
use crate::config::ProjectConfig;
use crate::config::section::{DynamicRouteOverride, RouteOverride};
use std::collections::BTreeMap;

/// Build the prerender manifest from discovered ISR routes.
pub fn synthesize(
    config: &ProjectConfig,
    isr: Option<&IsrRoutes>,
) -> Result<PrerenderManifest, ManifestError> {
    let declared = &config.prerender_manifest;
    let global_revalidate = config.build.initial_revalidate_seconds;

    let mut routes = BTreeMap::new();
    let mut dynamic_routes = BTreeMap::new();

    if let Some(isr) = isr {
        let mut claimed = BTreeMap::new();
        for (original, route) in &isr.routes {
            let key = normalize_route_key(original);
            let entry = resolve_route(&key, route, declared.routes.get(&key), global_revalidate)?;
            let key = manifest_key(key);
            claim(&mut claimed, &key, original)?;
            routes.insert(key, entry);
        }

        let mut claimed = BTreeMap::new();
        for (original, route) in &isr.dynamic_routes {
            let key = normalize_route_key(original);
            let entry = resolve_dynamic_route(&key, route, declared.dynamic_routes.get(&key))?;
            claim(&mut claimed, &key, original)?;
            dynamic_routes.insert(key, entry);
        }
    }

    let manifest = PrerenderManifest {
        version: PRERENDER_MANIFEST_VERSION,
        routes,
        dynamic_routes,
        preview: Preview {
            preview_mode_id: declared.preview_mode_id.clone(),
        },
    };

    schema::validate_prerender(&manifest)?;
    Ok(manifest)
}

fn resolve_route(
    key: &str,
    route: &IsrRoute,
    declared: Option<&RouteOverride>,
    global_revalidate: Option<u64>,
) -> Result<PrerenderRoute, ManifestError> {
    let src_route = route
        .src_route
        .clone()
        .or_else(|| declared.and_then(|d| d.src_route.clone()))
        .filter(|src| !src.is_empty())
        .ok_or_else(|| ManifestError::usage(ManifestKind::Prerender, "srcRoute", key))?;

    let initial_revalidate_seconds = route
        .initial_revalidate_seconds
        .or_else(|| declared.and_then(|d| d.initial_revalidate_seconds))
        .or(global_revalidate)
        .unwrap_or(DEFAULT_REVALIDATE_SECONDS);

    let data_route = route
        .data_route
        .clone()
        .or_else(|| declared.and_then(|d| d.data_route.clone()))
        .unwrap_or_default();

    Ok(PrerenderRoute {
        initial_revalidate_seconds,
        src_route,
        data_route,
    })
}

fn resolve_dynamic_route(
    key: &str,
    route: &IsrDynamicRoute,
    declared: Option<&DynamicRouteOverride>,
) -> Result<PrerenderDynamicRoute, ManifestError> {
    let route_regex = route
        .route_regex
        .clone()
        .or_else(|| declared.and_then(|d| d.route_regex.clone()))
        .filter(|regex| !regex.is_empty())
        .ok_or_else(|| ManifestError::usage(ManifestKind::Prerender, "routeRegex", key))?;

    // An explicit `null` is a resolved value; only an unset fallback falls through.
    let fallback = match &route.fallback {
        Some(fallback) => fallback.clone(),
        None => declared
            .and_then(|d| d.fallback.as_ref())
            .and_then(|f| f.resolve())
            .unwrap_or(None),
    };

    let data_route = route
        .data_route
        .clone()
        .or_else(|| declared.and_then(|d| d.data_route.clone()))
        .unwrap_or_default();

    let data_route_regex = route
        .data_route_regex
        .clone()
        .or_else(|| declared.and_then(|d| d.data_route_regex.clone()))
        .unwrap_or_default();

    Ok(PrerenderDynamicRoute {
        route_regex,
        fallback,
        data_route,
        data_route_regex,
    })
}

/// Ensure a leading slash on a discovered route key.
fn normalize_route_key(key: &str) -> String {
    if key.starts_with('/') {
        key.to_string()
    } else {
        format!("/{key}")
    }
}

/// Record `original` as the source of `key`, rejecting a second claim.
fn claim<'a>(
    claimed: &mut BTreeMap<String, &'a str>,
    key: &str,
    original: &'a str,
) -> Result<(), ManifestError> {
    match claimed.insert(key.to_string(), original) {
        Some(first) => Err(ManifestError::DuplicateRoute {
            manifest: ManifestKind::Prerender,
            key: key.to_string(),
            first: first.to_string(),
            second: original.to_string(),
        }),
        None => Ok(()),
    }
}

/// The root page is published as `/index`.
fn manifest_key(key: String) -> String {
    if key == "/" { "/index".to_string() } else { key }
}

// ============================================================================
// tests
// ============================================================================
