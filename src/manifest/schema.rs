//! Structural validation of manifest documents.
//!
//! Typed documents cover field names and value types; the checks here add
//! what the types cannot express (version literals, path shapes, value
//! ranges). [`validate_value`] runs both layers on raw JSON, for manifests
//! read back from disk.

use super::{
    FUNCTIONS_MANIFEST_VERSION, FunctionsManifest, ManifestKind, PRERENDER_MANIFEST_VERSION,
    PrerenderManifest, ROUTES_MANIFEST_VERSION, RoutesManifest, SchemaDiagnostics,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const MEMORY_RANGE: std::ops::RangeInclusive<u32> = 128..=3008;
const MAX_DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=900;
const REDIRECT_STATUS_RANGE: std::ops::RangeInclusive<u16> = 300..=399;

pub fn validate_prerender(manifest: &PrerenderManifest) -> Result<(), SchemaDiagnostics> {
    let mut diag = SchemaDiagnostics::new(ManifestKind::Prerender);
    check_prerender(manifest, &mut diag);
    diag.into_result()
}

pub fn validate_routes(manifest: &RoutesManifest) -> Result<(), SchemaDiagnostics> {
    let mut diag = SchemaDiagnostics::new(ManifestKind::Routes);
    check_routes(manifest, &mut diag);
    diag.into_result()
}

pub fn validate_functions(manifest: &FunctionsManifest) -> Result<(), SchemaDiagnostics> {
    let mut diag = SchemaDiagnostics::new(ManifestKind::Functions);
    check_functions(manifest, &mut diag);
    diag.into_result()
}

/// Validate a JSON document against the schema of `kind`.
///
/// Unknown fields are reported alongside semantic issues.
pub fn validate_value(kind: ManifestKind, value: Value) -> Result<(), SchemaDiagnostics> {
    let mut diag = SchemaDiagnostics::new(kind);
    match kind {
        ManifestKind::Prerender => {
            if let Some(manifest) = parse::<PrerenderManifest>(value, &mut diag) {
                check_prerender(&manifest, &mut diag);
            }
        }
        ManifestKind::Routes => {
            if let Some(manifest) = parse::<RoutesManifest>(value, &mut diag) {
                check_routes(&manifest, &mut diag);
            }
        }
        ManifestKind::Functions => {
            if let Some(manifest) = parse::<FunctionsManifest>(value, &mut diag) {
                check_functions(&manifest, &mut diag);
            }
        }
    }
    diag.into_result()
}

fn parse<T: DeserializeOwned>(value: Value, diag: &mut SchemaDiagnostics) -> Option<T> {
    let mut unknown = Vec::new();
    let parsed = serde_ignored::deserialize(value, |path: serde_ignored::Path| {
        unknown.push(path.to_string());
    });
    for path in unknown {
        diag.issue(path, "unknown field");
    }
    match parsed {
        Ok(document) => Some(document),
        Err(err) => {
            diag.issue("", err.to_string());
            None
        }
    }
}

// ============================================================================
// checks
// ============================================================================

fn check_version(found: u8, expected: u8, diag: &mut SchemaDiagnostics) {
    if found != expected {
        diag.issue("version", format!("expected {expected}, found {found}"));
    }
}

fn check_non_empty(path: String, value: &str, diag: &mut SchemaDiagnostics) {
    if value.is_empty() {
        diag.issue(path, "must not be empty");
    }
}

fn check_prerender(manifest: &PrerenderManifest, diag: &mut SchemaDiagnostics) {
    check_version(manifest.version, PRERENDER_MANIFEST_VERSION, diag);

    for (key, route) in &manifest.routes {
        if !key.starts_with('/') {
            diag.issue(format!("routes.{key}"), "route key must start with `/`");
        } else if key == "/" {
            diag.issue("routes./", "the root route is keyed as `/index`");
        }
        check_non_empty(format!("routes.{key}.srcRoute"), &route.src_route, diag);
    }

    for (key, route) in &manifest.dynamic_routes {
        if !key.starts_with('/') {
            diag.issue(format!("dynamicRoutes.{key}"), "route key must start with `/`");
        }
        check_non_empty(format!("dynamicRoutes.{key}.routeRegex"), &route.route_regex, diag);
    }
}

fn check_routes(manifest: &RoutesManifest, diag: &mut SchemaDiagnostics) {
    check_version(manifest.version, ROUTES_MANIFEST_VERSION, diag);

    if !manifest.base_path.starts_with('/') {
        diag.issue("basePath", "must start with `/`");
    }

    for (i, rule) in manifest.rewrites.iter().flatten().enumerate() {
        check_non_empty(format!("rewrites[{i}].source"), &rule.source, diag);
        check_non_empty(format!("rewrites[{i}].destination"), &rule.destination, diag);
        check_non_empty(format!("rewrites[{i}].regex"), &rule.regex, diag);
    }

    for (i, rule) in manifest.redirects.iter().flatten().enumerate() {
        check_non_empty(format!("redirects[{i}].source"), &rule.source, diag);
        check_non_empty(format!("redirects[{i}].destination"), &rule.destination, diag);
        check_non_empty(format!("redirects[{i}].regex"), &rule.regex, diag);
        if !REDIRECT_STATUS_RANGE.contains(&rule.status_code) {
            diag.issue(
                format!("redirects[{i}].statusCode"),
                format!("must be a 3xx status code, found {}", rule.status_code),
            );
        }
    }

    for (i, rule) in manifest.headers.iter().flatten().enumerate() {
        check_non_empty(format!("headers[{i}].source"), &rule.source, diag);
        check_non_empty(format!("headers[{i}].regex"), &rule.regex, diag);
        for (j, header) in rule.headers.iter().enumerate() {
            check_non_empty(format!("headers[{i}].headers[{j}].key"), &header.key, diag);
        }
    }

    for (i, rule) in manifest.dynamic_routes.iter().flatten().enumerate() {
        check_non_empty(format!("dynamicRoutes[{i}].page"), &rule.page, diag);
        check_non_empty(format!("dynamicRoutes[{i}].regex"), &rule.regex, diag);
    }
}

fn check_functions(manifest: &FunctionsManifest, diag: &mut SchemaDiagnostics) {
    check_version(manifest.version, FUNCTIONS_MANIFEST_VERSION, diag);

    for (page, function) in &manifest.pages {
        if page.is_empty() {
            diag.issue("pages", "page key must not be empty");
        }
        if let Some(memory) = function.memory
            && !MEMORY_RANGE.contains(&memory)
        {
            diag.issue(
                format!("pages.{page}.memory"),
                format!(
                    "must be between {} and {} MB, found {memory}",
                    MEMORY_RANGE.start(),
                    MEMORY_RANGE.end()
                ),
            );
        }
        if let Some(duration) = function.max_duration
            && !MAX_DURATION_RANGE.contains(&duration)
        {
            diag.issue(
                format!("pages.{page}.maxDuration"),
                format!(
                    "must be between {} and {} seconds, found {duration}",
                    MAX_DURATION_RANGE.start(),
                    MAX_DURATION_RANGE.end()
                ),
            );
        }
        if let Some(runtime) = &function.runtime {
            check_non_empty(format!("pages.{page}.runtime"), runtime, diag);
        }
    }
}

// ============================================================================
// tests
// ============================================================================
