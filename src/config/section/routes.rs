//! `[routes_manifest]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes_manifest]
//! base_path = "/"
//! pages404 = true
//!
//! [[routes_manifest.rewrites]]
//! source = "/dashboard"
//! destination = "/api/ssr_"
//! regex = "^/dashboard.*$"
//!
//! [[routes_manifest.redirects]]
//! source = "/old"
//! destination = "/new"
//! status_code = 308
//! regex = "^/old$"
//!
//! [[routes_manifest.headers]]
//! source = "/assets"
//! regex = "^/assets/.*$"
//! headers = [{ key = "cache-control", value = "public, max-age=31536000" }]
//!
//! [[routes_manifest.dynamic_routes]]
//! page = "/blog/[id]"
//! regex = "^/blog/([^/]+?)$"
//! ```
//!
//! A rewrite whose `source` matches a page rendered on request replaces the
//! generated rewrite for that page.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::manifest::{DynamicRouteRule, HeaderRule, RedirectRule, RewriteRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesManifestConfig {
    pub base_path: Option<String>,
    pub pages404: Option<bool>,
    pub rewrites: Vec<RewriteRule>,
    /// Passed through as configured; an empty list stays in the manifest.
    pub redirects: Option<Vec<RedirectRule>>,
    pub headers: Vec<HeaderRule>,
    pub dynamic_routes: Vec<DynamicRouteRule>,
}

impl RoutesManifestConfig {
    /// The configured rewrite for `source`, if any.
    pub fn rewrite_for(&self, source: &str) -> Option<&RewriteRule> {
        self.rewrites.iter().find(|rule| rule.source == source)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(base_path) = &self.base_path
            && !base_path.starts_with('/')
        {
            diag.error_with_hint(
                FieldPath::new("routes_manifest.base_path"),
                "must start with `/`",
                format!("use `/{base_path}`"),
            );
        }

        for (i, rule) in self.rewrites.iter().enumerate() {
            non_empty("routes_manifest.rewrites", i, "source", &rule.source, diag);
            non_empty("routes_manifest.rewrites", i, "destination", &rule.destination, diag);
        }

        for (i, rule) in self.redirects.iter().flatten().enumerate() {
            non_empty("routes_manifest.redirects", i, "source", &rule.source, diag);
            non_empty("routes_manifest.redirects", i, "destination", &rule.destination, diag);
            if !(300..=399).contains(&rule.status_code) {
                diag.error_with_hint(
                    FieldPath::item("routes_manifest.redirects", i, "status_code"),
                    format!("{} is not a redirect status", rule.status_code),
                    "use 301, 302, 307 or 308",
                );
            }
        }

        for (i, rule) in self.headers.iter().enumerate() {
            non_empty("routes_manifest.headers", i, "source", &rule.source, diag);
            if rule.headers.is_empty() {
                diag.warn(
                    FieldPath::item("routes_manifest.headers", i, "headers"),
                    "no headers listed, rule has no effect",
                );
            }
        }

        for (i, rule) in self.dynamic_routes.iter().enumerate() {
            non_empty("routes_manifest.dynamic_routes", i, "page", &rule.page, diag);
        }
    }
}

fn non_empty(section: &str, index: usize, field: &str, value: &str, diag: &mut ConfigDiagnostics) {
    if value.is_empty() {
        diag.error(FieldPath::item(section, index, field), "must not be empty");
    }
}
