//! `[prerender_manifest]` section configuration.
//!
//! Pre-declared entries for the prerender manifest. Values discovered during
//! the prerender pass take precedence; these fill whatever was not
//! discovered.
//!
//! # Example
//!
//! ```toml
//! [prerender_manifest]
//! preview_mode_id = "3f8c..."
//!
//! [prerender_manifest.routes."/about"]
//! initial_revalidate_seconds = 60
//! src_route = "/ssr_"
//!
//! [prerender_manifest.dynamic_routes."/blog/[id]"]
//! route_regex = "^/blog/(.+)$"
//! fallback = false                # a page path, or `false` for `null`
//! ```
//!
//! A key in `routes` also marks the page as ISR during the prerender pass,
//! even when the page itself exports no revalidation interval.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerenderManifestConfig {
    /// Published as `preview.previewModeId`.
    pub preview_mode_id: Option<String>,

    /// Static route overrides, keyed by URL path.
    pub routes: BTreeMap<String, RouteOverride>,

    /// Dynamic route overrides, keyed by route pattern.
    pub dynamic_routes: BTreeMap<String, DynamicRouteOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOverride {
    pub initial_revalidate_seconds: Option<u64>,
    pub src_route: Option<String>,
    pub data_route: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicRouteOverride {
    pub route_regex: Option<String>,
    pub fallback: Option<FallbackSetting>,
    pub data_route: Option<String>,
    pub data_route_regex: Option<String>,
}

/// TOML has no `null`, so `false` stands for an explicit null fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackSetting {
    Page(String),
    Enabled(bool),
}

impl FallbackSetting {
    /// `Some(value)` when this setting resolves the fallback.
    ///
    /// `true` resolves nothing; validation rejects it.
    pub fn resolve(&self) -> Option<Option<String>> {
        match self {
            Self::Page(page) => Some(Some(page.clone())),
            Self::Enabled(false) => Some(None),
            Self::Enabled(true) => None,
        }
    }
}

impl PrerenderManifestConfig {
    const ROUTES: &'static str = "prerender_manifest.routes";
    const DYNAMIC_ROUTES: &'static str = "prerender_manifest.dynamic_routes";

    /// Whether `url` is declared as an ISR route.
    pub fn is_declared(&self, url: &str) -> bool {
        self.routes.contains_key(url)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(id) = &self.preview_mode_id
            && id.is_empty()
        {
            diag.error(
                FieldPath::new("prerender_manifest.preview_mode_id"),
                "must not be empty",
            );
        }

        for (key, route) in &self.routes {
            check_key(Self::ROUTES, key, diag);
            if let Some(src) = &route.src_route
                && src.is_empty()
            {
                diag.error(FieldPath::entry(Self::ROUTES, key, "src_route"), "must not be empty");
            }
        }

        for (key, route) in &self.dynamic_routes {
            check_key(Self::DYNAMIC_ROUTES, key, diag);
            if let Some(regex) = &route.route_regex
                && regex.is_empty()
            {
                diag.error(
                    FieldPath::entry(Self::DYNAMIC_ROUTES, key, "route_regex"),
                    "must not be empty",
                );
            }
            if route.fallback == Some(FallbackSetting::Enabled(true)) {
                diag.error_with_hint(
                    FieldPath::entry(Self::DYNAMIC_ROUTES, key, "fallback"),
                    "`true` is not a fallback",
                    "use a page path, or `false` for no fallback page",
                );
            }
        }
    }
}

fn check_key(section: &'static str, key: &str, diag: &mut ConfigDiagnostics) {
    if !key.starts_with('/') {
        diag.error_with_hint(
            FieldPath::new(section),
            format!("route `{key}` must start with `/`"),
            format!("use `/{key}`"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_parse_routes() {
        let config = test_parse_config(
            r#"
[prerender_manifest]
preview_mode_id = "preview"

[prerender_manifest.routes."/about"]
initial_revalidate_seconds = 60
src_route = "/ssr_"
"#,
        );
        let section = &config.prerender_manifest;
        assert_eq!(section.preview_mode_id.as_deref(), Some("preview"));
        assert!(section.is_declared("/about"));
        assert!(!section.is_declared("/contact"));
        assert_eq!(
            section.routes["/about"],
            RouteOverride {
                initial_revalidate_seconds: Some(60),
                src_route: Some("/ssr_".to_string()),
                data_route: None,
            }
        );
    }

    #[test]
    fn test_parse_fallback_variants() {
        let config = test_parse_config(
            r#"
[prerender_manifest.dynamic_routes."/a/[id]"]
fallback = "/a/fallback.html"

[prerender_manifest.dynamic_routes."/b/[id]"]
fallback = false

[prerender_manifest.dynamic_routes."/c/[id]"]
route_regex = "^/c/(.+)$"
"#,
        );
        let routes = &config.prerender_manifest.dynamic_routes;
        assert_eq!(
            routes["/a/[id]"].fallback,
            Some(FallbackSetting::Page("/a/fallback.html".to_string()))
        );
        assert_eq!(routes["/b/[id]"].fallback, Some(FallbackSetting::Enabled(false)));
        assert_eq!(routes["/c/[id]"].fallback, None);
    }

    #[test]
    fn test_fallback_resolve() {
        assert_eq!(
            FallbackSetting::Page("/x.html".into()).resolve(),
            Some(Some("/x.html".to_string()))
        );
        assert_eq!(FallbackSetting::Enabled(false).resolve(), Some(None));
        assert_eq!(FallbackSetting::Enabled(true).resolve(), None);
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let config = test_parse_config(
            r#"
[prerender_manifest.routes."about"]
src_route = ""

[prerender_manifest.dynamic_routes."/x/[id]"]
route_regex = "^/x/(.+)$"
fallback = true
"#,
        );
        let mut diag = ConfigDiagnostics::new();
        config.prerender_manifest.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "prerender_manifest.routes",
                "prerender_manifest.routes.\"about\".src_route",
                "prerender_manifest.dynamic_routes.\"/x/[id]\".fallback",
            ]
        );
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.prerender_manifest.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
