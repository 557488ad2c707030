//! Deployment manifests.
//!
//! Three versioned JSON documents are emitted at the root of the output
//! directory:
//!
//! | File                      | Version | Built by                  |
//! |---------------------------|---------|---------------------------|
//! | `prerender-manifest.json` | 3       | [`prerender::synthesize`] |
//! | `routes-manifest.json`    | 3       | [`routes::synthesize`]    |
//! | `functions-manifest.json` | 1       | [`functions::synthesize`] |
//!
//! Every synthesizer validates its document with [`schema`] before handing
//! it back, so a value of any of these types is well-formed.

pub mod discovered;
mod error;
pub mod functions;
pub mod prerender;
pub mod routes;
pub mod schema;

pub use discovered::{DiscoveredRoutes, IsrDynamicRoute, IsrRoute, IsrRoutes, SsrRoutes};
pub use error::{ManifestError, SchemaDiagnostics};

use crate::config::ProjectConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const PRERENDER_MANIFEST_VERSION: u8 = 3;
pub const ROUTES_MANIFEST_VERSION: u8 = 3;
pub const FUNCTIONS_MANIFEST_VERSION: u8 = 1;

/// Revalidation interval used when no source provides one (one day).
pub const DEFAULT_REVALIDATE_SECONDS: u64 = 86_400;
pub const DEFAULT_BASE_PATH: &str = "/";

// ============================================================================
// Manifest kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Prerender,
    Routes,
    Functions,
}

impl ManifestKind {
    pub const ALL: [Self; 3] = [Self::Prerender, Self::Routes, Self::Functions];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Prerender => "prerender-manifest",
            Self::Routes => "routes-manifest",
            Self::Functions => "functions-manifest",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Prerender => "prerender-manifest.json",
            Self::Routes => "routes-manifest.json",
            Self::Functions => "functions-manifest.json",
        }
    }

    /// Where this manifest is written for the given output directory.
    pub fn destination(self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Prerender manifest
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderManifest {
    pub version: u8,
    pub routes: BTreeMap<String, PrerenderRoute>,
    pub dynamic_routes: BTreeMap<String, PrerenderDynamicRoute>,
    pub preview: Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderRoute {
    pub initial_revalidate_seconds: u64,
    pub src_route: String,
    pub data_route: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderDynamicRoute {
    pub route_regex: String,
    /// `None` serializes as `null`: no static fallback page.
    pub fallback: Option<String>,
    pub data_route: String,
    pub data_route_regex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub preview_mode_id: Option<String>,
}

// ============================================================================
// Routes manifest
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesManifest {
    pub version: u8,
    pub base_path: String,
    pub pages404: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_routes: Option<Vec<DynamicRouteRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrites: Option<Vec<RewriteRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirects: Option<Vec<RedirectRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderRule>>,
}

// Rule types are shared with `vercout.toml`, so multi-word fields accept
// the snake_case spelling as an alias.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub source: String,
    pub destination: String,
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    #[serde(rename = "statusCode", alias = "status_code")]
    pub status_code: u16,
    pub regex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRule {
    pub source: String,
    pub regex: String,
    pub headers: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRouteRule {
    pub page: String,
    pub regex: String,
}

// ============================================================================
// Functions manifest
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionsManifest {
    pub version: u8,
    pub pages: BTreeMap<String, FunctionConfig>,
}

/// Settings for one serverless function, keyed by its output page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Memory in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    /// Execution limit in seconds.
    #[serde(
        rename = "maxDuration",
        alias = "max_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
}

// ============================================================================
// Writing
// ============================================================================

/// The three documents of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifests {
    pub prerender: PrerenderManifest,
    pub routes: RoutesManifest,
    pub functions: FunctionsManifest,
}

impl Manifests {
    /// Synthesize all three manifests. Fails before anything is written.
    pub fn synthesize(
        config: &ProjectConfig,
        discovered: &DiscoveredRoutes,
        pages: BTreeMap<String, FunctionConfig>,
    ) -> Result<Self, ManifestError> {
        Ok(Self {
            prerender: prerender::synthesize(config, discovered.isr.as_ref())?,
            routes: routes::synthesize(config, discovered.ssr.as_ref())?,
            functions: functions::synthesize(pages)?,
        })
    }

    /// Serialize every document first, then write them under `output_dir`.
    ///
    /// Returns the written paths in [`ManifestKind::ALL`] order.
    pub fn write(&self, output_dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
        let documents = [
            (ManifestKind::Prerender, to_json(ManifestKind::Prerender, &self.prerender)?),
            (ManifestKind::Routes, to_json(ManifestKind::Routes, &self.routes)?),
            (ManifestKind::Functions, to_json(ManifestKind::Functions, &self.functions)?),
        ];

        fs::create_dir_all(output_dir)
            .map_err(|err| ManifestError::Io(output_dir.to_path_buf(), err))?;

        let mut written = Vec::with_capacity(documents.len());
        for (kind, json) in documents {
            let path = kind.destination(output_dir);
            fs::write(&path, json).map_err(|err| ManifestError::Io(path.clone(), err))?;
            written.push(path);
        }
        Ok(written)
    }
}

fn to_json<T: Serialize>(kind: ManifestKind, document: &T) -> Result<String, ManifestError> {
    let mut json =
        serde_json::to_string_pretty(document).map_err(|err| ManifestError::Json(kind, err))?;
    json.push('\n');
    Ok(json)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use serde_json::json;
    use tempfile::TempDir;

    fn empty_routes_manifest() -> RoutesManifest {
        RoutesManifest {
            version: ROUTES_MANIFEST_VERSION,
            base_path: DEFAULT_BASE_PATH.to_string(),
            pages404: true,
            dynamic_routes: None,
            rewrites: None,
            redirects: None,
            headers: None,
        }
    }

    #[test]
    fn test_destinations() {
        let dir = Path::new("/site/.output");
        assert_eq!(
            ManifestKind::Prerender.destination(dir),
            PathBuf::from("/site/.output/prerender-manifest.json")
        );
        assert_eq!(
            ManifestKind::Routes.destination(dir),
            PathBuf::from("/site/.output/routes-manifest.json")
        );
        assert_eq!(
            ManifestKind::Functions.destination(dir),
            PathBuf::from("/site/.output/functions-manifest.json")
        );
    }

    #[test]
    fn test_routes_manifest_omits_absent_arrays() {
        let value = serde_json::to_value(empty_routes_manifest()).unwrap();
        assert_eq!(
            value,
            json!({ "version": 3, "basePath": "/", "pages404": true })
        );
    }

    #[test]
    fn test_routes_manifest_keeps_explicit_empty_redirects() {
        let manifest = RoutesManifest {
            redirects: Some(Vec::new()),
            ..empty_routes_manifest()
        };
        let value = serde_json::to_value(manifest).unwrap();
        assert_eq!(value["redirects"], json!([]));
        assert!(value.get("rewrites").is_none());
    }

    #[test]
    fn test_redirect_rule_wire_names() {
        let rule = RedirectRule {
            source: "/old".to_string(),
            destination: "/new".to_string(),
            status_code: 308,
            regex: "^/old$".to_string(),
        };
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["statusCode"], json!(308));

        // config spelling is accepted too
        let parsed: RedirectRule = toml::from_str(
            "source = \"/old\"\ndestination = \"/new\"\nstatus_code = 308\nregex = \"^/old$\"",
        )
        .unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn test_prerender_fallback_null_is_serialized() {
        let route = PrerenderDynamicRoute {
            route_regex: "^/blog/(.+)$".to_string(),
            fallback: None,
            data_route: String::new(),
            data_route_regex: String::new(),
        };
        let value = serde_json::to_value(route).unwrap();
        assert_eq!(
            value,
            json!({
                "routeRegex": "^/blog/(.+)$",
                "fallback": null,
                "dataRoute": "",
                "dataRouteRegex": ""
            })
        );
    }

    #[test]
    fn test_function_config_skips_unset_fields() {
        let config = FunctionConfig {
            max_duration: Some(10),
            ..FunctionConfig::default()
        };
        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({ "maxDuration": 10 })
        );
    }

    #[test]
    fn test_write_all_manifests() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config("");
        let manifests =
            Manifests::synthesize(&config, &DiscoveredRoutes::default(), BTreeMap::new()).unwrap();

        let written = manifests.write(dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let routes: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("routes-manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(routes, json!({ "version": 3, "basePath": "/", "pages404": true }));

        let prerender: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("prerender-manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            prerender,
            json!({
                "version": 3,
                "routes": {},
                "dynamicRoutes": {},
                "preview": { "previewModeId": null }
            })
        );
    }
}
