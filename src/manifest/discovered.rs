//! Route data discovered during the prerender pass.
//!
//! Every field is optional: whatever is missing here is resolved from the
//! pre-declared manifest in `vercout.toml`, then from global defaults.

use super::{DynamicRouteRule, HeaderRule, RewriteRule};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiscoveredRoutes {
    #[serde(default)]
    pub isr: Option<IsrRoutes>,
    #[serde(default)]
    pub ssr: Option<SsrRoutes>,
}

/// Routes eligible for incremental static regeneration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IsrRoutes {
    pub routes: BTreeMap<String, IsrRoute>,
    pub dynamic_routes: BTreeMap<String, IsrDynamicRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IsrRoute {
    pub initial_revalidate_seconds: Option<u64>,
    pub src_route: Option<String>,
    pub data_route: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IsrDynamicRoute {
    pub route_regex: Option<String>,
    /// `None`: not provided. `Some(None)`: explicitly `null`.
    #[serde(deserialize_with = "present")]
    pub fallback: Option<Option<String>>,
    pub data_route: Option<String>,
    pub data_route_regex: Option<String>,
}

/// Rules for pages that are rendered on request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SsrRoutes {
    pub rewrites: Vec<RewriteRule>,
    pub dynamic_routes: Vec<DynamicRouteRule>,
    pub headers: Vec<HeaderRule>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
