//! `[functions_manifest]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [functions_manifest.pages."api/ssr_.js"]
//! runtime = "nodejs18.x"
//! memory = 1024           # MB, 128..=3008
//! max_duration = 10       # seconds, 1..=900
//! regions = ["iad1"]
//! ```
//!
//! Pages for the SSR endpoints are added with default settings unless
//! listed here.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::manifest::FunctionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SECTION: &str = "functions_manifest.pages";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionsManifestConfig {
    pub pages: BTreeMap<String, FunctionConfig>,
}

impl FunctionsManifestConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (page, function) in &self.pages {
            if page.is_empty() {
                diag.error(FieldPath::new(SECTION), "page key must not be empty");
            }
            if let Some(memory) = function.memory
                && !(128..=3008).contains(&memory)
            {
                diag.error(
                    FieldPath::entry(SECTION, page, "memory"),
                    format!("{memory} MB is outside 128..=3008"),
                );
            }
            if let Some(duration) = function.max_duration
                && !(1..=900).contains(&duration)
            {
                diag.error(
                    FieldPath::entry(SECTION, page, "max_duration"),
                    format!("{duration}s is outside 1..=900"),
                );
            }
            if let Some(regions) = &function.regions
                && regions.is_empty()
            {
                diag.warn(
                    FieldPath::entry(SECTION, page, "regions"),
                    "empty list, the platform default applies",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_parse_pages() {
        let config = test_parse_config(
            r#"
[functions_manifest.pages."api/ssr_.js"]
runtime = "nodejs18.x"
memory = 1024
max_duration = 10
regions = ["iad1"]
"#,
        );
        let page = &config.functions_manifest.pages["api/ssr_.js"];
        assert_eq!(page.runtime.as_deref(), Some("nodejs18.x"));
        assert_eq!(page.memory, Some(1024));
        assert_eq!(page.max_duration, Some(10));
        assert_eq!(page.regions, Some(vec!["iad1".to_string()]));
    }

    #[test]
    fn test_validate_ranges() {
        let config = test_parse_config(
            r#"
[functions_manifest.pages."ssr_.js"]
memory = 64
max_duration = 1000
"#,
        );
        let mut diag = ConfigDiagnostics::new();
        config.functions_manifest.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "functions_manifest.pages.\"ssr_.js\".memory",
                "functions_manifest.pages.\"ssr_.js\".max_duration",
            ]
        );
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let config = test_parse_config(
            r#"
[functions_manifest.pages."ssr_.js"]
memory = 3008
max_duration = 1
"#,
        );
        let mut diag = ConfigDiagnostics::new();
        config.functions_manifest.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
