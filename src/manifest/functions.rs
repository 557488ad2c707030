//! Functions manifest synthesis.

use super::{FUNCTIONS_MANIFEST_VERSION, FunctionConfig, FunctionsManifest, ManifestError, schema};
use std::collections::BTreeMap;

/// Wrap per-page function settings into a versioned manifest.
pub fn synthesize(
    pages: BTreeMap<String, FunctionConfig>,
) -> Result<FunctionsManifest, ManifestError> {
    let manifest = FunctionsManifest {
        version: FUNCTIONS_MANIFEST_VERSION,
        pages,
    };
    schema::validate_functions(&manifest)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pages_pass_through() {
        let mut pages = BTreeMap::new();
        pages.insert(
            "api/ssr_.js".to_string(),
            FunctionConfig {
                memory: Some(1024),
                max_duration: Some(10),
                ..FunctionConfig::default()
            },
        );

        let manifest = synthesize(pages).unwrap();
        assert_eq!(
            serde_json::to_value(&manifest).unwrap(),
            json!({
                "version": 1,
                "pages": { "api/ssr_.js": { "memory": 1024, "maxDuration": 10 } }
            })
        );
    }

    #[test]
    fn test_empty_pages() {
        let manifest = synthesize(BTreeMap::new()).unwrap();
        assert_eq!(manifest.version, 1);
        assert!(manifest.pages.is_empty());
    }

    #[test]
    fn test_out_of_range_duration_is_rejected() {
        let mut pages = BTreeMap::new();
        pages.insert(
            "ssr_.js".to_string(),
            FunctionConfig {
                max_duration: Some(0),
                ..FunctionConfig::default()
            },
        );
        assert!(matches!(synthesize(pages), Err(ManifestError::Schema(_))));
    }
}
