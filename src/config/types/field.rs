//! Config field path used in diagnostics.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// Dotted path to a field in `vercout.toml`.
///
/// Static sections use [`FieldPath::new`]; per-route tables, whose keys
/// come from the user, use [`FieldPath::entry`].
///
/// # Example
///
/// ```ignore
/// diag.error(FieldPath::new("routes_manifest.base_path"), "must start with `/`");
/// diag.error(
///     FieldPath::entry("prerender_manifest.routes", "/about", "src_route"),
///     "must not be empty",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Path to a field inside a keyed table, quoting the key as TOML does.
    pub fn entry(section: &str, key: &str, field: &str) -> Self {
        Self(Cow::Owned(format!("{section}.\"{key}\".{field}")))
    }

    /// Path to a field inside an array of tables.
    pub fn item(section: &str, index: usize, field: &str) -> Self {
        Self(Cow::Owned(format!("{section}[{index}].{field}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_quotes_key() {
        let path = FieldPath::entry("prerender_manifest.routes", "/about", "src_route");
        assert_eq!(path.as_str(), "prerender_manifest.routes.\"/about\".src_route");
    }

    #[test]
    fn test_item_indexes_array() {
        let path = FieldPath::item("routes_manifest.redirects", 2, "status_code");
        assert_eq!(path.as_str(), "routes_manifest.redirects[2].status_code");
    }
}
