//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `relative_path` - lexical path from one directory to another

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// use vercout::utils::path::normalize_path;
/// let abs = normalize_path(Path::new("./dist/client"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Path to `target` as seen from directory `from`.
///
/// Purely lexical: both paths should be absolute and normalized.
///
/// # Example
/// ```ignore
/// relative_path(Path::new("/site/.output/_entries"), Path::new("/site/dist/server"))
///     // -> "../../dist/server"
/// ```
pub fn relative_path(from: &Path, target: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let target: Vec<Component> = target.components().collect();

    let common = from
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative: PathBuf = from[common..].iter().map(|_| Component::ParentDir).collect();
    relative.extend(&target[common..]);
    relative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_relative_path_sibling() {
        assert_eq!(
            relative_path(
                Path::new("/site/.output/_entries"),
                Path::new("/site/dist/server/importBuild")
            ),
            PathBuf::from("../../dist/server/importBuild")
        );
    }

    #[test]
    fn test_relative_path_child() {
        assert_eq!(
            relative_path(Path::new("/site"), Path::new("/site/dist/server")),
            PathBuf::from("dist/server")
        );
    }

    #[test]
    fn test_relative_path_same_dir() {
        assert_eq!(
            relative_path(Path::new("/site"), Path::new("/site")),
            PathBuf::new()
        );
    }
}
