//! Fixed, in-memory registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use super::PackageRegistry;
use crate::ApkError;
use crate::Result;

/// Registry backed by a fixed package → path map.
///
/// Useful for tests and for hosts that already know where packages live
/// (for example from a mirrored `/data/app` tree). The map can be loaded from
/// a JSON object of the form `{"com.example.app": "/path/to/base.apk"}`.
///
/// # Examples
///
/// ```
/// use apkjoy_core::registry::{PackageRegistry, StaticRegistry};
///
/// let registry = StaticRegistry::new().with_package("com.example.app", "/data/app/base.apk");
/// assert!(registry.resolve_source_path("com.example.app").is_ok());
/// assert!(registry.resolve_source_path("com.other").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRegistry {
    packages: BTreeMap<String, PathBuf>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package and returns the registry.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(package, path);
        self
    }

    /// Adds or replaces a package.
    pub fn insert(&mut self, package: impl Into<String>, path: impl Into<PathBuf>) {
        self.packages.insert(package.into(), path.into());
    }

    /// Parses a registry from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let packages: BTreeMap<String, PathBuf> = serde_json::from_str(json)
            .map_err(|e| ApkError::InvalidArgument(format!("invalid registry file: {e}")))?;
        Ok(Self { packages })
    }

    /// Loads a registry from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of known packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the registry knows no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterates over the known package identifiers in sorted order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

impl PackageRegistry for StaticRegistry {
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| ApkError::not_found(package, "not installed"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup() {
        let mut registry = StaticRegistry::new();
        assert!(registry.is_empty());
        registry.insert("com.example.app", "/data/app/example/base.apk");

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve_source_path("com.example.app").unwrap(),
            PathBuf::from("/data/app/example/base.apk")
        );
    }

    #[test]
    fn test_unknown_package_is_not_found() {
        let registry = StaticRegistry::new();
        let err = registry.resolve_source_path("com.missing").unwrap_err();
        assert!(matches!(err, ApkError::NotFound { .. }));
        assert_eq!(err.package(), Some("com.missing"));
    }

    #[test]
    fn test_from_json() {
        let registry = StaticRegistry::from_json(
            r#"{"com.b": "/data/app/b/base.apk", "com.a": "/data/app/a/base.apk"}"#,
        )
        .unwrap();
        assert_eq!(registry.packages().collect::<Vec<_>>(), vec!["com.a", "com.b"]);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = StaticRegistry::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ApkError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("packages.json");
        fs::write(&path, r#"{"com.example": "/tmp/base.apk"}"#).unwrap();

        let registry = StaticRegistry::from_json_file(&path).unwrap();
        assert_eq!(registry.len(), 1);

        let missing = StaticRegistry::from_json_file(&temp.path().join("nope.json"));
        assert!(matches!(missing, Err(ApkError::Io(_))));
    }
}
