//! Application registry lookups.
//!
//! A registry maps an installed package identifier to the on-disk path of
//! its installed package file. The extractor only depends on the
//! [`PackageRegistry`] trait, so hosts and tests can substitute their own.

use std::path::PathBuf;

use crate::ApkError;
use crate::Result;

#[cfg(target_os = "android")]
#[allow(unsafe_code)]
pub mod android;
pub mod pm;
pub mod static_map;

#[cfg(target_os = "android")]
pub use android::AndroidRegistry;
pub use pm::PmRegistry;
pub use static_map::StaticRegistry;

/// Resolves installed packages to their source package file.
pub trait PackageRegistry: Send + Sync {
    /// Returns the path of the installed package file for `package`.
    ///
    /// # Errors
    ///
    /// Returns [`ApkError::NotFound`] if the package is not installed or the
    /// lookup itself fails.
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf>;
}

impl<T: PackageRegistry + ?Sized> PackageRegistry for &T {
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf> {
        (**self).resolve_source_path(package)
    }
}

impl<T: PackageRegistry + ?Sized> PackageRegistry for Box<T> {
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf> {
        (**self).resolve_source_path(package)
    }
}

/// Returns the registry for the platform the crate was built for.
///
/// On Android this queries the system `PackageManager` through JNI;
/// elsewhere it runs the `pm` shell tool.
pub fn default_registry() -> Box<dyn PackageRegistry> {
    #[cfg(target_os = "android")]
    {
        Box::new(AndroidRegistry::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        Box::new(PmRegistry::new())
    }
}

/// Checks that `package` can be used as a package identifier.
///
/// Identifiers are joined onto the storage root to build default
/// destinations, so anything that could name another directory is rejected.
/// A leading `-` is rejected too since `pm` would read it as an option.
///
/// # Examples
///
/// ```
/// use apkjoy_core::registry::validate_package_name;
///
/// assert!(validate_package_name("com.example.app").is_ok());
/// assert!(validate_package_name("").is_err());
/// assert!(validate_package_name("../etc").is_err());
/// ```
pub fn validate_package_name(package: &str) -> Result<()> {
    if package.is_empty() {
        return Err(ApkError::InvalidArgument("Missing packageName".to_string()));
    }
    if package == "." || package == ".." || package.starts_with('-') {
        return Err(ApkError::InvalidArgument(format!(
            "invalid package name: {package:?}"
        )));
    }
    if let Some(bad) = package
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\'))
    {
        return Err(ApkError::InvalidArgument(format!(
            "invalid character {bad:?} in package name {package:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        for name in ["com.example.app", "org.fdroid.fdroid", "a", "com.x_y.z1"] {
            validate_package_name(name).unwrap();
        }
    }

    #[test]
    fn test_empty_package_name() {
        let err = validate_package_name("").unwrap_err();
        assert!(matches!(err, ApkError::InvalidArgument(_)));
        assert!(err.to_string().contains("Missing packageName"));
    }

    #[test]
    fn test_rejects_path_like_names() {
        for name in [".", "..", "com/example", "..\\x", "com example", "com\0x", "a\nb"] {
            assert!(
                validate_package_name(name).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_option_like_names() {
        for name in ["-f", "--user", "-com.example.app"] {
            let err = validate_package_name(name).unwrap_err();
            assert!(matches!(err, ApkError::InvalidArgument(_)), "{name:?}");
        }
        validate_package_name("com.example-app").unwrap();
    }

    #[test]
    fn test_registry_through_reference_and_box() {
        let registry = StaticRegistry::new().with_package("com.example", "/data/app/base.apk");
        let by_ref: &dyn PackageRegistry = &registry;
        assert_eq!(
            by_ref.resolve_source_path("com.example").unwrap(),
            PathBuf::from("/data/app/base.apk")
        );

        let boxed: Box<dyn PackageRegistry> = Box::new(registry);
        assert!(boxed.resolve_source_path("com.missing").is_err());
    }
}
