//! High-level public API for package extraction.

use std::path::Path;
use std::path::PathBuf;

use crate::ApkExtractor;
use crate::ExtractionRequest;
use crate::Result;
use crate::registry::PackageRegistry;

/// Extracts an installed package and returns the path it was written to.
///
/// This is the one-call form of [`ApkExtractor::extract`] with the default
/// configuration.
///
/// # Arguments
///
/// * `registry` - Registry used to locate the installed package file
/// * `storage_root` - Application-private directory for default destinations
/// * `package` - Identifier of the installed package
/// * `destination` - Where to write the package; `None` writes to
///   `<storage_root>/ExtractedAPKs/<package>.apk`
///
/// # Errors
///
/// Returns an error if:
/// - `package` is empty or malformed
/// - The registry does not know the package
/// - The package cannot be read or the destination cannot be written
///
/// # Examples
///
/// ```no_run
/// use apkjoy_core::extract_apk;
/// use apkjoy_core::registry::PmRegistry;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = extract_apk(&PmRegistry::new(), "/sdcard", "com.android.settings", None)?;
/// println!("Extracted to {}", path.display());
/// # Ok(())
/// # }
/// ```
pub fn extract_apk<R: PackageRegistry, P: AsRef<Path>>(
    registry: R,
    storage_root: P,
    package: &str,
    destination: Option<&Path>,
) -> Result<PathBuf> {
    let extractor = ApkExtractor::new(registry, storage_root.as_ref());

    let mut request = ExtractionRequest::new(package);
    request.destination = destination.map(Path::to_path_buf);

    extractor.extract(&request).map(crate::ExtractionResult::into_destination)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ApkError;
    use crate::registry::StaticRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_extract_apk_default_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("base.apk");
        std::fs::write(&source, b"apk bytes").unwrap();
        let registry = StaticRegistry::new().with_package("com.example", &source);

        let path = extract_apk(&registry, temp.path(), "com.example", None).unwrap();

        assert_eq!(path, temp.path().join("ExtractedAPKs/com.example.apk"));
        assert_eq!(std::fs::read(path).unwrap(), b"apk bytes");
    }

    #[test]
    fn test_extract_apk_explicit_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("base.apk");
        std::fs::write(&source, b"apk bytes").unwrap();
        let registry = StaticRegistry::new().with_package("com.example", &source);
        let destination = temp.path().join("picked/by/user.apk");

        let path = extract_apk(&registry, temp.path(), "com.example", Some(&destination)).unwrap();
        assert_eq!(path, destination);
    }

    #[test]
    fn test_extract_apk_not_found() {
        let temp = TempDir::new().unwrap();
        let result = extract_apk(StaticRegistry::new(), temp.path(), "com.example", None);
        assert!(matches!(result, Err(ApkError::NotFound { .. })));
    }
}
