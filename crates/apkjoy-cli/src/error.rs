//! Error conversion utilities for CLI.
//!
//! Converts apkjoy-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use apkjoy_core::ApkError;
use apkjoy_core::config::MAX_BUFFER_SIZE;
use std::path::Path;

/// Converts an extraction or lookup failure for `package` into an anyhow
/// error with a hint.
pub fn convert_package_error(err: ApkError, package: &str) -> anyhow::Error {
    match err {
        ApkError::InvalidArgument(reason) => {
            anyhow!(
                "Invalid request for '{package}': {reason}\n\
                 HINT: Package names look like 'com.example.app'; --buffer-size must be \
                 between 1 and {MAX_BUFFER_SIZE} bytes."
            )
        }
        ApkError::NotFound {
            package: missing,
            reason,
        } => {
            anyhow!(
                "Package '{missing}' could not be resolved: {reason}\n\
                 HINT: Check the name with 'pm list packages', or pass --registry-file \
                 to resolve packages from a JSON map."
            )
        }
        ApkError::Io(io_err) => {
            anyhow!(
                "I/O error while extracting '{package}': {io_err}\n\
                 HINT: Check that the destination directory is writable and has free space."
            )
        }
        ApkError::InvalidApk(reason) => {
            anyhow!(
                "Extracted file for '{package}' is not a valid APK: {reason}\n\
                 HINT: Split installs keep code in extra APKs next to base.apk."
            )
        }
    }
}

/// Converts an inspection failure for the file at `apk` into an anyhow
/// error with a hint.
pub fn convert_inspect_error(err: ApkError, apk: &Path) -> anyhow::Error {
    match err {
        ApkError::InvalidApk(reason) => {
            anyhow!(
                "Invalid APK '{}': {reason}\n\
                 HINT: The file may be truncated or may not be an Android package.",
                apk.display()
            )
        }
        ApkError::Io(io_err) => {
            anyhow!("I/O error while reading '{}': {io_err}", apk.display())
        }
        _ => anyhow::Error::from(err).context(format!("Error inspecting '{}'", apk.display())),
    }
}

/// Converts a failure while reading the extraction directory `dir` into an
/// anyhow error with a hint.
pub fn convert_storage_error(err: ApkError, dir: &Path) -> anyhow::Error {
    match err {
        ApkError::Io(io_err) => {
            anyhow!(
                "Cannot read extracted packages in '{}': {io_err}\n\
                 HINT: Point --storage-root at the directory extractions were written under.",
                dir.display()
            )
        }
        _ => anyhow::Error::from(err).context(format!("Error listing '{}'", dir.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_convert_not_found_error() {
        let err = ApkError::not_found("com.missing", "not installed");
        let converted = convert_package_error(err, "com.missing");
        let msg = format!("{converted:?}");
        assert!(msg.contains("com.missing"));
        assert!(msg.contains("not installed"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_invalid_argument_error() {
        let err = ApkError::InvalidArgument("Missing packageName".to_string());
        let msg = format!("{:?}", convert_package_error(err, ""));
        assert!(msg.contains("Missing packageName"));
        assert!(msg.contains("--buffer-size"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_package_error(ApkError::Io(io_err), "com.example.app");
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("writable"));
    }

    #[test]
    fn test_convert_inspect_error() {
        let err = ApkError::InvalidApk("not a ZIP archive".to_string());
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("app.apk")));
        assert!(msg.contains("app.apk"));
        assert!(msg.contains("not a ZIP archive"));

        let err = ApkError::not_found("x", "y");
        let msg = format!("{:?}", convert_inspect_error(err, Path::new("app.apk")));
        assert!(msg.contains("Error inspecting 'app.apk'"));
    }

    #[test]
    fn test_convert_storage_error() {
        let io_err = io::Error::new(io::ErrorKind::NotADirectory, "not a directory");
        let msg = format!(
            "{:?}",
            convert_storage_error(ApkError::Io(io_err), Path::new("files/ExtractedAPKs"))
        );
        assert!(msg.contains("files/ExtractedAPKs"));
        assert!(msg.contains("HINT"));
    }
}
