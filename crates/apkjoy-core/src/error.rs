//! Error types for APK extraction operations.

use std::fmt;
use thiserror::Error;

/// Result type alias using `ApkError`.
pub type Result<T> = std::result::Result<T, ApkError>;

/// Machine-readable error code reported across the host boundary.
///
/// The host UI only distinguishes these three codes; the human-readable
/// message carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request itself was malformed (missing or empty package name).
    Invalid,
    /// The package is not installed or the registry lookup failed.
    NotFound,
    /// Any other failure, including all I/O errors.
    Error,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::NotFound => "NOT_FOUND",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Errors that can occur while extracting an installed package.
#[derive(Error, Debug)]
pub enum ApkError {
    /// The request was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The package could not be resolved through the application registry.
    #[error("package not found: {package} ({reason})")]
    NotFound {
        /// Package identifier that was looked up.
        package: String,
        /// Why the registry could not resolve it.
        reason: String,
    },

    /// I/O operation failed (directory creation, open, read, write, flush).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a usable Android package.
    #[error("invalid APK: {0}")]
    InvalidApk(String),
}

impl ApkError {
    /// Creates a `NotFound` error for `package`.
    pub fn not_found(package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            package: package.into(),
            reason: reason.into(),
        }
    }

    /// Returns the boundary error code for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use apkjoy_core::ApkError;
    ///
    /// let err = ApkError::InvalidArgument("Missing packageName".into());
    /// assert_eq!(err.code().as_str(), "INVALID");
    ///
    /// let err = ApkError::not_found("com.example", "not installed");
    /// assert_eq!(err.code().as_str(), "NOT_FOUND");
    /// ```
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::Invalid,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Io(_) | Self::InvalidApk(_) => ErrorCode::Error,
        }
    }

    /// Returns the package a `NotFound` error refers to.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::NotFound { package, .. } => Some(package),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApkError::InvalidArgument("Missing packageName".into());
        assert_eq!(err.to_string(), "invalid argument: Missing packageName");

        let err = ApkError::not_found("com.example.app", "not installed");
        assert_eq!(
            err.to_string(),
            "package not found: com.example.app (not installed)"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApkError::InvalidArgument(String::new()).code(),
            ErrorCode::Invalid
        );
        assert_eq!(ApkError::not_found("a", "b").code(), ErrorCode::NotFound);
        assert_eq!(
            ApkError::Io(std::io::Error::other("disk full")).code(),
            ErrorCode::Error
        );
        assert_eq!(ApkError::InvalidApk("bad".into()).code(), ErrorCode::Error);
    }

    #[test]
    fn test_code_wire_strings() {
        assert_eq!(ErrorCode::Invalid.to_string(), "INVALID");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCode::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ApkError = io_err.into();
        assert!(matches!(err, ApkError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_package_accessor() {
        let err = ApkError::not_found("com.example.app", "not installed");
        assert_eq!(err.package(), Some("com.example.app"));
        assert_eq!(ApkError::InvalidApk("x".into()).package(), None);
    }
}
