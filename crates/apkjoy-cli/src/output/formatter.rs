//! Output formatter trait for CLI results.

use crate::commands::list::ExtractedApk;
use anyhow::Result;
use apkjoy_core::ApkError;
use apkjoy_core::ApkInfo;
use apkjoy_core::ErrorCode;
use apkjoy_core::ExtractionResult;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format extraction result, with the inspection summary when `--verify`
    /// was given
    fn format_extraction_result(
        &self,
        result: &ExtractionResult,
        info: Option<&ApkInfo>,
    ) -> Result<()>;

    /// Format the installed package file of `package`
    fn format_source_path(&self, package: &str, source: &Path) -> Result<()>;

    /// Format APK inspection summary
    fn format_apk_info(&self, info: &ApkInfo) -> Result<()>;

    /// Format the contents of the extraction directory
    fn format_extracted_list(
        &self,
        dir: &Path,
        apks: &[ExtractedApk],
        human_readable: bool,
    ) -> Result<()>;

    /// Format a failed operation. The error itself is reported on stderr by
    /// `main`.
    fn format_failure(&self, operation: &str, error: &ApkError);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Error payload of a failed operation
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub code: ErrorCode,
    pub message: String,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: &ApkError) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(JsonError {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let err = ApkError::not_found("com.missing", "not installed");
        let json = serde_json::to_value(JsonOutput::error("extract", &err)).unwrap();

        assert_eq!(json["operation"], "extract");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert!(json["error"]["message"].as_str().unwrap().contains("com.missing"));
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(JsonOutput::success("path", "x")).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], "x");
        assert!(json.get("error").is_none());
    }
}
