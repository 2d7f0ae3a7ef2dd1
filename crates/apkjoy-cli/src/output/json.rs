//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::commands::list::ExtractedApk;
use anyhow::Result;
use apkjoy_core::ApkError;
use apkjoy_core::ApkInfo;
use apkjoy_core::ExtractionResult;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ApkInfoOutput {
    path: String,
    entries: usize,
    uncompressed_size: u64,
    compressed_size: u64,
    dex_files: usize,
    native_abis: Vec<String>,
    has_v1_signature: bool,
}

impl From<&ApkInfo> for ApkInfoOutput {
    fn from(info: &ApkInfo) -> Self {
        Self {
            path: info.path.display().to_string(),
            entries: info.entries,
            uncompressed_size: info.uncompressed_size,
            compressed_size: info.compressed_size,
            dex_files: info.dex_files,
            native_abis: info.native_abis.clone(),
            has_v1_signature: info.has_v1_signature,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(
        &self,
        result: &ExtractionResult,
        info: Option<&ApkInfo>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput {
            package: String,
            destination: String,
            source: String,
            bytes_copied: u64,
            created_parent_dirs: bool,
            duration_ms: u128,
            #[serde(skip_serializing_if = "Option::is_none")]
            apk: Option<ApkInfoOutput>,
        }

        let report = &result.report;
        let data = ExtractionOutput {
            package: report.package.clone(),
            destination: result.destination.display().to_string(),
            source: report.source.display().to_string(),
            bytes_copied: report.bytes_copied,
            created_parent_dirs: report.created_parent_dirs,
            duration_ms: report.duration.as_millis(),
            apk: info.map(ApkInfoOutput::from),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_source_path(&self, package: &str, source: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct PathOutput {
            package: String,
            source: String,
        }

        let data = PathOutput {
            package: package.to_string(),
            source: source.display().to_string(),
        };

        Self::output(&JsonOutput::success("path", data))
    }

    fn format_apk_info(&self, info: &ApkInfo) -> Result<()> {
        Self::output(&JsonOutput::success("verify", ApkInfoOutput::from(info)))
    }

    fn format_extracted_list(
        &self,
        dir: &Path,
        apks: &[ExtractedApk],
        _human_readable: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            directory: String,
            packages: &'a [ExtractedApk],
        }

        let data = ListOutput {
            directory: dir.display().to_string(),
            packages: apks,
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_failure(&self, operation: &str, error: &ApkError) {
        let _ = Self::output(&JsonOutput::error(operation, error));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apk_info_output_fields() {
        let info = ApkInfo {
            path: PathBuf::from("app.apk"),
            entries: 3,
            uncompressed_size: 100,
            compressed_size: 60,
            dex_files: 1,
            native_abis: vec!["arm64-v8a".to_string()],
            has_v1_signature: true,
        };

        let json = serde_json::to_value(ApkInfoOutput::from(&info)).unwrap();
        assert_eq!(json["path"], "app.apk");
        assert_eq!(json["dex_files"], 1);
        assert_eq!(json["native_abis"][0], "arm64-v8a");
        assert_eq!(json["has_v1_signature"], true);
    }
}
