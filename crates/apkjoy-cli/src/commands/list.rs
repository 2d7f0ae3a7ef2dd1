//! List command implementation

use super::storage_root;
use crate::cli::ListArgs;
use crate::error::convert_storage_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use apkjoy_core::ApkError;
use apkjoy_core::config::DEFAULT_OUTPUT_DIR;
use serde::Serialize;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// One package file found in the extraction directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedApk {
    /// File stem, which is the package identifier for default destinations.
    pub package: String,
    pub path: String,
    pub size: u64,
}

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let dir = match storage_root(args.storage_root.as_deref()) {
        Ok(root) => root.join(DEFAULT_OUTPUT_DIR),
        Err(err) => return Err(fail(formatter, ApkError::Io(err), Path::new("."))),
    };

    match scan(&dir) {
        Ok(apks) => formatter.format_extracted_list(&dir, &apks, args.human_readable),
        Err(err) => Err(fail(formatter, err, &dir)),
    }
}

fn fail(formatter: &dyn OutputFormatter, err: ApkError, dir: &Path) -> anyhow::Error {
    formatter.format_failure("list", &err);
    convert_storage_error(err, dir)
}

/// Collects `*.apk` files directly inside `dir`, sorted by name. A missing
/// directory means nothing was extracted yet.
pub fn scan(dir: &Path) -> apkjoy_core::Result<Vec<ExtractedApk>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(ApkError::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let mut apks = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();

        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| !ext.eq_ignore_ascii_case("apk"))
        {
            continue;
        }

        let size = entry.metadata().map_err(io::Error::from)?.len();

        apks.push(ExtractedApk {
            package: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.display().to_string(),
            size,
        });
    }

    Ok(apks)
}
