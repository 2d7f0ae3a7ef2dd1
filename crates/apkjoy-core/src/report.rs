//! Extraction operation reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a single package extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Package identifier that was extracted.
    pub package: String,

    /// Installed package file the bytes were read from.
    pub source: PathBuf,

    /// Total bytes written to the destination.
    pub bytes_copied: u64,

    /// Whether the destination's parent directory had to be created.
    pub created_parent_dirs: bool,

    /// Duration of the copy, including directory creation.
    pub duration: Duration,
}

/// Successful outcome of [`ApkExtractor::extract`](crate::ApkExtractor::extract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Absolute path the package was written to.
    pub destination: PathBuf,

    /// Statistics about the copy.
    pub report: ExtractionReport,
}

impl ExtractionResult {
    /// Returns the resolved destination path.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Consumes the result and returns the destination path.
    #[must_use]
    pub fn into_destination(self) -> PathBuf {
        self.destination
    }
}
