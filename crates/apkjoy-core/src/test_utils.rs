//! Test utilities for building package fixtures.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Builder for in-memory APK-shaped ZIP archives.
///
/// Entries are stored uncompressed.
///
/// # Examples
///
/// ```
/// use apkjoy_core::test_utils::ApkTestBuilder;
///
/// let apk = ApkTestBuilder::new()
///     .add_file("AndroidManifest.xml", b"<manifest/>")
///     .add_file("classes.dex", b"dex\n035")
///     .build();
/// assert!(apk.starts_with(b"PK"));
/// ```
pub struct ApkTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ApkTestBuilder {
    /// Creates an empty archive builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a file entry.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ApkTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the smallest archive [`inspect_apk`](crate::inspect_apk) accepts.
#[must_use]
pub fn minimal_apk() -> Vec<u8> {
    ApkTestBuilder::new()
        .add_file("AndroidManifest.xml", b"<manifest/>")
        .add_file("classes.dex", b"dex\n035")
        .build()
}
