//! Extract installed Android application packages to disk.
//!
//! `apkjoy-core` resolves an installed package identifier to its package
//! file through an application registry and copies that file, byte for
//! byte, to a destination of the caller's choosing (or to
//! `<storage-root>/ExtractedAPKs/<package>.apk`).
//!
//! # Examples
//!
//! ```no_run
//! use apkjoy_core::ApkExtractor;
//! use apkjoy_core::ExtractionRequest;
//! use apkjoy_core::registry::default_registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ApkExtractor::new(default_registry(), "/sdcard/Download");
//! let result = extractor.extract(&ExtractionRequest::new("org.fdroid.fdroid"))?;
//! println!("Extracted {} bytes to {}", result.report.bytes_copied, result.destination.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod bridge;
pub mod config;
pub mod copy;
pub mod error;
pub mod extractor;
pub mod inspect;
pub mod progress;
pub mod registry;
pub mod report;
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::extract_apk;
pub use config::ExtractConfig;
pub use error::ApkError;
pub use error::ErrorCode;
pub use error::Result;
pub use extractor::ApkExtractor;
pub use extractor::ExtractionRequest;
pub use inspect::ApkInfo;
pub use inspect::inspect_apk;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use registry::PackageRegistry;
pub use report::ExtractionReport;
pub use report::ExtractionResult;
