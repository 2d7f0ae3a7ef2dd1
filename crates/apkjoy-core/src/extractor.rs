//! The package extractor.
//!
//! [`ApkExtractor`] resolves an installed package through a
//! [`PackageRegistry`], makes sure the destination directory exists and
//! copies the package file there byte for byte.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ApkError;
use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::ExtractionResult;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_file;
use crate::registry::PackageRegistry;
use crate::registry::validate_package_name;

/// File extension given to default destinations.
const APK_EXTENSION: &str = "apk";

/// A request to extract one installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Identifier of the installed package.
    pub package: String,

    /// Where to write the package. When `None` the extractor derives
    /// `<storage-root>/<output-dir>/<package>.apk`.
    pub destination: Option<PathBuf>,
}

impl ExtractionRequest {
    /// Creates a request that writes to the default destination.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            destination: None,
        }
    }

    /// Sets an explicit destination path.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Copies installed packages out of the application registry.
///
/// The extractor holds no mutable state; one instance can serve any number
/// of sequential or concurrent requests. Concurrent requests that target the
/// same destination race with each other.
///
/// # Examples
///
/// ```no_run
/// use apkjoy_core::ApkExtractor;
/// use apkjoy_core::ExtractionRequest;
/// use apkjoy_core::registry::PmRegistry;
///
/// # fn main() -> apkjoy_core::Result<()> {
/// let extractor = ApkExtractor::new(PmRegistry::new(), "/sdcard/Download");
/// let result = extractor.extract(&ExtractionRequest::new("com.android.settings"))?;
/// println!("Wrote {}", result.destination.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApkExtractor<R> {
    registry: R,
    storage_root: PathBuf,
    config: ExtractConfig,
}

impl<R: PackageRegistry> ApkExtractor<R> {
    /// Creates an extractor with the default configuration.
    ///
    /// `storage_root` is the application-private directory that default
    /// destinations are derived from.
    pub fn new(registry: R, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            storage_root: storage_root.into(),
            config: ExtractConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    /// Registry used for lookups.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Storage root used for default destinations.
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Directory that receives packages extracted without an explicit
    /// destination.
    pub fn output_dir(&self) -> PathBuf {
        self.storage_root.join(&self.config.output_dir_name)
    }

    /// Destination used when a request does not name one.
    ///
    /// # Examples
    ///
    /// ```
    /// use apkjoy_core::ApkExtractor;
    /// use apkjoy_core::registry::StaticRegistry;
    /// use std::path::Path;
    ///
    /// let extractor = ApkExtractor::new(StaticRegistry::new(), "/data/user/0/app/files");
    /// assert_eq!(
    ///     extractor.default_destination("com.example"),
    ///     Path::new("/data/user/0/app/files/ExtractedAPKs/com.example.apk")
    /// );
    /// ```
    pub fn default_destination(&self, package: &str) -> PathBuf {
        self.output_dir().join(format!("{package}.{APK_EXTENSION}"))
    }

    /// Extracts a package and returns where it was written.
    ///
    /// # Errors
    ///
    /// - [`ApkError::InvalidArgument`] for an empty or malformed package
    ///   identifier, an empty destination, or a destination that is the
    ///   installed package itself. Nothing is written.
    /// - [`ApkError::NotFound`] if the registry cannot resolve the package.
    ///   Nothing is written.
    /// - [`ApkError::Io`] if directory creation or the copy fails. The
    ///   destination contents are then undefined.
    pub fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult> {
        self.extract_with_progress(request, &mut NoopProgress)
    }

    /// Same as [`extract`](Self::extract), reporting copy progress.
    pub fn extract_with_progress(
        &self,
        request: &ExtractionRequest,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionResult> {
        let result = self.run(request, progress);

        match &result {
            Ok(done) => tracing::info!(
                package = %request.package,
                destination = %done.destination.display(),
                bytes = done.report.bytes_copied,
                "package extracted"
            ),
            Err(e) => tracing::warn!(
                package = %request.package,
                code = %e.code(),
                error = %e,
                "package extraction failed"
            ),
        }

        result
    }

    fn run(
        &self,
        request: &ExtractionRequest,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionResult> {
        let package = request.package.as_str();
        validate_package_name(package)?;
        self.config.validate()?;

        let source = self.registry.resolve_source_path(package)?;
        tracing::debug!(package, source = %source.display(), "resolved installed package");

        let destination = match &request.destination {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ApkError::InvalidArgument(
                    "destination path is empty".to_string(),
                ));
            }
            Some(path) => std::path::absolute(path)?,
            None => std::path::absolute(self.default_destination(package))?,
        };

        if is_same_file(&source, &destination) {
            return Err(ApkError::InvalidArgument(format!(
                "destination {} is the installed package itself",
                destination.display()
            )));
        }

        let started = Instant::now();
        let created_parent_dirs = ensure_parent_dir(&destination)?;

        let mut buffer = CopyBuffer::with_size(self.config.buffer_size);
        let bytes_copied = copy_file(&source, &destination, &mut buffer, progress)?;

        Ok(ExtractionResult {
            report: ExtractionReport {
                package: package.to_string(),
                source,
                bytes_copied,
                created_parent_dirs,
                duration: started.elapsed(),
            },
            destination,
        })
    }
}

/// Creates every missing ancestor of `path`. Returns whether anything was
/// created.
fn ensure_parent_dir(path: &Path) -> Result<bool> {
    let Some(parent) = path.parent() else {
        return Ok(false);
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(false);
    }

    tracing::debug!(dir = %parent.display(), "creating destination directory");
    fs::create_dir_all(parent)?;
    Ok(true)
}

/// Whether both paths name the same existing file.
/// Hard links to the same inode count as the same file on unix.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
