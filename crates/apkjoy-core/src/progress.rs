//! Progress reporting for package copies.

use std::path::Path;

/// Callback trait for progress reporting during a copy.
///
/// Implement this trait to receive progress updates while a package is being
/// copied. The trait requires `Send` so callbacks can be moved to a worker
/// thread by the host.
///
/// # Examples
///
/// ```
/// use apkjoy_core::ProgressCallback;
/// use std::path::Path;
///
/// struct ByteCounter(u64);
///
/// impl ProgressCallback for ByteCounter {
///     fn on_start(&mut self, _source: &Path, _total_bytes: Option<u64>) {}
///
///     fn on_bytes_copied(&mut self, bytes: u64) {
///         self.0 += bytes;
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called once the source is open, before the first byte is copied.
    ///
    /// `total_bytes` is the source size when the filesystem reports one.
    fn on_start(&mut self, source: &Path, total_bytes: Option<u64>);

    /// Called after each buffer has been written to the destination.
    fn on_bytes_copied(&mut self, bytes: u64);

    /// Called once after the destination has been flushed.
    fn on_complete(&mut self);
}

/// No-op progress callback for when progress reporting is not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_start(&mut self, _source: &Path, _total_bytes: Option<u64>) {}

    fn on_bytes_copied(&mut self, _bytes: u64) {}

    fn on_complete(&mut self) {}
}
