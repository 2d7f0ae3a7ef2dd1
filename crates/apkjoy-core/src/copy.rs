//! Buffered file copy with a reusable, fixed-size buffer.
//!
//! The buffer size is chosen once per extraction (see
//! [`ExtractConfig::buffer_size`](crate::ExtractConfig::buffer_size)) and the
//! same allocation is reused for every read.

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::ApkError;
use crate::ProgressCallback;
use crate::Result;
use crate::config::DEFAULT_BUFFER_SIZE;

/// Heap-allocated intermediate buffer for copying.
///
/// # Examples
///
/// ```no_run
/// # use apkjoy_core::copy::{CopyBuffer, copy_with_buffer};
/// # use apkjoy_core::NoopProgress;
/// # fn example() -> apkjoy_core::Result<()> {
/// let mut buffer = CopyBuffer::with_size(1024);
/// let mut input = std::fs::File::open("base.apk")?;
/// let mut output = std::fs::File::create("copy.apk")?;
///
/// let bytes_copied = copy_with_buffer(&mut input, &mut output, &mut buffer, &mut NoopProgress)?;
/// println!("Copied {bytes_copied} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Vec<u8>,
}

impl CopyBuffer {
    /// Creates a buffer of the default size (4 KiB).
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a buffer of `size` bytes. A size of zero is bumped to one.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            buf: vec![0u8; size.max(1)],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies everything from `reader` to `writer` through `buffer`.
///
/// Reads until end-of-stream, retrying reads interrupted by a signal, and
/// reports each written chunk to `progress`. The writer is not flushed;
/// callers that own the writer decide when to flush.
///
/// # Errors
///
/// Returns [`ApkError::Io`] if reading or writing fails. Bytes written
/// before the failure stay in the writer.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ApkError::Io(e)),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        let chunk = bytes_read as u64;
        total = total.checked_add(chunk).ok_or_else(|| {
            ApkError::Io(io::Error::other("byte count overflow while copying"))
        })?;
        progress.on_bytes_copied(chunk);
    }

    Ok(total)
}

/// Copies the file at `source` to `destination`, replacing any existing file.
///
/// Both handles are scoped to this call and closed before it returns,
/// whether the copy succeeds or not. The destination is flushed before the
/// handle is released.
///
/// # Errors
///
/// Returns [`ApkError::Io`] if the source cannot be opened or read, or the
/// destination cannot be created, written, or flushed. A failure part-way
/// through may leave a truncated destination file.
pub fn copy_file(
    source: &Path,
    destination: &Path,
    buffer: &mut CopyBuffer,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let mut input = File::open(source)?;
    let total_bytes = input.metadata().ok().map(|m| m.len());

    let mut output = File::create(destination)?;
    progress.on_start(source, total_bytes);

    let copied = copy_with_buffer(&mut input, &mut output, buffer, progress)?;
    output.flush()?;

    progress.on_complete();
    Ok(copied)
}
