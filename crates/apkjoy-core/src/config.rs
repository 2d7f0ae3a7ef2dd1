//! Configuration for package extraction.

use crate::ApkError;
use crate::Result;

/// Default copy buffer size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Largest copy buffer accepted by [`ExtractConfig::validate`].
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Directory under the storage root that receives packages when the caller
/// does not choose a destination.
pub const DEFAULT_OUTPUT_DIR: &str = "ExtractedAPKs";

/// Extraction settings.
///
/// # Examples
///
/// ```
/// use apkjoy_core::ExtractConfig;
///
/// let config = ExtractConfig::default().with_buffer_size(1024);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.output_dir_name, "ExtractedAPKs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Size of the intermediate copy buffer in bytes.
    pub buffer_size: usize,

    /// Name of the directory created under the storage root for default
    /// destinations.
    pub output_dir_name: String,
}

impl Default for ExtractConfig {
    /// Default values:
    /// - `buffer_size`: 4 KiB
    /// - `output_dir_name`: `ExtractedAPKs`
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl ExtractConfig {
    /// Sets the copy buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the default output directory name.
    #[must_use]
    pub fn with_output_dir_name(mut self, name: impl Into<String>) -> Self {
        self.output_dir_name = name.into();
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// The output directory name must be a single plain path component so
    /// that default destinations stay inside the storage root.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 || self.buffer_size > MAX_BUFFER_SIZE {
            return Err(ApkError::InvalidArgument(format!(
                "buffer size must be between 1 and {MAX_BUFFER_SIZE} bytes, got {}",
                self.buffer_size
            )));
        }

        let name = self.output_dir_name.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0'])
        {
            return Err(ApkError::InvalidArgument(format!(
                "output directory name must be a single path component, got {name:?}"
            )));
        }

        Ok(())
    }
}
