//! Rewrite configuration.

use crate::manifest::NUSPEC_SUFFIX;
use crate::read::ReadLimits;
use crate::write::WriteOptions;

/// Options controlling a manifest rewrite.
///
/// # Example
///
/// ```rust
/// use nupkg::edit::RewriteOptions;
/// use nupkg::read::ReadLimits;
/// use nupkg::write::WriteOptions;
///
/// let options = RewriteOptions::new()
///     .limits(ReadLimits::new().max_entries(10_000))
///     .write_options(WriteOptions::default().level(9)?);
/// assert_eq!(options.manifest_suffix, ".nuspec");
/// # Ok::<(), nupkg::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Entry name suffix identifying the manifest, matched case-insensitively.
    pub manifest_suffix: String,
    /// Whether to verify the CRC of the manifest entry before parsing.
    pub verify_crc: bool,
    /// Limits applied while reading the package.
    pub limits: ReadLimits,
    /// Options for re-encoding the manifest entry.
    pub write: WriteOptions,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            manifest_suffix: NUSPEC_SUFFIX.to_string(),
            verify_crc: true,
            limits: ReadLimits::default(),
            write: WriteOptions::default(),
        }
    }
}

impl RewriteOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the manifest suffix.
    pub fn manifest_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.manifest_suffix = suffix.into();
        self
    }

    /// Enables or disables CRC verification of the manifest entry.
    pub fn verify_crc(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    /// Sets the read limits.
    pub fn limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the write options.
    pub fn write_options(mut self, options: WriteOptions) -> Self {
        self.write = options;
        self
    }
}
