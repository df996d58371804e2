//! Resource limits applied while reading packages.

/// Resource limits for parsing archives and decoding entries.
///
/// The defaults accept any archive the zip format can describe without
/// ZIP64 extensions, while bounding how much memory a single decoded
/// manifest may claim.
#[derive(Debug, Clone)]
pub struct ReadLimits {
    /// Maximum number of entries allowed in the central directory.
    pub max_entries: usize,
    /// Maximum size of the whole archive in bytes.
    pub max_archive_bytes: u64,
    /// Maximum uncompressed size of the manifest entry.
    pub max_manifest_bytes: u64,
}

impl Default for ReadLimits {
    /// Creates limits with the following default values:
    ///
    /// | Limit | Default Value |
    /// |-------|---------------|
    /// | `max_entries` | 65,535 |
    /// | `max_archive_bytes` | 4 GiB - 1 |
    /// | `max_manifest_bytes` | 16 MiB |
    fn default() -> Self {
        Self {
            max_entries: u16::MAX as usize,
            max_archive_bytes: u32::MAX as u64,
            max_manifest_bytes: 16 << 20,
        }
    }
}

impl ReadLimits {
    /// Creates new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates limits with no restrictions.
    pub fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
            max_archive_bytes: u64::MAX,
            max_manifest_bytes: u64::MAX,
        }
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum archive size.
    pub fn max_archive_bytes(mut self, max: u64) -> Self {
        self.max_archive_bytes = max;
        self
    }

    /// Sets the maximum uncompressed manifest size.
    pub fn max_manifest_bytes(mut self, max: u64) -> Self {
        self.max_manifest_bytes = max;
        self
    }
}
