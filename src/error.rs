//! Error types for package rewriting operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when reading a package archive, locating and editing its
//! manifest, and writing the archive back, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. You can
//! handle errors using pattern matching or the `?` operator:
//!
//! ```rust,no_run
//! use nupkg::{Error, edit::EditOperation, manifest::ManifestField};
//! use std::fs::OpenOptions;
//!
//! fn retag(path: &str) -> nupkg::Result<()> {
//!     let mut file = OpenOptions::new().read(true).write(true).open(path)?;
//!     let edits = vec![EditOperation::set(ManifestField::Tags, "cli tools")];
//!     match nupkg::rewrite_manifest(&mut file, edits) {
//!         Ok(_) => Ok(()),
//!         Err(Error::ManifestNotFound { suffix }) => {
//!             eprintln!("no {} entry in {}", suffix, path);
//!             Ok(())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// The error type for package operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`ArchiveUnreadable`][Self::ArchiveUnreadable] | Stream operations |
/// | Format | [`ArchiveCorrupt`][Self::ArchiveCorrupt] | Invalid zip structure |
/// | Compatibility | [`UnsupportedMethod`][Self::UnsupportedMethod], [`UnsupportedFeature`][Self::UnsupportedFeature] | Missing features |
/// | Integrity | [`CrcMismatch`][Self::CrcMismatch] | Data corruption |
/// | Manifest | [`ManifestNotFound`][Self::ManifestNotFound], [`MultipleManifests`][Self::MultipleManifests], [`ManifestParse`][Self::ManifestParse], [`ManifestSerialize`][Self::ManifestSerialize] | Package contents |
/// | Resources | [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Safety limits |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing the package stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream could not be read as an archive at all.
    ///
    /// Returned when the stream cannot be seeked, or is too short to hold
    /// even an empty zip directory.
    #[error("Archive unreadable: {0}")]
    ArchiveUnreadable(String),

    /// The archive's directory structure is inconsistent.
    ///
    /// The offset points at the structure that failed validation and can
    /// help locate the corruption.
    #[error("Corrupt archive at offset {offset:#x}: {reason}")]
    ArchiveCorrupt {
        /// The byte offset where corruption was detected.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// An entry uses a compression method this build cannot decode.
    ///
    /// Entries with unknown methods can still be copied verbatim; this error
    /// only surfaces when their contents must be read or re-encoded.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The zip method number.
        method: u16,
    },

    /// The archive uses a zip feature that is not supported.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// Decompressed data did not match the stored checksum.
    #[error("CRC mismatch for '{entry_name}': expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        /// Name of the entry that failed verification.
        entry_name: String,
        /// The CRC stored in the archive.
        expected: u32,
        /// The CRC computed from the decompressed data.
        actual: u32,
    },

    /// A configured resource limit was exceeded.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// An invalid compression level was provided.
    ///
    /// Deflate levels must be in the range 0-9.
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },

    /// No entry in the archive ends with the manifest suffix.
    #[error("No manifest entry ending with '{suffix}' found in package")]
    ManifestNotFound {
        /// The suffix that was searched for.
        suffix: String,
    },

    /// More than one entry ends with the manifest suffix.
    ///
    /// A package with several manifests is ambiguous and is rejected rather
    /// than guessing which one consumers will read.
    #[error("Package contains {} manifest entries: {}", names.len(), names.join(", "))]
    MultipleManifests {
        /// Names of all matching entries, in archive order.
        names: Vec<String>,
    },

    /// The manifest entry is not well-formed manifest markup.
    #[error("Manifest parse error: {0}")]
    ManifestParse(String),

    /// The edited manifest could not be serialized.
    ///
    /// This indicates an internal invariant violation and should not occur
    /// under correct use.
    #[error("Manifest serialize error: {0}")]
    ManifestSerialize(String),

    /// An invocation payload was not a JSON object of string values.
    #[error("Invalid invocation payload: {0}")]
    InvalidPayload(String),
}

impl Error {
    /// Creates an [`Error::ArchiveCorrupt`] from an offset and reason.
    pub fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Error::ArchiveCorrupt {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error indicates damaged archive data.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::ArchiveCorrupt { .. } | Error::CrcMismatch { .. }
        )
    }

    /// Returns `true` if this error concerns the manifest rather than the
    /// archive container.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            Error::ManifestNotFound { .. }
                | Error::MultipleManifests { .. }
                | Error::ManifestParse(_)
                | Error::ManifestSerialize(_)
        )
    }

    /// Returns `true` if this error is due to missing support in this build.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedMethod { .. } | Error::UnsupportedFeature { .. }
        )
    }
}

/// A specialized [`Result`](std::result::Result) type for package operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_archive_corrupt() {
        let err = Error::corrupt(0x1234, "bad central directory signature");
        assert!(err.to_string().contains("0x1234"));
        assert!(err.to_string().contains("bad central directory signature"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_crc_mismatch_display() {
        let err = Error::CrcMismatch {
            entry_name: "lib/a.dll".into(),
            expected: 0xDEADBEEF,
            actual: 0x1,
        };
        let msg = err.to_string();
        assert!(msg.contains("lib/a.dll"));
        assert!(msg.contains("0xdeadbeef"));
        assert!(msg.contains("0x00000001"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_multiple_manifests_lists_names() {
        let err = Error::MultipleManifests {
            names: vec!["a.nuspec".into(), "b/B.NUSPEC".into()],
        };
        assert_eq!(
            err.to_string(),
            "Package contains 2 manifest entries: a.nuspec, b/B.NUSPEC"
        );
        assert!(err.is_manifest_error());
    }

    #[test]
    fn test_manifest_not_found() {
        let err = Error::ManifestNotFound {
            suffix: ".nuspec".into(),
        };
        assert!(err.to_string().contains(".nuspec"));
        assert!(err.is_manifest_error());
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_is_unsupported() {
        assert!(Error::UnsupportedMethod { method: 14 }.is_unsupported());
        assert!(Error::UnsupportedFeature { feature: "ZIP64" }.is_unsupported());
        assert!(!Error::ManifestParse("x".into()).is_unsupported());
    }

    #[test]
    fn test_invalid_compression_level() {
        let err = Error::InvalidCompressionLevel { level: 12 };
        assert_eq!(err.to_string(), "invalid compression level 12: must be 0-9");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
