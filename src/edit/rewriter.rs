//! Manifest rewriting for package archives.

use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::manifest::{ManifestDocument, ManifestEditor, ManifestField, find_manifest};
use crate::read::Archive;
use crate::{Error, Result};

use super::operation::EditOperation;
use super::options::RewriteOptions;
use super::stream::PackageStream;

/// Result of a manifest rewrite.
#[must_use = "rewrite result should be checked to verify the rewrite completed as expected"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteResult {
    /// Name of the manifest entry.
    pub manifest_name: String,
    /// Position of the manifest entry in the archive.
    pub manifest_index: usize,
    /// Number of entries copied without modification.
    pub entries_copied: usize,
    /// Number of edit operations applied.
    pub edits_applied: usize,
    /// Uncompressed size of the manifest before the rewrite.
    pub old_manifest_size: u64,
    /// Uncompressed size of the manifest after the rewrite.
    pub new_manifest_size: u64,
    /// Total bytes in the rewritten archive.
    pub archive_size: u64,
}

impl RewriteResult {
    /// Returns the total number of entries in the rewritten archive.
    pub fn total_entries(&self) -> usize {
        self.entries_copied + 1
    }

    /// Returns how much the manifest grew (negative if it shrank).
    pub fn manifest_size_delta(&self) -> i64 {
        self.new_manifest_size as i64 - self.old_manifest_size as i64
    }
}

/// Rewrites the manifest of a package archive.
///
/// Edits are queued and only run when [`apply`](Self::apply) is called.
/// The archive is read fully, the manifest entry is parsed, edited and
/// re-encoded with its original compression method, and the complete new
/// archive is built in memory before anything is written back. Any error
/// before that point leaves the stream unmodified.
///
/// # Example
///
/// ```rust,no_run
/// use nupkg::edit::ManifestRewriter;
/// use nupkg::manifest::ManifestField;
/// use std::fs::OpenOptions;
///
/// let mut file = OpenOptions::new().read(true).write(true).open("TestPackage.nupkg")?;
/// let result = ManifestRewriter::new()
///     .set(ManifestField::Authors, "Me and You")
///     .custom(|metadata| metadata.set_tags("Peas In A Pod"))
///     .apply(&mut file)?;
/// println!("rewrote {} ({} edits)", result.manifest_name, result.edits_applied);
/// # Ok::<(), nupkg::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ManifestRewriter {
    options: RewriteOptions,
    edits: Vec<EditOperation>,
}

impl ManifestRewriter {
    /// Creates a rewriter with default options and no edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rewrite options.
    pub fn options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Queues an edit operation.
    pub fn edit(mut self, edit: EditOperation) -> Self {
        self.edits.push(edit);
        self
    }

    /// Queues several edit operations, in order.
    pub fn edits(mut self, edits: impl IntoIterator<Item = EditOperation>) -> Self {
        self.edits.extend(edits);
        self
    }

    /// Queues setting a field.
    pub fn set(self, field: ManifestField, value: impl Into<String>) -> Self {
        self.edit(EditOperation::set(field, value))
    }

    /// Queues removing a field.
    pub fn clear(self, field: ManifestField) -> Self {
        self.edit(EditOperation::clear(field))
    }

    /// Queues a closure edit.
    pub fn custom<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut ManifestEditor<'_>) + 'static,
    {
        self.edit(EditOperation::custom(f))
    }

    /// Returns the number of queued edits.
    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    /// Returns whether there are any queued edits.
    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Applies the queued edits to the package in `stream`.
    ///
    /// The stream is read from offset 0. On success it holds the rewritten
    /// package, truncated to its new length, and is positioned at offset 0.
    ///
    /// # Errors
    ///
    /// - [`Error::ArchiveUnreadable`] / [`Error::ArchiveCorrupt`] if the
    ///   stream is not a valid archive
    /// - [`Error::ManifestNotFound`] / [`Error::MultipleManifests`] if the
    ///   archive does not hold exactly one manifest
    /// - [`Error::ManifestParse`] if the manifest is malformed
    /// - [`Error::Io`] if writing the result back fails
    pub fn apply<S: PackageStream>(self, mut stream: S) -> Result<RewriteResult> {
        let archive = Archive::read_with_limits(&mut stream, &self.options.limits)?;
        let (output, result) = self.rewrite(archive)?;

        stream.seek(SeekFrom::Start(0))?;
        stream.write_all(&output)?;
        stream.set_len(output.len() as u64)?;
        stream.flush()?;
        stream.seek(SeekFrom::Start(0))?;

        log::debug!("wrote {} bytes back to package stream", output.len());
        Ok(result)
    }

    /// Applies the queued edits to the package file at `path`.
    ///
    /// The new package is written to a sibling temporary file, synced, and
    /// renamed over the original, so readers see either the old or the new
    /// package.
    pub fn apply_to_path(self, path: impl AsRef<Path>) -> Result<RewriteResult> {
        let path = path.as_ref();
        let input = fs::File::open(path)?;
        let archive = Archive::read_with_limits(input, &self.options.limits)?;
        let (output, result) = self.rewrite(archive)?;

        let tmp_path = temp_path(path);
        let written = write_synced(&tmp_path, &output).and_then(|()| {
            fs::rename(&tmp_path, path)?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        log::debug!("replaced {} ({} bytes)", path.display(), output.len());
        Ok(result)
    }

    /// Applies the queued edits to an in-memory package, returning the new
    /// package bytes.
    pub fn apply_to_bytes(self, bytes: &[u8]) -> Result<(Vec<u8>, RewriteResult)> {
        let archive = Archive::parse(bytes, &self.options.limits)?;
        self.rewrite(archive)
    }

    fn rewrite(self, mut archive: Archive) -> Result<(Vec<u8>, RewriteResult)> {
        let Self { options, edits } = self;

        let index = find_manifest(archive.entries(), &options.manifest_suffix)?;
        let entry = &archive.entries()[index];
        log::debug!(
            "located manifest '{}' at index {} ({}, {} bytes)",
            entry.name,
            index,
            entry.method,
            entry.uncompressed_size
        );

        let original = entry.decode(options.verify_crc, options.limits.max_manifest_bytes)?;
        let mut document = ManifestDocument::parse(&original)?;
        let (original_id, original_version) = (document.id(), document.version());

        let edits_applied = edits.len();
        {
            let mut editor = document.editor();
            for edit in edits {
                log::trace!("applying {} edit", edit.operation_type());
                edit.apply(&mut editor);
            }
        }
        if document.id() != original_id || document.version() != original_version {
            log::debug!(
                "edits changed package identity from {:?} {:?} to {:?} {:?}",
                original_id,
                original_version,
                document.id(),
                document.version()
            );
        }

        let serialized = document.to_bytes()?;
        verify_identity(&document, &serialized)?;

        let replacement = entry.with_data(&serialized, &options.write)?;
        let manifest_name = entry.name.clone();
        archive.replace_entry(index, replacement);

        let normalized = archive
            .entries()
            .iter()
            .filter(|e| e.has_data_descriptor())
            .count();
        if normalized > 0 {
            log::warn!(
                "{} entries used data descriptors; their sizes are now stored in local headers",
                normalized
            );
        }

        let output = archive.to_vec()?;
        let result = RewriteResult {
            manifest_name,
            manifest_index: index,
            entries_copied: archive.len() - 1,
            edits_applied,
            old_manifest_size: original.len() as u64,
            new_manifest_size: serialized.len() as u64,
            archive_size: output.len() as u64,
        };
        log::debug!(
            "rewrote manifest '{}': {} edits, {} -> {} bytes, archive {} bytes",
            result.manifest_name,
            result.edits_applied,
            result.old_manifest_size,
            result.new_manifest_size,
            result.archive_size
        );
        Ok((output, result))
    }
}

/// Checks that the serialized manifest reads back with the same identity.
fn verify_identity(document: &ManifestDocument, serialized: &[u8]) -> Result<()> {
    let reparsed = ManifestDocument::parse(serialized)
        .map_err(|e| Error::ManifestSerialize(format!("output does not parse: {e}")))?;
    if reparsed.id() != document.id() || reparsed.version() != document.version() {
        return Err(Error::ManifestSerialize(format!(
            "identity changed during serialization: {:?} {:?} became {:?} {:?}",
            document.id(),
            document.version(),
            reparsed.id(),
            reparsed.version()
        )));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// Rewrites the manifest of the package in `stream` with default options.
///
/// See [`ManifestRewriter::apply`].
pub fn rewrite_manifest<S: PackageStream>(
    stream: S,
    edits: impl IntoIterator<Item = EditOperation>,
) -> Result<RewriteResult> {
    ManifestRewriter::new().edits(edits).apply(stream)
}

/// Rewrites the manifest of the package file at `path`.
///
/// See [`ManifestRewriter::apply_to_path`].
pub fn rewrite_path(
    path: impl AsRef<Path>,
    edits: impl IntoIterator<Item = EditOperation>,
    options: RewriteOptions,
) -> Result<RewriteResult> {
    ManifestRewriter::new()
        .options(options)
        .edits(edits)
        .apply_to_path(path)
}
