//! Archive reading API for zip containers.
//!
//! [`Archive`] holds the ordered list of entries of a zip container in
//! their stored (compressed) form. Reading parses the end of central
//! directory record, the central directory, and each entry's local header,
//! validating that all of them agree.
//!
//! # Example
//!
//! ```rust,no_run
//! use nupkg::read::Archive;
//! use std::fs::File;
//!
//! let archive = Archive::read(File::open("package.nupkg")?)?;
//! for entry in archive.entries() {
//!     println!("{}: {} -> {} bytes", entry.name, entry.compressed_size(), entry.uncompressed_size);
//! }
//! # Ok::<(), nupkg::Error>(())
//! ```

mod entry;
mod options;

use std::io::{Cursor, Read, Seek, SeekFrom};

pub use entry::Entry;
pub use options::ReadLimits;

use crate::codec::CompressionMethod;
use crate::format::reader::{read_bytes, read_u16_le, read_u32_le, u16_at, u32_at};
use crate::format;
use crate::{Error, Result};

/// An in-memory zip archive: an ordered list of entries and a comment.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<Entry>,
    comment: Vec<u8>,
}

impl Archive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an archive from a list of entries.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            comment: Vec::new(),
        }
    }

    /// Reads an archive from a seekable stream with default limits.
    ///
    /// The whole stream is read into memory, starting from offset 0.
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::read_with_limits(reader, &ReadLimits::default())
    }

    /// Reads an archive from a seekable stream with the given limits.
    ///
    /// # Errors
    ///
    /// - [`Error::ArchiveUnreadable`] if the stream cannot be seeked or read,
    ///   or is too short to contain an end of central directory record
    /// - [`Error::ArchiveCorrupt`] if the directory structure is inconsistent
    /// - [`Error::UnsupportedFeature`] for ZIP64 and multi-disk archives
    /// - [`Error::ResourceLimitExceeded`] if a limit is exceeded
    pub fn read_with_limits<R: Read + Seek>(mut reader: R, limits: &ReadLimits) -> Result<Self> {
        let len = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| Error::ArchiveUnreadable(format!("stream is not seekable: {e}")))?;
        if len < format::END_OF_CENTRAL_DIRECTORY_SIZE as u64 {
            return Err(too_short(len));
        }
        if len > limits.max_archive_bytes {
            return Err(Error::ResourceLimitExceeded(format!(
                "archive is {} bytes, limit is {}",
                len, limits.max_archive_bytes
            )));
        }
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::ArchiveUnreadable(format!("stream is not seekable: {e}")))?;

        let mut bytes = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Error::ArchiveUnreadable(format!("failed to read stream: {e}")))?;
        Self::parse(&bytes, limits)
    }

    /// Parses an archive from an in-memory buffer with default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes, &ReadLimits::default())
    }

    /// Parses an archive from an in-memory buffer.
    pub fn parse(bytes: &[u8], limits: &ReadLimits) -> Result<Self> {
        if bytes.len() < format::END_OF_CENTRAL_DIRECTORY_SIZE {
            return Err(too_short(bytes.len() as u64));
        }
        if bytes.len() as u64 > limits.max_archive_bytes {
            return Err(Error::ResourceLimitExceeded(format!(
                "archive is {} bytes, limit is {}",
                bytes.len(),
                limits.max_archive_bytes
            )));
        }

        let eocd = find_end_of_central_directory(bytes).ok_or_else(|| {
            Error::corrupt(
                bytes.len() as u64,
                "end of central directory record not found",
            )
        })?;
        let directory = EndOfCentralDirectory::parse(bytes, eocd)?;

        if directory.entry_count > limits.max_entries {
            return Err(Error::ResourceLimitExceeded(format!(
                "archive declares {} entries, limit is {}",
                directory.entry_count, limits.max_entries
            )));
        }

        let cd_end = directory.offset + directory.size;
        if cd_end > eocd {
            return Err(Error::corrupt(
                directory.offset as u64,
                format!(
                    "central directory ({} bytes at {:#x}) overlaps end record at {:#x}",
                    directory.size, directory.offset, eocd
                ),
            ));
        }

        let mut cursor = Cursor::new(&bytes[directory.offset..cd_end]);
        let mut entries = Vec::with_capacity(directory.entry_count);
        for index in 0..directory.entry_count {
            let record_offset = (directory.offset as u64) + cursor.position();
            let header = read_central_header(&mut cursor).map_err(|e| match e {
                Error::Io(io) => Error::corrupt(
                    record_offset,
                    format!("central directory record {index} truncated: {io}"),
                ),
                other => other,
            })?;
            entries.push(read_local_entry(bytes, header, directory.offset)?);
        }

        log::debug!(
            "parsed zip archive: {} entries, central directory at {:#x}",
            entries.len(),
            directory.offset
        );

        Ok(Self {
            entries,
            comment: directory.comment,
        })
    }

    /// Returns the entries in archive order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entry at `index`.
    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Returns the first entry with exactly the given name.
    pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Replaces the entry at `index`, returning the previous entry.
    ///
    /// All other entries are left untouched. Returns `None` if `index` is
    /// out of range.
    pub fn replace_entry(&mut self, index: usize, entry: Entry) -> Option<Entry> {
        let slot = self.entries.get_mut(index)?;
        Some(std::mem::replace(slot, entry))
    }

    /// Returns the archive comment.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// Sets the archive comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceLimitExceeded`] if the comment is longer
    /// than 65535 bytes.
    pub fn set_comment(&mut self, comment: impl Into<Vec<u8>>) -> Result<()> {
        let comment = comment.into();
        if comment.len() > format::MAX_COMMENT_LENGTH {
            return Err(Error::ResourceLimitExceeded(format!(
                "archive comment is {} bytes, limit is {}",
                comment.len(),
                format::MAX_COMMENT_LENGTH
            )));
        }
        self.comment = comment;
        Ok(())
    }
}

fn too_short(len: u64) -> Error {
    Error::ArchiveUnreadable(format!(
        "stream is {} bytes, shorter than an end of central directory record ({} bytes)",
        len,
        format::END_OF_CENTRAL_DIRECTORY_SIZE
    ))
}

/// Locates the end of central directory record by scanning backwards.
///
/// A record whose comment ends exactly at the end of the buffer is
/// preferred; otherwise the last signature whose comment fits is used.
fn find_end_of_central_directory(bytes: &[u8]) -> Option<usize> {
    let last = bytes.len().checked_sub(format::END_OF_CENTRAL_DIRECTORY_SIZE)?;
    let first = last.saturating_sub(format::MAX_COMMENT_LENGTH);

    let mut fallback = None;
    for pos in (first..=last).rev() {
        if u32_at(bytes, pos) != Some(format::END_OF_CENTRAL_DIRECTORY_SIGNATURE) {
            continue;
        }
        let comment_len = u16_at(bytes, pos + 20)? as usize;
        let end = pos + format::END_OF_CENTRAL_DIRECTORY_SIZE + comment_len;
        if end == bytes.len() {
            return Some(pos);
        }
        if end < bytes.len() && fallback.is_none() {
            fallback = Some(pos);
        }
    }
    fallback
}

/// Parsed end of central directory record.
#[derive(Debug)]
struct EndOfCentralDirectory {
    entry_count: usize,
    size: usize,
    offset: usize,
    comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    fn parse(bytes: &[u8], pos: usize) -> Result<Self> {
        let mut cursor = Cursor::new(&bytes[pos + 4..]);
        let (disk, cd_disk, disk_entries, total_entries, cd_size, cd_offset, comment_len) =
            read_end_record_fields(&mut cursor)
                .map_err(|e| Error::corrupt(pos as u64, format!("end record truncated: {e}")))?;

        let zip64_locator = pos >= format::ZIP64_LOCATOR_SIZE
            && u32_at(bytes, pos - format::ZIP64_LOCATOR_SIZE)
                == Some(format::ZIP64_LOCATOR_SIGNATURE);
        if zip64_locator
            || total_entries == u16::MAX
            || cd_size == u32::MAX
            || cd_offset == u32::MAX
        {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }
        if disk != 0 || cd_disk != 0 || disk_entries != total_entries {
            return Err(Error::UnsupportedFeature {
                feature: "multi-disk archives",
            });
        }

        let comment_start = pos + format::END_OF_CENTRAL_DIRECTORY_SIZE;
        let comment = bytes
            .get(comment_start..comment_start + comment_len as usize)
            .ok_or_else(|| Error::corrupt(pos as u64, "archive comment truncated"))?
            .to_vec();

        Ok(Self {
            entry_count: total_entries as usize,
            size: cd_size as usize,
            offset: cd_offset as usize,
            comment,
        })
    }
}

type EndRecordFields = (u16, u16, u16, u16, u32, u32, u16);

fn read_end_record_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<EndRecordFields> {
    Ok((
        read_u16_le(cursor)?,
        read_u16_le(cursor)?,
        read_u16_le(cursor)?,
        read_u16_le(cursor)?,
        read_u32_le(cursor)?,
        read_u32_le(cursor)?,
        read_u16_le(cursor)?,
    ))
}

/// Fields of a central directory header that locate the entry data.
struct CentralHeader {
    entry: Entry,
    compressed_size: u32,
    local_offset: u32,
}

/// Reads one central directory header.
fn read_central_header(cursor: &mut Cursor<&[u8]>) -> Result<CentralHeader> {
    let start = cursor.position();
    let signature = read_u32_le(cursor)?;
    if signature != format::CENTRAL_DIRECTORY_SIGNATURE {
        return Err(Error::corrupt(
            start,
            format!("bad central directory signature {signature:#010x}"),
        ));
    }

    let mut entry = Entry::header_template();
    entry.version_made_by = read_u16_le(cursor)?;
    entry.version_needed = read_u16_le(cursor)?;
    entry.flags = read_u16_le(cursor)?;
    entry.method = CompressionMethod::from_u16(read_u16_le(cursor)?);
    entry.modified_time = read_u16_le(cursor)?;
    entry.modified_date = read_u16_le(cursor)?;
    entry.crc32 = read_u32_le(cursor)?;
    let compressed_size = read_u32_le(cursor)?;
    let uncompressed_size = read_u32_le(cursor)?;
    let name_len = read_u16_le(cursor)? as usize;
    let extra_len = read_u16_le(cursor)? as usize;
    let comment_len = read_u16_le(cursor)? as usize;
    let _disk_start = read_u16_le(cursor)?;
    entry.internal_attributes = read_u16_le(cursor)?;
    entry.external_attributes = read_u32_le(cursor)?;
    let local_offset = read_u32_le(cursor)?;
    entry.raw_name = read_bytes(cursor, name_len)?;
    entry.central_extra = read_bytes(cursor, extra_len)?;
    entry.comment = read_bytes(cursor, comment_len)?;

    if compressed_size == u32::MAX || uncompressed_size == u32::MAX || local_offset == u32::MAX {
        return Err(Error::UnsupportedFeature { feature: "ZIP64" });
    }

    entry.name = String::from_utf8_lossy(&entry.raw_name).into_owned();
    entry.uncompressed_size = uncompressed_size as u64;
    Ok(CentralHeader {
        entry,
        compressed_size,
        local_offset,
    })
}

/// Reads the local header of `header` and assembles the full entry.
fn read_local_entry(bytes: &[u8], header: CentralHeader, directory_offset: usize) -> Result<Entry> {
    let CentralHeader {
        mut entry,
        compressed_size,
        local_offset,
    } = header;
    let offset = local_offset as usize;

    let fixed_end = offset + format::LOCAL_FILE_HEADER_SIZE;
    if fixed_end > directory_offset {
        return Err(Error::corrupt(
            offset as u64,
            format!("local header of '{}' lies outside the entry area", entry.name),
        ));
    }
    if u32_at(bytes, offset) != Some(format::LOCAL_FILE_HEADER_SIGNATURE) {
        return Err(Error::corrupt(
            offset as u64,
            format!("bad local header signature for '{}'", entry.name),
        ));
    }

    let name_len = u16_at(bytes, offset + 26).unwrap_or(0) as usize;
    let extra_len = u16_at(bytes, offset + 28).unwrap_or(0) as usize;
    let name_end = fixed_end + name_len;
    let data_start = name_end + extra_len;
    let data_end = data_start + compressed_size as usize;
    if data_end > directory_offset {
        return Err(Error::corrupt(
            offset as u64,
            format!(
                "data of '{}' ({} bytes at {:#x}) overruns the central directory",
                entry.name, compressed_size, data_start
            ),
        ));
    }
    if bytes[fixed_end..name_end] != entry.raw_name[..] {
        return Err(Error::corrupt(
            offset as u64,
            format!(
                "local header name does not match central directory name '{}'",
                entry.name
            ),
        ));
    }

    if entry.has_data_descriptor() {
        log::debug!(
            "entry '{}' uses a data descriptor; sizes will be written to its local header",
            entry.name
        );
    }

    entry.local_extra = bytes[name_end..data_start].to_vec();
    Ok(Entry::from_parts(
        entry,
        bytes[data_start..data_end].to_vec(),
        offset as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::WriteOptions;

    fn stored(name: &str, data: &[u8]) -> Entry {
        Entry::new(name, data, CompressionMethod::Stored, &WriteOptions::default()).unwrap()
    }

    fn sample_archive() -> Vec<u8> {
        let mut archive = Archive::new();
        archive.push(stored("Pkg.nuspec", b"<package/>"));
        archive.push(stored("lib/net8.0/Pkg.dll", b"MZ\x90\x00"));
        archive.set_comment(b"built by tests".to_vec()).unwrap();
        archive.to_vec().unwrap()
    }

    #[test]
    fn test_parse_written_archive() {
        let archive = Archive::from_bytes(&sample_archive()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.entries()[0].name, "Pkg.nuspec");
        assert_eq!(archive.entries()[1].raw_data(), b"MZ\x90\x00");
        assert_eq!(archive.comment(), b"built by tests");
        assert_eq!(archive.entries()[0].header_offset, Some(0));
    }

    #[test]
    fn test_read_from_stream() {
        let bytes = sample_archive();
        let archive = Archive::read(Cursor::new(bytes)).unwrap();
        assert!(archive.entry_by_name("lib/net8.0/Pkg.dll").is_some());
        assert!(archive.entry_by_name("missing").is_none());
    }

    #[test]
    fn test_empty_archive() {
        let bytes = Archive::new().to_vec().unwrap();
        assert_eq!(bytes.len(), format::END_OF_CENTRAL_DIRECTORY_SIZE);
        let archive = Archive::from_bytes(&bytes).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn test_too_short_is_unreadable() {
        let err = Archive::from_bytes(b"PK\x05\x06").unwrap_err();
        assert!(matches!(err, Error::ArchiveUnreadable(_)), "{err:?}");
    }

    #[test]
    fn test_missing_end_record_is_corrupt() {
        let err = Archive::from_bytes(&[0u8; 64]).unwrap_err();
        assert!(matches!(err, Error::ArchiveCorrupt { .. }), "{err:?}");
    }

    #[test]
    fn test_trailing_garbage_tolerated() {
        let mut bytes = sample_archive();
        bytes.extend_from_slice(b"trailing");
        let archive = Archive::from_bytes(&bytes).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_bad_local_signature() {
        let mut bytes = sample_archive();
        bytes[0] = b'X';
        let err = Archive::from_bytes(&bytes).unwrap_err();
        assert!(err.is_corruption(), "{err:?}");
    }

    #[test]
    fn test_entry_limit() {
        let limits = ReadLimits::new().max_entries(1);
        let err = Archive::parse(&sample_archive(), &limits).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)));
    }

    #[test]
    fn test_archive_size_limit() {
        let limits = ReadLimits::new().max_archive_bytes(32);
        let err = Archive::parse(&sample_archive(), &limits).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)));
    }

    #[test]
    fn test_zip64_locator_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&format::ZIP64_LOCATOR_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        bytes.extend_from_slice(&Archive::new().to_vec().unwrap());
        let err = Archive::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFeature { feature: "ZIP64" }));
    }

    #[test]
    fn test_replace_entry() {
        let mut archive = Archive::from_bytes(&sample_archive()).unwrap();
        let old = archive
            .replace_entry(0, stored("Pkg.nuspec", b"<package></package>"))
            .unwrap();
        assert_eq!(old.raw_data(), b"<package/>");
        assert_eq!(archive.entries()[0].raw_data(), b"<package></package>");
        assert!(archive.replace_entry(5, stored("x", b"")).is_none());
    }

    #[test]
    fn test_comment_limit() {
        let mut archive = Archive::new();
        assert!(archive.set_comment(vec![b'a'; 70_000]).is_err());
    }
}
