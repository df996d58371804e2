//! Archive entry type.

use std::fmt;
use std::io::Read;

use crate::checksum::{Checksum, Crc32, Crc32Reader};
use crate::codec::{self, CompressionMethod};
use crate::format::{self, flags};
use crate::write::WriteOptions;
use crate::{Error, Result};

/// An entry in a zip archive.
///
/// The entry keeps its data in the compressed form it was stored in, along
/// with every header field the writer needs to re-emit it unchanged. An
/// entry read from an archive and written back produces the same raw data,
/// CRC, sizes, name bytes, extra fields and comment.
///
/// This struct is marked `#[non_exhaustive]`; construct new entries with
/// [`Entry::new`] or derive replacements with [`Entry::with_data`].
#[derive(Clone)]
#[non_exhaustive]
pub struct Entry {
    /// Entry name decoded for display and matching, original casing kept.
    pub name: String,
    /// Entry name exactly as stored in the archive.
    pub raw_name: Vec<u8>,
    /// Compression method of the stored data.
    pub method: CompressionMethod,
    /// General purpose bit flags.
    pub flags: u16,
    /// "Version made by" field of the central directory header.
    pub version_made_by: u16,
    /// Minimum zip version needed to extract.
    pub version_needed: u16,
    /// Last modification time in MS-DOS format.
    pub modified_time: u16,
    /// Last modification date in MS-DOS format.
    pub modified_date: u16,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Uncompressed size in bytes.
    pub uncompressed_size: u64,
    /// Internal file attributes.
    pub internal_attributes: u16,
    /// External file attributes (host-dependent).
    pub external_attributes: u32,
    /// Extra field of the local file header.
    pub local_extra: Vec<u8>,
    /// Extra field of the central directory header.
    pub central_extra: Vec<u8>,
    /// Entry comment.
    pub comment: Vec<u8>,
    /// Stored (compressed) data.
    data: Vec<u8>,
    /// Offset of the local header in the archive this entry was read from.
    pub(crate) header_offset: Option<u64>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("flags", &format_args!("{:#06x}", self.flags))
            .field("crc32", &format_args!("{:#010x}", self.crc32))
            .field("compressed_size", &self.data.len())
            .field("uncompressed_size", &self.uncompressed_size)
            .finish_non_exhaustive()
    }
}

impl Entry {
    /// Creates a new entry from uncompressed contents.
    ///
    /// The entry is dated 1980-01-01 and flagged as UTF-8 when its name is
    /// not plain ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`] if `method` cannot be encoded by
    /// this build, or [`Error::UnsupportedFeature`] if the name or contents
    /// are too large for a non-ZIP64 archive.
    pub fn new(
        name: impl Into<String>,
        contents: &[u8],
        method: CompressionMethod,
        options: &WriteOptions,
    ) -> Result<Self> {
        let name = name.into();
        if name.len() > u16::MAX as usize {
            return Err(Error::UnsupportedFeature {
                feature: "entry names longer than 65535 bytes",
            });
        }
        let flags = if name.is_ascii() { 0 } else { flags::UTF8 };
        let template = Entry {
            raw_name: name.as_bytes().to_vec(),
            name,
            method,
            flags,
            version_made_by: format::VERSION_MADE_BY_DEFAULT,
            version_needed: format::VERSION_NEEDED_DEFAULT,
            modified_time: 0,
            modified_date: format::DOS_EPOCH_DATE,
            crc32: 0,
            uncompressed_size: 0,
            internal_attributes: 0,
            external_attributes: 0,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
            data: Vec::new(),
            header_offset: None,
        };
        template.with_data(contents, options)
    }

    /// Assembles an entry from parsed header fields and stored data.
    pub(crate) fn from_parts(mut header: Entry, data: Vec<u8>, header_offset: u64) -> Self {
        header.data = data;
        header.header_offset = Some(header_offset);
        header
    }

    /// Returns an empty header template used while parsing.
    pub(crate) fn header_template() -> Self {
        Entry {
            name: String::new(),
            raw_name: Vec::new(),
            method: CompressionMethod::Stored,
            flags: 0,
            version_made_by: 0,
            version_needed: 0,
            modified_time: 0,
            modified_date: 0,
            crc32: 0,
            uncompressed_size: 0,
            internal_attributes: 0,
            external_attributes: 0,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
            data: Vec::new(),
            header_offset: None,
        }
    }

    /// Returns a copy of this entry holding new contents.
    ///
    /// Name, method, timestamps, attributes, extra fields and comment are
    /// kept; the data is re-encoded with the same method and the CRC and
    /// sizes are recomputed. The data-descriptor flag is cleared because
    /// the writer always stores sizes in the local header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`] if the entry's method cannot be
    /// encoded, or [`Error::UnsupportedFeature`] for encrypted entries.
    pub fn with_data(&self, contents: &[u8], options: &WriteOptions) -> Result<Entry> {
        if self.is_encrypted() {
            return Err(Error::UnsupportedFeature {
                feature: "re-encoding encrypted entries",
            });
        }
        if contents.len() as u64 > u32::MAX as u64 {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }

        let data = codec::encode(self.method, contents, options.level)?;
        Ok(Entry {
            flags: self.flags & !flags::DATA_DESCRIPTOR,
            crc32: Crc32::compute(contents),
            uncompressed_size: contents.len() as u64,
            data,
            header_offset: None,
            ..self.clone()
        })
    }

    /// Returns the stored (compressed) data.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the stored (compressed) size in bytes.
    pub fn compressed_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns whether this entry names a directory.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/') || self.name.ends_with('\\')
    }

    /// Returns whether the entry data is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.flags & (flags::ENCRYPTED | flags::STRONG_ENCRYPTION) != 0
    }

    /// Returns whether the source archive stored CRC and sizes in a data
    /// descriptor after the entry data.
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & flags::DATA_DESCRIPTOR != 0
    }

    /// Decodes the entry and verifies its size and CRC.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMethod`] for methods this build cannot decode
    /// - [`Error::UnsupportedFeature`] for encrypted entries
    /// - [`Error::ArchiveCorrupt`] if the data does not decode to the stored size
    /// - [`Error::CrcMismatch`] if the decoded data fails the CRC check
    pub fn read_data(&self) -> Result<Vec<u8>> {
        self.decode(true, u64::MAX)
    }

    /// Decodes the entry, refusing entries larger than `limit` bytes.
    pub(crate) fn decode(&self, verify_crc: bool, limit: u64) -> Result<Vec<u8>> {
        if self.is_encrypted() {
            return Err(Error::UnsupportedFeature {
                feature: "encrypted entries",
            });
        }
        if self.uncompressed_size > limit {
            return Err(Error::ResourceLimitExceeded(format!(
                "entry '{}' is {} bytes uncompressed, limit is {}",
                self.name, self.uncompressed_size, limit
            )));
        }

        let offset = self.header_offset.unwrap_or(0);
        let decoder = codec::build_decoder(self.method, &self.data, self.uncompressed_size)?;
        let mut reader = Crc32Reader::new(decoder);
        let capacity = usize::try_from(self.uncompressed_size)
            .unwrap_or(usize::MAX)
            .min(crate::READ_BUFFER_SIZE * 128);
        let mut contents = Vec::with_capacity(capacity);
        reader
            .read_to_end(&mut contents)
            .map_err(|e| Error::corrupt(offset, format!("entry '{}': {}", self.name, e)))?;

        if contents.len() as u64 != self.uncompressed_size {
            return Err(Error::corrupt(
                offset,
                format!(
                    "entry '{}' decoded to {} bytes, expected {}",
                    self.name,
                    reader.bytes_read(),
                    self.uncompressed_size
                ),
            ));
        }

        let actual = reader.crc();
        if verify_crc && actual != self.crc32 {
            return Err(Error::CrcMismatch {
                entry_name: self.name.clone(),
                expected: self.crc32,
                actual,
            });
        }
        Ok(contents)
    }
}
