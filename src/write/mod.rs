//! Archive writing API for zip containers.
//!
//! [`Archive::write`] re-emits every entry in order: a local file header
//! followed by the entry's stored data, then the central directory and the
//! end of central directory record. Offsets are recomputed from what is
//! actually written, so the output is internally consistent whether entries
//! were re-encoded or carried over verbatim. Verbatim entries keep their raw
//! data and stored CRC; nothing is recompressed or rehashed.
//!
//! # Example
//!
//! ```rust
//! use nupkg::codec::CompressionMethod;
//! use nupkg::read::{Archive, Entry};
//! use nupkg::write::WriteOptions;
//!
//! let options = WriteOptions::default();
//! let mut archive = Archive::new();
//! archive.push(Entry::new("hello.txt", b"Hello!", CompressionMethod::Stored, &options)?);
//!
//! let bytes = archive.to_vec()?;
//! assert_eq!(Archive::from_bytes(&bytes)?.len(), 1);
//! # Ok::<(), nupkg::Error>(())
//! ```

pub(crate) mod options;

use std::io::{self, Write};

pub use options::WriteOptions;

use crate::format::{self, flags};
use crate::read::{Archive, Entry};
use crate::{Error, Result};

impl Archive {
    /// Writes the archive to `writer`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeature`] if the archive would need ZIP64
    /// records (more than 65535 entries, or sizes and offsets beyond 4 GiB),
    /// and [`Error::Io`] if writing fails.
    pub fn write<W: Write>(&self, writer: W) -> Result<u64> {
        let entries = self.entries();
        if entries.len() >= u16::MAX as usize {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }

        let mut out = CountingWriter::new(writer);
        let mut offsets = Vec::with_capacity(entries.len());
        for entry in entries {
            offsets.push(to_u32(out.count)?);
            write_local_header(&mut out, entry)?;
            out.write_all(entry.raw_data())?;
        }

        let directory_offset = out.count;
        for (entry, offset) in entries.iter().zip(offsets) {
            write_central_header(&mut out, entry, offset)?;
        }
        let directory_size = out.count - directory_offset;

        let comment = self.comment();
        let comment_len = u16::try_from(comment.len()).map_err(|_| {
            Error::ResourceLimitExceeded(format!(
                "archive comment is {} bytes, limit is {}",
                comment.len(),
                format::MAX_COMMENT_LENGTH
            ))
        })?;
        let count = entries.len() as u16;
        out.write_all(&format::END_OF_CENTRAL_DIRECTORY_SIGNATURE.to_le_bytes())?;
        out.write_all(&0u16.to_le_bytes())?;
        out.write_all(&0u16.to_le_bytes())?;
        out.write_all(&count.to_le_bytes())?;
        out.write_all(&count.to_le_bytes())?;
        out.write_all(&to_u32(directory_size)?.to_le_bytes())?;
        out.write_all(&to_u32(directory_offset)?.to_le_bytes())?;
        out.write_all(&comment_len.to_le_bytes())?;
        out.write_all(comment)?;
        out.flush()?;

        log::debug!(
            "wrote zip archive: {} entries, {} bytes",
            entries.len(),
            out.count
        );
        Ok(out.count)
    }

    /// Writes the archive into a new buffer.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}

/// Header fields shared by local and central records.
struct SharedFields {
    flags: u16,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    name_len: u16,
}

impl SharedFields {
    fn of(entry: &Entry) -> Result<Self> {
        Ok(Self {
            flags: entry.flags & !flags::DATA_DESCRIPTOR,
            crc32: entry.crc32,
            compressed_size: to_u32(entry.compressed_size())?,
            uncompressed_size: to_u32(entry.uncompressed_size)?,
            name_len: field_len(&entry.raw_name, "entry name")?,
        })
    }

    fn write_to<W: Write>(&self, out: &mut W, entry: &Entry) -> io::Result<()> {
        out.write_all(&self.flags.to_le_bytes())?;
        out.write_all(&entry.method.as_u16().to_le_bytes())?;
        out.write_all(&entry.modified_time.to_le_bytes())?;
        out.write_all(&entry.modified_date.to_le_bytes())?;
        out.write_all(&self.crc32.to_le_bytes())?;
        out.write_all(&self.compressed_size.to_le_bytes())?;
        out.write_all(&self.uncompressed_size.to_le_bytes())?;
        out.write_all(&self.name_len.to_le_bytes())
    }
}

fn write_local_header<W: Write>(out: &mut W, entry: &Entry) -> Result<()> {
    let shared = SharedFields::of(entry)?;
    let extra_len = field_len(&entry.local_extra, "local extra field")?;

    out.write_all(&format::LOCAL_FILE_HEADER_SIGNATURE.to_le_bytes())?;
    out.write_all(&entry.version_needed.to_le_bytes())?;
    shared.write_to(out, entry)?;
    out.write_all(&extra_len.to_le_bytes())?;
    out.write_all(&entry.raw_name)?;
    out.write_all(&entry.local_extra)?;
    Ok(())
}

fn write_central_header<W: Write>(out: &mut W, entry: &Entry, offset: u32) -> Result<()> {
    let shared = SharedFields::of(entry)?;
    let extra_len = field_len(&entry.central_extra, "central extra field")?;
    let comment_len = field_len(&entry.comment, "entry comment")?;

    out.write_all(&format::CENTRAL_DIRECTORY_SIGNATURE.to_le_bytes())?;
    out.write_all(&entry.version_made_by.to_le_bytes())?;
    out.write_all(&entry.version_needed.to_le_bytes())?;
    shared.write_to(out, entry)?;
    out.write_all(&extra_len.to_le_bytes())?;
    out.write_all(&comment_len.to_le_bytes())?;
    out.write_all(&0u16.to_le_bytes())?;
    out.write_all(&entry.internal_attributes.to_le_bytes())?;
    out.write_all(&entry.external_attributes.to_le_bytes())?;
    out.write_all(&offset.to_le_bytes())?;
    out.write_all(&entry.raw_name)?;
    out.write_all(&entry.central_extra)?;
    out.write_all(&entry.comment)?;
    Ok(())
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::UnsupportedFeature { feature: "ZIP64" })
}

fn field_len(field: &[u8], what: &str) -> Result<u16> {
    u16::try_from(field.len()).map_err(|_| {
        Error::ResourceLimitExceeded(format!(
            "{} is {} bytes, limit is {}",
            what,
            field.len(),
            u16::MAX
        ))
    })
}

/// Writer adapter that tracks the number of bytes written.
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
