//! Compression codec infrastructure for zip entries.
//!
//! Zip identifies the compression of each entry by a 16-bit method number.
//! Only the methods needed to read and re-encode a package manifest are
//! decoded here; entries with any other method are still copied verbatim by
//! the writer.

use std::fmt;
use std::io::{self, Read, Write};

use crate::{Error, Result};

mod copy;

#[cfg(feature = "deflate")]
pub mod deflate;

pub use copy::{CopyDecoder, CopyEncoder};

/// Trait for decompression decoders.
pub trait Decoder: Read + Send {
    /// Returns the compression method this decoder handles.
    fn method(&self) -> CompressionMethod;
}

/// Trait for compression encoders.
pub trait Encoder: Write + Send {
    /// Returns the compression method this encoder produces.
    fn method(&self) -> CompressionMethod;

    /// Finishes encoding and flushes all data to the sink.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// Zip method numbers.
pub mod method {
    /// Stored (no compression).
    pub const STORED: u16 = 0;
    /// Deflate.
    pub const DEFLATED: u16 = 8;
    /// Deflate64.
    pub const DEFLATE64: u16 = 9;
    /// BZip2.
    pub const BZIP2: u16 = 12;
    /// LZMA.
    pub const LZMA: u16 = 14;
    /// Zstandard.
    pub const ZSTD: u16 = 93;
}

/// Compression method of a zip entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// Data is stored without compression.
    Stored,
    /// Data is compressed with raw Deflate.
    Deflated,
    /// Any other method; the raw number is kept for verbatim copies.
    Other(u16),
}

impl CompressionMethod {
    /// Maps a zip method number to a compression method.
    pub fn from_u16(value: u16) -> Self {
        match value {
            method::STORED => CompressionMethod::Stored,
            method::DEFLATED => CompressionMethod::Deflated,
            other => CompressionMethod::Other(other),
        }
    }

    /// Returns the zip method number.
    pub fn as_u16(self) -> u16 {
        match self {
            CompressionMethod::Stored => method::STORED,
            CompressionMethod::Deflated => method::DEFLATED,
            CompressionMethod::Other(value) => value,
        }
    }

    /// Returns a human-readable name for this method.
    pub fn name(self) -> &'static str {
        match self.as_u16() {
            method::STORED => "Stored",
            method::DEFLATED => "Deflate",
            method::DEFLATE64 => "Deflate64",
            method::BZIP2 => "BZip2",
            method::LZMA => "LZMA",
            method::ZSTD => "Zstandard",
            _ => "Unknown",
        }
    }

    /// Returns whether this build can decode and encode the method.
    pub fn is_supported(self) -> bool {
        match self {
            CompressionMethod::Stored => true,
            CompressionMethod::Deflated => cfg!(feature = "deflate"),
            CompressionMethod::Other(_) => false,
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u16())
    }
}

/// Builds a decoder producing the uncompressed form of `input`.
///
/// `size` is the expected uncompressed size; decoders never yield more
/// than `size + 1` bytes so an oversized stream is detectable by the caller
/// without decoding it completely.
pub fn build_decoder<'a>(
    method: CompressionMethod,
    input: &'a [u8],
    size: u64,
) -> Result<Box<dyn Decoder + 'a>> {
    match method {
        CompressionMethod::Stored => Ok(Box::new(CopyDecoder::new(input, size.saturating_add(1)))),
        #[cfg(feature = "deflate")]
        CompressionMethod::Deflated => Ok(Box::new(deflate::DeflateDecoder::new(
            input,
            size.saturating_add(1),
        ))),
        other => Err(Error::UnsupportedMethod {
            method: other.as_u16(),
        }),
    }
}

/// Builds an encoder that writes the compressed form of its input to `output`.
///
/// `level` is a Deflate level (0-9) and is ignored for stored entries.
pub fn build_encoder<'a, W: Write + Send + 'a>(
    method: CompressionMethod,
    output: W,
    level: u32,
) -> Result<Box<dyn Encoder + 'a>> {
    match method {
        CompressionMethod::Stored => Ok(Box::new(CopyEncoder::new(output))),
        #[cfg(feature = "deflate")]
        CompressionMethod::Deflated => Ok(Box::new(deflate::DeflateEncoder::new(
            output,
            &deflate::DeflateEncoderOptions::with_level(level),
        ))),
        other => {
            let _ = level;
            Err(Error::UnsupportedMethod {
                method: other.as_u16(),
            })
        }
    }
}

/// Compresses `data` in one call.
pub fn encode(method: CompressionMethod, data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2 + 64);
    {
        let mut encoder = build_encoder(method, &mut out, level)?;
        encoder.write_all(data)?;
        encoder.finish()?;
    }
    Ok(out)
}
