//! Copy codec (stored entries).

use std::io::{self, Read, Write};

use super::{CompressionMethod, Decoder, Encoder};

/// A decoder that passes data through unchanged, up to a byte limit.
pub struct CopyDecoder<R> {
    inner: R,
    remaining: u64,
}

impl<R: Read + Send> CopyDecoder<R> {
    /// Creates a new copy decoder yielding at most `limit` bytes.
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<R: Read + Send> Read for CopyDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }

        let max_read = usize::try_from(self.remaining)
            .unwrap_or(usize::MAX)
            .min(buf.len());
        let n = self.inner.read(&mut buf[..max_read])?;
        self.remaining = self.remaining.saturating_sub(n as u64);
        Ok(n)
    }
}

impl<R: Read + Send> Decoder for CopyDecoder<R> {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Stored
    }
}

/// An encoder that writes data through unchanged.
pub struct CopyEncoder<W> {
    inner: W,
}

impl<W: Write + Send> CopyEncoder<W> {
    /// Creates a new copy encoder.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write + Send> Write for CopyEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for CopyEncoder<W> {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Stored
    }

    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_copy_decoder_respects_limit() {
        let data = b"Hello, World!";
        let mut decoder = CopyDecoder::new(Cursor::new(data), 5);
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).unwrap();
        assert_eq!(output, b"Hello");
    }

    #[test]
    fn test_copy_decoder_short_input() {
        let mut decoder = CopyDecoder::new(Cursor::new(b"abc"), 100);
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).unwrap();
        assert_eq!(output, b"abc");
    }

    #[test]
    fn test_copy_encoder() {
        let mut out = Vec::new();
        let mut encoder = Box::new(CopyEncoder::new(&mut out));
        encoder.write_all(b"raw").unwrap();
        encoder.finish().unwrap();
        assert_eq!(out, b"raw");
    }
}
