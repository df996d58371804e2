//! Streams a package can be rewritten in.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// A readable, writable, seekable stream that can also be truncated.
///
/// The rewriter replaces the whole content of the stream, and the new
/// package may be shorter than the old one, so plain `Write + Seek` is not
/// enough.
pub trait PackageStream: Read + Write + Seek {
    /// Sets the length of the stream, truncating or zero-extending it.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl PackageStream for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

impl PackageStream for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        resize(self.get_mut(), len)
    }
}

impl PackageStream for Cursor<&mut Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        resize(self.get_mut(), len)
    }
}

impl<S: PackageStream + ?Sized> PackageStream for &mut S {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len)
    }
}

fn resize(buffer: &mut Vec<u8>, len: u64) -> io::Result<()> {
    let len = usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
    buffer.resize(len, 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_truncate() {
        let mut cursor = Cursor::new(b"0123456789".to_vec());
        cursor.set_len(4).unwrap();
        assert_eq!(cursor.get_ref(), b"0123");
    }

    #[test]
    fn test_borrowed_cursor_extend() {
        let mut buffer = b"ab".to_vec();
        let mut cursor = Cursor::new(&mut buffer);
        cursor.set_len(4).unwrap();
        assert_eq!(buffer, b"ab\0\0");
    }

    #[test]
    fn test_file_truncate() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"0123456789").unwrap();
        PackageStream::set_len(&mut file, 3).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 3);
    }
}
