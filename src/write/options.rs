//! Write options for re-encoded entries.

/// Options controlling how replaced entries are compressed.
///
/// Verbatim entries are never re-encoded, so these options only affect the
/// rewritten manifest and entries built with [`Entry::new`].
///
/// [`Entry::new`]: crate::read::Entry::new
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Deflate compression level (0-9).
    pub level: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl WriteOptions {
    /// Creates new write options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level (0-9).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level` is greater than 9.
    ///
    /// ```rust
    /// use nupkg::{Error, write::WriteOptions};
    ///
    /// assert!(WriteOptions::new().level(9).is_ok());
    /// assert!(matches!(
    ///     WriteOptions::new().level(15),
    ///     Err(Error::InvalidCompressionLevel { level: 15 })
    /// ));
    /// ```
    ///
    /// [`Error::InvalidCompressionLevel`]: crate::Error::InvalidCompressionLevel
    pub fn level(mut self, level: u32) -> crate::Result<Self> {
        if level > 9 {
            return Err(crate::Error::InvalidCompressionLevel { level });
        }
        self.level = level;
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }
}
