//! Zip container constants and low-level parsing utilities.
//!
//! This module contains the record signatures, fixed record sizes and flag
//! bits defined by the zip application note (APPNOTE.TXT) that the reader
//! and writer need.

pub mod reader;

/// Local file header signature (`PK\x03\x04`).
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Central directory file header signature (`PK\x01\x02`).
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;

/// End of central directory record signature (`PK\x05\x06`).
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

/// ZIP64 end of central directory locator signature (`PK\x06\x07`).
pub const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;

/// Optional data descriptor signature (`PK\x07\x08`).
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;

/// Fixed size of a local file header, excluding name and extra field.
pub const LOCAL_FILE_HEADER_SIZE: usize = 30;

/// Fixed size of a central directory header, excluding variable fields.
pub const CENTRAL_DIRECTORY_HEADER_SIZE: usize = 46;

/// Fixed size of the end of central directory record, excluding comment.
pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 22;

/// Size of the ZIP64 end of central directory locator.
pub const ZIP64_LOCATOR_SIZE: usize = 20;

/// Maximum length of the archive comment.
pub const MAX_COMMENT_LENGTH: usize = u16::MAX as usize;

/// Version needed to extract for stored and deflated entries (2.0).
pub const VERSION_NEEDED_DEFAULT: u16 = 20;

/// Version made by for new entries: MS-DOS host, spec version 2.0.
pub const VERSION_MADE_BY_DEFAULT: u16 = 20;

/// DOS date for 1980-01-01, the earliest representable date.
pub const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;

/// General purpose bit flags.
pub mod flags {
    /// Entry data is encrypted.
    pub const ENCRYPTED: u16 = 1 << 0;
    /// CRC and sizes are stored in a data descriptor after the data.
    pub const DATA_DESCRIPTOR: u16 = 1 << 3;
    /// Strong encryption.
    pub const STRONG_ENCRYPTION: u16 = 1 << 6;
    /// Name and comment are UTF-8.
    pub const UTF8: u16 = 1 << 11;
}
