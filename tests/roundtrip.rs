//! Round-trip tests for the zip container.
//!
//! These tests verify that reading an archive and writing it back keeps
//! every entry's header fields and stored data, and that archives produced
//! by other zip writers survive a manifest rewrite.

mod common;

use std::io::{Cursor, Read};

use nupkg::codec::CompressionMethod;
use nupkg::format::{self, flags};
use nupkg::manifest::ManifestField;
use nupkg::{Archive, Entry, ManifestRewriter, WriteOptions};

use common::{TEST_NUSPEC, assert_entry_unchanged, build_package};

/// Builds an archive whose entries carry non-default header fields.
fn decorated_archive() -> Archive {
    let options = WriteOptions::default();

    let mut manifest = Entry::new(
        "TestPackage.nuspec",
        TEST_NUSPEC.as_bytes(),
        CompressionMethod::Stored,
        &options,
    )
    .unwrap();
    manifest.modified_time = 0x6a21;
    manifest.modified_date = 0x5a4f;
    manifest.comment = b"package manifest".to_vec();

    let mut library = Entry::new("lib/net8.0/a.dll", b"MZ", CompressionMethod::Stored, &options)
        .unwrap();
    library.version_made_by = (3 << 8) | 63;
    library.external_attributes = 0o100644 << 16;
    library.local_extra = vec![0x55, 0x54, 0x05, 0x00, 0x01, 0x10, 0x20, 0x30, 0x40];
    library.central_extra = vec![0x55, 0x54, 0x05, 0x00, 0x01, 0x10, 0x20, 0x30, 0x40];

    let mut archive = Archive::from_entries(vec![manifest, library]);
    archive.set_comment(b"built for tests".to_vec()).unwrap();
    archive
}

// ============================================================================
// Read/write
// ============================================================================

#[test]
fn test_write_read_preserves_fields() {
    let archive = decorated_archive();
    let bytes = archive.to_vec().unwrap();
    let reread = Archive::from_bytes(&bytes).unwrap();

    assert_eq!(reread.comment(), b"built for tests");
    assert_eq!(reread.len(), archive.len());
    for (before, after) in archive.entries().iter().zip(reread.entries()) {
        assert_entry_unchanged(before, after);
        assert_eq!(before.version_made_by, after.version_made_by);
        assert_eq!(before.flags, after.flags);
    }
}

#[test]
fn test_rewrite_without_changes_is_byte_identical() {
    let bytes = decorated_archive().to_vec().unwrap();
    let reread = Archive::from_bytes(&bytes).unwrap();
    assert_eq!(reread.to_vec().unwrap(), bytes);
}

#[test]
fn test_unicode_names() {
    let package = build_package(&[
        ("content/Grüße.txt", b"hallo", CompressionMethod::Stored),
        ("content/日本.txt", b"konnichiwa", CompressionMethod::Stored),
    ]);
    let archive = Archive::from_bytes(&package).unwrap();
    let names: Vec<_> = archive.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["content/Grüße.txt", "content/日本.txt"]);
    assert!(archive.entries().iter().all(|e| e.flags & flags::UTF8 != 0));
}

#[test]
fn test_directory_entries() {
    let package = build_package(&[
        ("content/", b"", CompressionMethod::Stored),
        ("content/a.txt", b"a", CompressionMethod::Stored),
    ]);
    let archive = Archive::from_bytes(&package).unwrap();
    assert!(archive.entries()[0].is_directory());
    assert!(!archive.entries()[1].is_directory());
}

// ============================================================================
// Rewrite preserves container details
// ============================================================================

#[test]
fn test_rewrite_keeps_comments_and_timestamps() {
    let bytes = decorated_archive().to_vec().unwrap();
    let (output, _) = ManifestRewriter::new()
        .set(ManifestField::Summary, "with comments")
        .apply_to_bytes(&bytes)
        .unwrap();

    let old = Archive::from_bytes(&bytes).unwrap();
    let new = Archive::from_bytes(&output).unwrap();
    assert_eq!(new.comment(), b"built for tests");

    let manifest = &new.entries()[0];
    assert_eq!(manifest.comment, b"package manifest");
    assert_eq!(manifest.modified_time, 0x6a21);
    assert_eq!(manifest.modified_date, 0x5a4f);
    assert_ne!(manifest.crc32, old.entries()[0].crc32);

    assert_entry_unchanged(&old.entries()[1], &new.entries()[1]);
    assert_eq!(new.entries()[1].version_made_by, (3 << 8) | 63);
}

#[test]
fn test_unknown_method_copied_verbatim() {
    let options = WriteOptions::default();
    let manifest = Entry::new(
        "TestPackage.nuspec",
        TEST_NUSPEC.as_bytes(),
        CompressionMethod::Stored,
        &options,
    )
    .unwrap();
    let mut zstd = Entry::new("lib/a.dll", b"opaque frame", CompressionMethod::Stored, &options)
        .unwrap();
    zstd.method = CompressionMethod::from_u16(93);
    let bytes = Archive::from_entries(vec![manifest, zstd]).to_vec().unwrap();

    let (output, _) = ManifestRewriter::new()
        .set(ManifestField::Tags, "zstd")
        .apply_to_bytes(&bytes)
        .unwrap();
    let old = Archive::from_bytes(&bytes).unwrap();
    let new = Archive::from_bytes(&output).unwrap();
    assert_eq!(new.entries()[1].method, CompressionMethod::Other(93));
    assert_entry_unchanged(&old.entries()[1], &new.entries()[1]);
}

#[test]
fn test_data_descriptor_flag_normalized() {
    let mut package = build_package(&[
        ("TestPackage.nuspec", TEST_NUSPEC.as_bytes(), CompressionMethod::Stored),
        ("lib/a.dll", b"MZ", CompressionMethod::Stored),
    ]);
    // Mark the second entry as using a data descriptor in its central header.
    let eocd = package.len() - 22;
    let cd = u32::from_le_bytes(package[eocd + 16..eocd + 20].try_into().unwrap()) as usize;
    let first_len = format::CENTRAL_DIRECTORY_HEADER_SIZE + "TestPackage.nuspec".len();
    let flag_at = cd + first_len + 8;
    let flags_value = u16::from_le_bytes([package[flag_at], package[flag_at + 1]]);
    package[flag_at..flag_at + 2]
        .copy_from_slice(&(flags_value | flags::DATA_DESCRIPTOR).to_le_bytes());

    let archive = Archive::from_bytes(&package).unwrap();
    assert!(archive.entries()[1].has_data_descriptor());

    let (output, _) = ManifestRewriter::new()
        .set(ManifestField::Tags, "normalized")
        .apply_to_bytes(&package)
        .unwrap();
    let new = Archive::from_bytes(&output).unwrap();
    assert!(!new.entries()[1].has_data_descriptor());
    assert_eq!(new.entries()[1].read_data().unwrap(), b"MZ");
}

// ============================================================================
// Interoperability
// ============================================================================

#[cfg(feature = "deflate")]
#[test]
fn test_zip_crate_archive_round_trip() {
    let package = common::zip_crate_package(&[
        ("_rels/.rels", b"<Relationships />"),
        ("TestPackage.nuspec", TEST_NUSPEC.as_bytes()),
        ("lib/net8.0/TestPackage.dll", b"MZ\x90\x00"),
    ]);
    let archive = Archive::from_bytes(&package).unwrap();
    assert_eq!(archive.len(), 3);
    let nuspec = archive.entry_by_name("TestPackage.nuspec").unwrap();
    assert_eq!(nuspec.read_data().unwrap(), TEST_NUSPEC.as_bytes());

    let rewritten = archive.to_vec().unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(rewritten)).unwrap();
    assert_eq!(zip.len(), 3);
    for (name, expected) in [
        ("_rels/.rels", b"<Relationships />".as_slice()),
        ("TestPackage.nuspec", TEST_NUSPEC.as_bytes()),
        ("lib/net8.0/TestPackage.dll", b"MZ\x90\x00".as_slice()),
    ] {
        let mut contents = Vec::new();
        zip.by_name(name).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents, expected, "{name}");
    }
}
