//! Shared test utilities for integration tests.
//!
//! This module provides package-building helpers used across multiple test
//! files.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use nupkg::codec::CompressionMethod;
use nupkg::manifest::{ManifestDocument, NUSPEC_SUFFIX, find_manifest};
use nupkg::{Archive, Entry, WriteOptions};

/// Manifest of the reference test package.
pub const TEST_NUSPEC: &str = r#"<?xml version="1.0"?>
<package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">
  <metadata>
    <id>TestPackage</id>
    <version>0.0.0.1</version>
    <title>Package A</title>
    <authors>ownera, ownerb</authors>
    <owners>ownera, ownerb</owners>
    <requireLicenseAcceptance>false</requireLicenseAcceptance>
    <description>package A description.</description>
    <language>en-US</language>
    <dependencies />
  </metadata>
</package>
"#;

/// Builds a package from `(name, contents, method)` triples.
pub fn build_package(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    let options = WriteOptions::default();
    let entries = entries
        .iter()
        .map(|(name, data, method)| Entry::new(*name, data, *method, &options).unwrap())
        .collect();
    Archive::from_entries(entries).to_vec().unwrap()
}

/// Builds the reference test package: a deflated manifest followed by an
/// empty content file whose name uses a backslash separator.
pub fn test_package() -> Vec<u8> {
    build_package(&[
        (
            "TestPackage.nuspec",
            TEST_NUSPEC.as_bytes(),
            CompressionMethod::Deflated,
        ),
        ("content\\HelloWorld.cs", b"", CompressionMethod::Deflated),
    ])
}

/// Builds a package with several payload entries of mixed methods around
/// the manifest.
pub fn mixed_package() -> Vec<u8> {
    let library = b"MZ\x90\x00\x03\x00\x00\x00".repeat(64);
    build_package(&[
        ("_rels/.rels", b"<Relationships />", CompressionMethod::Deflated),
        (
            "TestPackage.nuspec",
            TEST_NUSPEC.as_bytes(),
            CompressionMethod::Deflated,
        ),
        ("lib/net8.0/TestPackage.dll", library.as_slice(), CompressionMethod::Deflated),
        ("content\\HelloWorld.cs", b"class HelloWorld {}", CompressionMethod::Stored),
        ("[Content_Types].xml", b"<Types />", CompressionMethod::Stored),
    ])
}

/// Builds a package with the `zip` crate from `(name, contents)` pairs.
pub fn zip_crate_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Reads and parses the manifest of a package.
pub fn read_manifest(package: &[u8]) -> ManifestDocument {
    let archive = Archive::from_bytes(package).unwrap();
    let index = find_manifest(archive.entries(), NUSPEC_SUFFIX).unwrap();
    let bytes = archive.entries()[index].read_data().unwrap();
    ManifestDocument::parse(&bytes).unwrap()
}

/// Asserts that two entries are identical apart from their position in
/// the file.
pub fn assert_entry_unchanged(before: &Entry, after: &Entry) {
    assert_eq!(before.name, after.name);
    assert_eq!(before.raw_name, after.raw_name);
    assert_eq!(before.method, after.method);
    assert_eq!(before.crc32, after.crc32);
    assert_eq!(before.uncompressed_size, after.uncompressed_size);
    assert_eq!(before.raw_data(), after.raw_data(), "data of {}", before.name);
    assert_eq!(before.modified_time, after.modified_time);
    assert_eq!(before.modified_date, after.modified_date);
    assert_eq!(before.external_attributes, after.external_attributes);
    assert_eq!(before.local_extra, after.local_extra);
    assert_eq!(before.central_extra, after.central_extra);
    assert_eq!(before.comment, after.comment);
}
