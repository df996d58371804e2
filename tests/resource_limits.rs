//! Tests for resource limit enforcement.
//!
//! These tests verify that nupkg enforces the configured limits before it
//! spends memory on a package, and that a rejected package is left
//! untouched.
//!
//! Note: ReadLimits builder tests are in src/read/options.rs. This file
//! contains integration tests for limits enforcement during rewrites.

mod common;

use std::io::Cursor;

use nupkg::codec::CompressionMethod;
use nupkg::manifest::ManifestField;
use nupkg::{Archive, Entry, Error, ManifestRewriter, ReadLimits, RewriteOptions, WriteOptions};

use common::{TEST_NUSPEC, build_package};

fn package_with_entries(count: usize) -> Vec<u8> {
    let mut entries = vec![(
        "TestPackage.nuspec".to_string(),
        TEST_NUSPEC.as_bytes().to_vec(),
    )];
    entries.extend((0..count - 1).map(|i| (format!("content/{i}.txt"), vec![b'x'; i % 7])));
    let borrowed: Vec<(&str, &[u8], CompressionMethod)> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice(), CompressionMethod::Stored))
        .collect();
    build_package(&borrowed)
}

fn rewriter_with(limits: ReadLimits) -> ManifestRewriter {
    ManifestRewriter::new()
        .options(RewriteOptions::new().limits(limits))
        .set(ManifestField::Tags, "limited")
}

// =============================================================================
// Entry count
// =============================================================================

#[test]
fn test_entry_count_within_limit() {
    let package = package_with_entries(10);
    let (_, result) = rewriter_with(ReadLimits::new().max_entries(10))
        .apply_to_bytes(&package)
        .unwrap();
    assert_eq!(result.total_entries(), 10);
}

#[test]
fn test_entry_count_exceeded() {
    let package = package_with_entries(11);
    let mut stream = Cursor::new(package.clone());
    let err = rewriter_with(ReadLimits::new().max_entries(10))
        .apply(&mut stream)
        .unwrap_err();
    match err {
        Error::ResourceLimitExceeded(msg) => assert!(msg.contains("11 entries"), "{msg}"),
        other => panic!("Expected ResourceLimitExceeded, got: {:?}", other),
    }
    assert_eq!(stream.get_ref(), &package);
}

// =============================================================================
// Archive size
// =============================================================================

#[test]
fn test_archive_size_exceeded() {
    let package = package_with_entries(3);
    let limit = package.len() as u64 - 1;
    let mut stream = Cursor::new(package.clone());
    let err = rewriter_with(ReadLimits::new().max_archive_bytes(limit))
        .apply(&mut stream)
        .unwrap_err();
    assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err:?}");
    assert_eq!(stream.get_ref(), &package);
}

#[test]
fn test_archive_size_at_limit() {
    let package = package_with_entries(3);
    let limit = package.len() as u64;
    let (_, result) = rewriter_with(ReadLimits::new().max_archive_bytes(limit))
        .apply_to_bytes(&package)
        .unwrap();
    assert_eq!(result.edits_applied, 1);
}

// =============================================================================
// Manifest size
// =============================================================================

#[test]
fn test_manifest_size_exceeded() {
    let package = package_with_entries(2);
    let limit = TEST_NUSPEC.len() as u64 - 1;
    match rewriter_with(ReadLimits::new().max_manifest_bytes(limit)).apply_to_bytes(&package) {
        Err(Error::ResourceLimitExceeded(msg)) => {
            assert!(msg.contains("TestPackage.nuspec"), "{msg}");
        }
        other => panic!("Expected ResourceLimitExceeded, got: {:?}", other),
    }
}

#[test]
fn test_manifest_limit_ignores_payload_size() {
    let options = WriteOptions::default();
    let large = vec![0u8; 64 * 1024];
    let bytes = Archive::from_entries(vec![
        Entry::new(
            "TestPackage.nuspec",
            TEST_NUSPEC.as_bytes(),
            CompressionMethod::Stored,
            &options,
        )
        .unwrap(),
        Entry::new("lib/big.dll", &large, CompressionMethod::Stored, &options).unwrap(),
    ])
    .to_vec()
    .unwrap();

    let limit = TEST_NUSPEC.len() as u64;
    let (_, result) = rewriter_with(ReadLimits::new().max_manifest_bytes(limit))
        .apply_to_bytes(&bytes)
        .unwrap();
    assert_eq!(result.entries_copied, 1);
}

#[test]
fn test_declared_size_checked_before_decoding() {
    let options = WriteOptions::default();
    let mut manifest = Entry::new(
        "TestPackage.nuspec",
        TEST_NUSPEC.as_bytes(),
        CompressionMethod::Stored,
        &options,
    )
    .unwrap();
    manifest.uncompressed_size = u64::from(u32::MAX - 1);
    let bytes = Archive::from_entries(vec![manifest]).to_vec().unwrap();

    let err = ManifestRewriter::new().apply_to_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::ResourceLimitExceeded(_)), "{err:?}");
}

#[test]
fn test_unlimited() {
    let package = package_with_entries(4);
    let (_, result) = rewriter_with(ReadLimits::unlimited())
        .apply_to_bytes(&package)
        .unwrap();
    assert_eq!(result.entries_copied, 3);
}
