//! Fuzz target for reading and rewriting arbitrary bytes as a package.
//!
//! Run with: cargo +nightly fuzz run archive_read

#![no_main]

use libfuzzer_sys::fuzz_target;
use nupkg::manifest::ManifestField;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    if let Ok(archive) = nupkg::Archive::from_bytes(data) {
        for entry in archive.entries() {
            let _ = entry.name.as_str();
            let _ = entry.is_directory();
            let _ = entry.read_data();
        }
        let _ = archive.to_vec();
    }

    // A failed rewrite must leave the input as it was.
    let mut stream = Cursor::new(data.to_vec());
    let edits = vec![nupkg::EditOperation::set(ManifestField::Tags, "fuzz")];
    if nupkg::rewrite_manifest(&mut stream, edits).is_err() {
        assert_eq!(stream.get_ref().as_slice(), data);
    }
});
