//! Fuzz target for manifest parsing and serialization.
//!
//! Run with: cargo +nightly fuzz run manifest_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use nupkg::ManifestDocument;
use nupkg::manifest::ManifestField;

fuzz_target!(|data: &[u8]| {
    let Ok(mut document) = ManifestDocument::parse(data) else {
        return;
    };
    for field in ManifestField::ALL {
        let _ = document.get(field);
    }
    document.editor().set_authors("fuzz");
    if let Ok(bytes) = document.to_bytes() {
        let _ = ManifestDocument::parse(&bytes);
    }
});
