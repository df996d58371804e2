//! # nupkg
//!
//! A pure-Rust library for rewriting the manifest of NuGet packages.
//!
//! A package (`.nupkg`) is a zip archive holding one `.nuspec` XML manifest
//! and any number of payload entries. This crate edits the metadata fields
//! of that manifest in place and writes the package back, leaving every
//! other entry byte-for-byte as it was: same compression method, same
//! stored data, same CRC, same order.
//!
//! ## Quick Start
//!
//! ### Editing a Package in Place
//!
//! ```rust,no_run
//! use nupkg::{EditOperation, Result};
//! use nupkg::manifest::ManifestField;
//! use std::fs::OpenOptions;
//!
//! fn main() -> Result<()> {
//!     let mut file = OpenOptions::new()
//!         .read(true)
//!         .write(true)
//!         .open("TestPackage.0.0.0.1.nupkg")?;
//!
//!     let result = nupkg::rewrite_manifest(
//!         &mut file,
//!         vec![
//!             EditOperation::set(ManifestField::Authors, "Me and You"),
//!             EditOperation::custom(|metadata| metadata.set_tags("Peas In A Pod")),
//!         ],
//!     )?;
//!     println!("Rewrote {} with {} edits", result.manifest_name, result.edits_applied);
//!     Ok(())
//! }
//! ```
//!
//! ### Replacing a File Atomically
//!
//! ```rust,no_run
//! use nupkg::{EditBuilder, RewriteOptions, Result};
//! use nupkg::manifest::ManifestField;
//!
//! fn main() -> Result<()> {
//!     let edits = EditBuilder::new()
//!         .set(ManifestField::Copyright, "Copyright 2026")
//!         .clear(ManifestField::IconUrl)
//!         .build();
//!     let result = nupkg::rewrite_path("TestPackage.0.0.0.1.nupkg", edits, RewriteOptions::default())?;
//!     println!("Package is now {} bytes", result.archive_size);
//!     Ok(())
//! }
//! ```
//!
//! ### Reading a Manifest
//!
//! ```rust,no_run
//! use nupkg::{Archive, Result};
//! use nupkg::manifest::{ManifestDocument, NUSPEC_SUFFIX, find_manifest};
//! use std::fs::File;
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::read(File::open("TestPackage.0.0.0.1.nupkg")?)?;
//!     let index = find_manifest(archive.entries(), NUSPEC_SUFFIX)?;
//!     let manifest = ManifestDocument::parse(&archive.entries()[index].read_data()?)?;
//!     println!("{} {}", manifest.id().unwrap_or_default(), manifest.version().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate compression for manifest entries |
//! | `invoke` | Yes | Message model for the remote work service |
//!
//! Without `deflate`, packages whose manifest is deflated fail with
//! [`Error::UnsupportedMethod`]; deflated payload entries are still copied.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`:
//!
//! ```rust,no_run
//! use nupkg::Error;
//! use std::io::Cursor;
//!
//! fn retag(package: &mut Vec<u8>) -> nupkg::Result<()> {
//!     match nupkg::rewrite_manifest(Cursor::new(package), Vec::new()) {
//!         Ok(_) => Ok(()),
//!         Err(Error::MultipleManifests { names }) => {
//!             eprintln!("ambiguous package: {}", names.join(", "));
//!             Ok(())
//!         }
//!         Err(e) if e.is_corruption() => {
//!             eprintln!("damaged package: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! # fn main() {}
//! ```
//!
//! ## Resource Limits
//!
//! Packages are processed in memory. [`ReadLimits`] caps the archive size,
//! the entry count and the decoded manifest size before any allocation
//! proportional to them is made.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod checksum;
pub mod codec;
pub mod edit;
pub mod error;
pub mod format;
pub mod manifest;
pub mod read;
pub mod write;

#[cfg(feature = "invoke")]
#[cfg_attr(docsrs, doc(cfg(feature = "invoke")))]
pub mod invoke;

pub use error::{Error, Result};

pub use read::{Archive, Entry, ReadLimits};

pub use write::WriteOptions;

pub use manifest::{ManifestDocument, ManifestEditor, ManifestField};

pub use edit::{
    EditBuilder, EditOperation, ManifestRewriter, PackageStream, RewriteOptions, RewriteResult,
    rewrite_manifest, rewrite_path,
};
