//! Manifest editing and package rewriting.
//!
//! This module applies an ordered list of [`EditOperation`]s to the
//! manifest of a package and writes the package back:
//! - Setting recognized metadata fields
//! - Removing recognized metadata fields
//! - Running arbitrary closures against a [`ManifestEditor`](crate::manifest::ManifestEditor)
//!
//! # Example
//!
//! ```rust
//! use nupkg::edit::{EditOperation, ManifestRewriter};
//! use nupkg::manifest::ManifestField;
//! use nupkg::{Archive, Entry, WriteOptions};
//! use nupkg::codec::CompressionMethod;
//! use std::io::Cursor;
//!
//! let nuspec = b"<package><metadata><id>Pkg</id><version>1.0.0</version></metadata></package>";
//! let options = WriteOptions::default();
//! let package = Archive::from_entries(vec![
//!     Entry::new("Pkg.nuspec", nuspec, CompressionMethod::Stored, &options)?,
//!     Entry::new("lib/Pkg.dll", b"MZ", CompressionMethod::Stored, &options)?,
//! ])
//! .to_vec()?;
//!
//! let mut stream = Cursor::new(package);
//! let result = ManifestRewriter::new()
//!     .edit(EditOperation::set(ManifestField::Tags, "json"))
//!     .apply(&mut stream)?;
//! assert_eq!(result.entries_copied, 1);
//! # Ok::<(), nupkg::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! The rewriter works by:
//! 1. Reading the whole archive from the stream
//! 2. Locating the single manifest entry and decoding it
//! 3. Applying the edits in order to the parsed manifest
//! 4. Re-encoding the manifest with its original compression method
//! 5. Re-emitting the archive with every other entry's stored data as is
//! 6. Writing the new archive over the stream in a single pass

mod operation;
mod options;
mod rewriter;
mod stream;

pub use operation::{EditBuilder, EditOperation};
pub use options::RewriteOptions;
pub use rewriter::{ManifestRewriter, RewriteResult, rewrite_manifest, rewrite_path};
pub use stream::PackageStream;
