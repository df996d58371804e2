//! Package manifest model and editing.
//!
//! A package carries exactly one manifest entry, an XML document rooted at
//! `package` with a `metadata` child holding the package's descriptive
//! fields. This module finds that entry, parses it into a
//! [`ManifestDocument`], and exposes the recognized fields through a
//! [`ManifestEditor`].

mod document;
mod editor;
mod field;
mod locate;
mod tree;

pub use document::ManifestDocument;
pub use editor::ManifestEditor;
pub use field::{ManifestField, UnknownField};
pub use locate::{find_manifest, has_suffix};
pub use tree::{Element, Node};

/// Entry name suffix of package manifests.
pub const NUSPEC_SUFFIX: &str = ".nuspec";

/// Schema namespaces of published manifest versions.
pub const KNOWN_NAMESPACES: &[&str] = &[
    "http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2012/06/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2013/01/nuspec.xsd",
    "http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd",
];

pub(crate) const PACKAGE_ELEMENT: &str = "package";
pub(crate) const METADATA_ELEMENT: &str = "metadata";
pub(crate) const DEPENDENCIES_ELEMENT: &str = "dependencies";
