//! Manifest document model.

use xml::name::OwnedName;

use super::editor::ManifestEditor;
use super::field::ManifestField;
use super::tree::{Element, Node, Tree};
use super::{DEPENDENCIES_ELEMENT, KNOWN_NAMESPACES, METADATA_ELEMENT, PACKAGE_ELEMENT};
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed package manifest.
///
/// The document keeps the full element tree of the manifest. Recognized
/// fields are read and written through [`get`](Self::get) and
/// [`set`](Self::set); every other element, attribute (with its prefix),
/// namespace declaration, CDATA section, comment and processing instruction
/// is carried through serialization as is. Insignificant whitespace is not
/// kept and the output is re-indented.
///
/// # Example
///
/// ```rust
/// use nupkg::manifest::{ManifestDocument, ManifestField};
///
/// let mut doc = ManifestDocument::parse(
///     b"<package><metadata><id>Pkg</id><version>1.0.0</version></metadata></package>",
/// )?;
/// doc.set(ManifestField::Tags, "json parser");
///
/// let reparsed = ManifestDocument::parse(&doc.to_bytes()?)?;
/// assert_eq!(reparsed.id().as_deref(), Some("Pkg"));
/// assert_eq!(reparsed.get(ManifestField::Tags).as_deref(), Some("json parser"));
/// # Ok::<(), nupkg::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    tree: Tree,
}

impl ManifestDocument {
    /// Parses manifest markup.
    ///
    /// A leading UTF-8 byte order mark is skipped. Manifests in a schema
    /// namespace other than the known nuspec namespaces are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestParse`] if the markup is not well-formed or
    /// the root element is not `package`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let tree = Tree::parse(bytes)?;
        if tree.root.local_name() != PACKAGE_ELEMENT {
            return Err(Error::ManifestParse(format!(
                "root element is '{}', expected '{}'",
                tree.root.local_name(),
                PACKAGE_ELEMENT
            )));
        }

        if let Some(namespace) = tree.root.namespace_uri() {
            if !KNOWN_NAMESPACES.contains(&namespace) {
                log::debug!("manifest uses unrecognized namespace '{}'", namespace);
            }
        }

        Ok(Self { tree })
    }

    /// Serializes the document as indented UTF-8 markup with an XML
    /// declaration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestSerialize`] if the tree cannot be emitted.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.tree
            .write(&mut out)
            .map_err(|e| Error::ManifestSerialize(e.to_string()))?;
        Ok(out)
    }

    /// Returns the root `package` element.
    pub fn root(&self) -> &Element {
        &self.tree.root
    }

    /// Returns the `metadata` element, if present.
    pub fn metadata(&self) -> Option<&Element> {
        self.tree.root.child(METADATA_ELEMENT)
    }

    /// Returns the schema namespace of the root element.
    pub fn namespace(&self) -> Option<&str> {
        self.tree.root.namespace_uri()
    }

    /// Returns the trimmed text of a field, or `None` if the field element
    /// is absent. A present but empty element yields an empty string.
    pub fn get(&self, field: ManifestField) -> Option<String> {
        let element = self.metadata()?.child(field.element_name())?;
        Some(
            element
                .text()
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
        )
    }

    /// Sets the text of a field.
    ///
    /// The `metadata` element and the field element are created when
    /// absent, in the namespace of their parent. Any previous content of
    /// the field element is replaced; its attributes are kept.
    pub fn set(&mut self, field: ManifestField, value: impl Into<String>) {
        let value = value.into();
        with_child(&mut self.tree.root, METADATA_ELEMENT, |metadata| {
            with_child(metadata, field.element_name(), |element| {
                element.children = if value.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::Text(value)]
                };
            })
        });
    }

    /// Removes a field element. Returns whether it was present.
    pub fn remove(&mut self, field: ManifestField) -> bool {
        self.tree
            .root
            .child_mut(METADATA_ELEMENT)
            .and_then(|metadata| metadata.take_child(field.element_name()))
            .is_some()
    }

    /// Returns the package identifier.
    pub fn id(&self) -> Option<String> {
        self.get(ManifestField::Id)
    }

    /// Returns the package version.
    pub fn version(&self) -> Option<String> {
        self.get(ManifestField::Version)
    }

    /// Returns the `dependencies` sub-tree, if present.
    ///
    /// The sub-tree is exposed read-only and is never modified by field
    /// edits.
    pub fn dependencies(&self) -> Option<&Element> {
        self.metadata()?.child(DEPENDENCIES_ELEMENT)
    }

    /// Returns the recognized fields present in the document with their
    /// values.
    pub fn fields(&self) -> Vec<(ManifestField, String)> {
        ManifestField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
            .collect()
    }

    /// Returns an editor over the recognized fields.
    pub fn editor(&mut self) -> ManifestEditor<'_> {
        ManifestEditor::new(self)
    }
}

/// Runs `f` on the first child element named `name`, appending a new child
/// with the parent's prefix and namespace if there is none.
fn with_child<T>(parent: &mut Element, name: &str, f: impl FnOnce(&mut Element) -> T) -> T {
    if let Some(child) = parent.child_mut(name) {
        return f(child);
    }

    let qualified = OwnedName {
        local_name: name.to_string(),
        namespace: parent.name.namespace.clone(),
        prefix: parent.name.prefix.clone(),
    };
    let mut child = Element::new(qualified, parent.namespace.clone());
    let result = f(&mut child);
    parent.children.push(Node::Element(child));
    result
}
