//! Element tree over `xml-rs` events.
//!
//! Names and attributes are kept as qualified names, so prefixes such as
//! `xsi:` or `xml:` are emitted as they were read.

use std::borrow::Cow;
use std::io::Write;

use xml::attribute::{Attribute, OwnedAttribute};
use xml::common::XmlVersion;
use xml::name::OwnedName;
use xml::namespace::Namespace;
use xml::reader::{self, ParserConfig};
use xml::writer::{self, EmitterConfig, EventWriter};

use crate::{Error, Result};

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A child element.
    Element(Element),
    /// Character data, unescaped.
    Text(String),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
    /// A processing instruction.
    ProcessingInstruction {
        /// Target name.
        name: String,
        /// Instruction content.
        data: Option<String>,
    },
}

/// An XML element with its qualified name, attributes in document order,
/// the namespace mappings in scope and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name.
    pub name: OwnedName,
    /// Attributes in document order.
    pub attributes: Vec<OwnedAttribute>,
    /// Namespace mappings in scope at this element.
    pub namespace: Namespace,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: OwnedName, namespace: Namespace) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespace,
            children: Vec::new(),
        }
    }

    /// Returns the local part of the element name.
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Returns the namespace URI of the element.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    /// Returns the value of an attribute by its name as written, with the
    /// prefix if it has one (`"id"`, `"xsi:schemaLocation"`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let (prefix, local) = match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        };
        self.attributes
            .iter()
            .find(|attr| attr.name.local_name == local && attr.name.prefix.as_deref() == prefix)
            .map(|attr| attr.value.as_str())
    }

    /// Returns the value of an attribute by namespace URI and local name.
    pub fn attribute_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| {
                attr.name.local_name == local && attr.name.namespace.as_deref() == Some(namespace)
            })
            .map(|attr| attr.value.as_str())
    }

    /// Iterates over the child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Returns the first child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|element| element.local_name() == local)
    }

    /// Returns the first child element with the given local name, mutably.
    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.local_name() == local => Some(element),
            _ => None,
        })
    }

    /// Removes and returns the first child element with the given local
    /// name.
    pub fn take_child(&mut self, local: &str) -> Option<Element> {
        let index = self.children.iter().position(
            |node| matches!(node, Node::Element(element) if element.local_name() == local),
        )?;
        match self.children.remove(index) {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the concatenated text and CDATA content of the element, or
    /// `None` if it has neither.
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for node in &self.children {
            if let Node::Text(part) | Node::CData(part) = node {
                text.get_or_insert_with(String::new).push_str(part);
            }
        }
        text
    }
}

/// A parsed document: the root element with the comments and processing
/// instructions around it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tree {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Tree {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let events = ParserConfig::new()
            .trim_whitespace(true)
            .ignore_comments(false)
            .create_reader(bytes);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root = None;
        let mut open: Vec<Element> = Vec::new();

        for event in events {
            let event = event.map_err(|e| Error::ManifestParse(e.to_string()))?;
            let node = match event {
                reader::XmlEvent::StartElement {
                    name,
                    attributes,
                    namespace,
                } => {
                    open.push(Element {
                        name,
                        attributes,
                        namespace,
                        children: Vec::new(),
                    });
                    continue;
                }
                reader::XmlEvent::EndElement { .. } => {
                    let Some(element) = open.pop() else {
                        return Err(Error::ManifestParse("unbalanced end tag".into()));
                    };
                    match open.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => root = Some(element),
                    }
                    continue;
                }
                reader::XmlEvent::Characters(text) => Node::Text(text),
                reader::XmlEvent::CData(text) => Node::CData(text),
                reader::XmlEvent::Comment(text) => Node::Comment(text),
                reader::XmlEvent::ProcessingInstruction { name, data } => {
                    Node::ProcessingInstruction { name, data }
                }
                reader::XmlEvent::StartDocument { .. }
                | reader::XmlEvent::EndDocument
                | reader::XmlEvent::Whitespace(_) => continue,
            };

            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None if root.is_none() => prolog.push(node),
                None => epilog.push(node),
            }
        }

        let root = root.ok_or_else(|| Error::ManifestParse("no root element".into()))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Writes the document as indented markup with an XML declaration.
    pub fn write<W: Write>(&self, sink: W) -> writer::Result<()> {
        let mut emitter = EmitterConfig::new()
            .perform_indent(true)
            .write_document_declaration(true)
            .autopad_comments(false)
            .create_writer(sink);

        emitter.write(writer::XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        })?;
        for node in &self.prolog {
            write_node(&mut emitter, node)?;
        }
        write_element(&mut emitter, &self.root)?;
        for node in &self.epilog {
            write_node(&mut emitter, node)?;
        }
        Ok(())
    }
}

fn write_node<W: Write>(emitter: &mut EventWriter<W>, node: &Node) -> writer::Result<()> {
    match node {
        Node::Element(element) => write_element(emitter, element),
        Node::Text(text) => emitter.write(writer::XmlEvent::Characters(text)),
        Node::CData(text) => emitter.write(writer::XmlEvent::CData(text)),
        Node::Comment(text) => emitter.write(writer::XmlEvent::Comment(text)),
        Node::ProcessingInstruction { name, data } => emitter.write(
            writer::XmlEvent::ProcessingInstruction {
                name,
                data: data.as_deref(),
            },
        ),
    }
}

fn write_element<W: Write>(emitter: &mut EventWriter<W>, element: &Element) -> writer::Result<()> {
    let attributes: Vec<Attribute<'_>> =
        element.attributes.iter().map(OwnedAttribute::borrow).collect();
    emitter.write(writer::XmlEvent::StartElement {
        name: element.name.borrow(),
        attributes: Cow::Owned(attributes),
        namespace: Cow::Borrowed(&element.namespace),
    })?;
    for child in &element.children {
        write_node(emitter, child)?;
    }
    emitter.write(writer::XmlEvent::EndElement {
        name: Some(element.name.borrow()),
    })
}
