//! Manifest edit operations.

use std::fmt;

use crate::manifest::{ManifestEditor, ManifestField};

/// A pending mutation of the manifest.
///
/// Operations are applied in order to the same document, so a later
/// operation sees and may overwrite the result of an earlier one.
pub enum EditOperation {
    /// Set a field to a value, creating the element if absent.
    Set {
        /// Field to set.
        field: ManifestField,
        /// New text of the field.
        value: String,
    },
    /// Remove a field.
    Clear {
        /// Field to remove.
        field: ManifestField,
    },
    /// Run arbitrary code against the editor.
    Custom(Box<dyn FnOnce(&mut ManifestEditor<'_>)>),
}

impl EditOperation {
    /// Creates a set operation.
    pub fn set(field: ManifestField, value: impl Into<String>) -> Self {
        EditOperation::Set {
            field,
            value: value.into(),
        }
    }

    /// Creates a clear operation.
    pub fn clear(field: ManifestField) -> Self {
        EditOperation::Clear { field }
    }

    /// Creates an operation from a closure.
    ///
    /// ```rust
    /// use nupkg::edit::EditOperation;
    ///
    /// let op = EditOperation::custom(|metadata| metadata.set_authors("Me and You"));
    /// assert_eq!(op.operation_type(), "custom");
    /// ```
    pub fn custom<F>(f: F) -> Self
    where
        F: FnOnce(&mut ManifestEditor<'_>) + 'static,
    {
        EditOperation::Custom(Box::new(f))
    }

    /// Returns the field this operation targets, if known up front.
    pub fn field(&self) -> Option<ManifestField> {
        match self {
            EditOperation::Set { field, .. } | EditOperation::Clear { field } => Some(*field),
            EditOperation::Custom(_) => None,
        }
    }

    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            EditOperation::Set { .. } => "set",
            EditOperation::Clear { .. } => "clear",
            EditOperation::Custom(_) => "custom",
        }
    }

    /// Applies the operation to `editor`.
    pub fn apply(self, editor: &mut ManifestEditor<'_>) {
        match self {
            EditOperation::Set { field, value } => editor.set(field, value),
            EditOperation::Clear { field } => {
                editor.clear(field);
            }
            EditOperation::Custom(f) => f(editor),
        }
    }
}

impl fmt::Debug for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOperation::Set { field, value } => f
                .debug_struct("Set")
                .field("field", field)
                .field("value", value)
                .finish(),
            EditOperation::Clear { field } => {
                f.debug_struct("Clear").field("field", field).finish()
            }
            EditOperation::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Builder for creating edit lists fluently.
#[derive(Debug, Default)]
pub struct EditBuilder {
    operations: Vec<EditOperation>,
}

impl EditBuilder {
    /// Creates a new edit builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a set operation.
    pub fn set(mut self, field: ManifestField, value: impl Into<String>) -> Self {
        self.operations.push(EditOperation::set(field, value));
        self
    }

    /// Adds a clear operation.
    pub fn clear(mut self, field: ManifestField) -> Self {
        self.operations.push(EditOperation::clear(field));
        self
    }

    /// Adds a closure operation.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ManifestEditor<'_>) + 'static,
    {
        self.operations.push(EditOperation::custom(f));
        self
    }

    /// Builds the list of operations.
    pub fn build(self) -> Vec<EditOperation> {
        self.operations
    }
}
