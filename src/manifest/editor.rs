//! Field-level editing façade over a manifest document.

use super::document::ManifestDocument;
use super::field::ManifestField;

/// A mutable view of the recognized fields of a [`ManifestDocument`].
///
/// The editor holds no state of its own; every change is applied to the
/// borrowed document immediately, so edits made through one editor are
/// visible to the next. Structure other than the recognized fields is not
/// reachable through it.
///
/// # Example
///
/// ```rust
/// use nupkg::manifest::ManifestDocument;
///
/// let mut doc = ManifestDocument::parse(b"<package><metadata/></package>")?;
/// let mut editor = doc.editor();
/// editor.set_authors("Me and You");
/// editor.set_require_license_acceptance(true);
/// assert_eq!(editor.authors().as_deref(), Some("Me and You"));
/// assert_eq!(editor.require_license_acceptance(), Some(true));
/// # Ok::<(), nupkg::Error>(())
/// ```
#[derive(Debug)]
pub struct ManifestEditor<'a> {
    document: &'a mut ManifestDocument,
}

impl<'a> ManifestEditor<'a> {
    /// Creates an editor over `document`.
    pub fn new(document: &'a mut ManifestDocument) -> Self {
        Self { document }
    }

    /// Returns the value of a field.
    pub fn get(&self, field: ManifestField) -> Option<String> {
        self.document.get(field)
    }

    /// Sets the value of a field, creating its element if needed.
    pub fn set(&mut self, field: ManifestField, value: impl Into<String>) {
        self.document.set(field, value);
    }

    /// Removes a field. Returns whether it was present.
    pub fn clear(&mut self, field: ManifestField) -> bool {
        self.document.remove(field)
    }

    /// Package identifier.
    pub fn id(&self) -> Option<String> {
        self.get(ManifestField::Id)
    }

    /// Package version.
    pub fn version(&self) -> Option<String> {
        self.get(ManifestField::Version)
    }

    /// Package title.
    pub fn title(&self) -> Option<String> {
        self.get(ManifestField::Title)
    }

    /// Sets the package title.
    pub fn set_title(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Title, value);
    }

    /// Comma-separated authors.
    pub fn authors(&self) -> Option<String> {
        self.get(ManifestField::Authors)
    }

    /// Sets the authors.
    pub fn set_authors(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Authors, value);
    }

    /// Comma-separated owners.
    pub fn owners(&self) -> Option<String> {
        self.get(ManifestField::Owners)
    }

    /// Sets the owners.
    pub fn set_owners(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Owners, value);
    }

    /// Space-separated tags.
    pub fn tags(&self) -> Option<String> {
        self.get(ManifestField::Tags)
    }

    /// Sets the tags.
    pub fn set_tags(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Tags, value);
    }

    /// Long description.
    pub fn description(&self) -> Option<String> {
        self.get(ManifestField::Description)
    }

    /// Sets the description.
    pub fn set_description(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Description, value);
    }

    /// Locale of the package contents.
    pub fn language(&self) -> Option<String> {
        self.get(ManifestField::Language)
    }

    /// Sets the language.
    pub fn set_language(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Language, value);
    }

    /// Short description.
    pub fn summary(&self) -> Option<String> {
        self.get(ManifestField::Summary)
    }

    /// Sets the summary.
    pub fn set_summary(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Summary, value);
    }

    /// Release notes.
    pub fn release_notes(&self) -> Option<String> {
        self.get(ManifestField::ReleaseNotes)
    }

    /// Sets the release notes.
    pub fn set_release_notes(&mut self, value: impl Into<String>) {
        self.set(ManifestField::ReleaseNotes, value);
    }

    /// Copyright notice.
    pub fn copyright(&self) -> Option<String> {
        self.get(ManifestField::Copyright)
    }

    /// Sets the copyright notice.
    pub fn set_copyright(&mut self, value: impl Into<String>) {
        self.set(ManifestField::Copyright, value);
    }

    /// Project home page.
    pub fn project_url(&self) -> Option<String> {
        self.get(ManifestField::ProjectUrl)
    }

    /// Sets the project home page.
    pub fn set_project_url(&mut self, value: impl Into<String>) {
        self.set(ManifestField::ProjectUrl, value);
    }

    /// Icon location.
    pub fn icon_url(&self) -> Option<String> {
        self.get(ManifestField::IconUrl)
    }

    /// Sets the icon location.
    pub fn set_icon_url(&mut self, value: impl Into<String>) {
        self.set(ManifestField::IconUrl, value);
    }

    /// License location.
    pub fn license_url(&self) -> Option<String> {
        self.get(ManifestField::LicenseUrl)
    }

    /// Sets the license location.
    pub fn set_license_url(&mut self, value: impl Into<String>) {
        self.set(ManifestField::LicenseUrl, value);
    }

    /// Returns the license acceptance flag.
    ///
    /// `None` if the field is absent or is neither `true` nor `false`
    /// (compared case-insensitively).
    pub fn require_license_acceptance(&self) -> Option<bool> {
        let value = self.get(ManifestField::RequireLicenseAcceptance)?;
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Sets the license acceptance flag.
    pub fn set_require_license_acceptance(&mut self, value: bool) {
        self.set(ManifestField::RequireLicenseAcceptance, value.to_string());
    }
}
