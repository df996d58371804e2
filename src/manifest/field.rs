//! Recognized manifest metadata fields.

use std::fmt;
use std::str::FromStr;

/// A metadata field the manifest model exposes as a text property.
///
/// Each field maps to one element directly under `package/metadata`.
/// Field names are matched case-sensitively, as manifest consumers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ManifestField {
    /// Package identifier.
    Id,
    /// Package version string.
    Version,
    /// Human-friendly title.
    Title,
    /// Comma-separated list of authors.
    Authors,
    /// Comma-separated list of owners.
    Owners,
    /// Space-separated tags.
    Tags,
    /// Long description.
    Description,
    /// Locale of the package contents.
    Language,
    /// `true` or `false` text.
    RequireLicenseAcceptance,
    /// Short description.
    Summary,
    /// Release notes for this version.
    ReleaseNotes,
    /// Copyright notice.
    Copyright,
    /// Project home page.
    ProjectUrl,
    /// Icon location.
    IconUrl,
    /// License location.
    LicenseUrl,
}

impl ManifestField {
    /// All recognized fields, in the order they usually appear.
    pub const ALL: [ManifestField; 15] = [
        ManifestField::Id,
        ManifestField::Version,
        ManifestField::Title,
        ManifestField::Authors,
        ManifestField::Owners,
        ManifestField::Tags,
        ManifestField::Description,
        ManifestField::Language,
        ManifestField::RequireLicenseAcceptance,
        ManifestField::Summary,
        ManifestField::ReleaseNotes,
        ManifestField::Copyright,
        ManifestField::ProjectUrl,
        ManifestField::IconUrl,
        ManifestField::LicenseUrl,
    ];

    /// Returns the element name of this field.
    pub fn element_name(self) -> &'static str {
        match self {
            ManifestField::Id => "id",
            ManifestField::Version => "version",
            ManifestField::Title => "title",
            ManifestField::Authors => "authors",
            ManifestField::Owners => "owners",
            ManifestField::Tags => "tags",
            ManifestField::Description => "description",
            ManifestField::Language => "language",
            ManifestField::RequireLicenseAcceptance => "requireLicenseAcceptance",
            ManifestField::Summary => "summary",
            ManifestField::ReleaseNotes => "releaseNotes",
            ManifestField::Copyright => "copyright",
            ManifestField::ProjectUrl => "projectUrl",
            ManifestField::IconUrl => "iconUrl",
            ManifestField::LicenseUrl => "licenseUrl",
        }
    }

    /// Returns whether this field is part of the package identity.
    pub fn is_identity(self) -> bool {
        matches!(self, ManifestField::Id | ManifestField::Version)
    }
}

impl fmt::Display for ManifestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown manifest field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for ManifestField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManifestField::ALL
            .into_iter()
            .find(|field| field.element_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_names_round_trip() {
        for field in ManifestField::ALL {
            assert_eq!(field.element_name().parse::<ManifestField>(), Ok(field));
        }
    }

    #[test]
    fn test_unknown_field() {
        let err = "Authors".parse::<ManifestField>().unwrap_err();
        assert_eq!(err.to_string(), "unknown manifest field 'Authors'");
    }

    #[test]
    fn test_identity_fields() {
        assert!(ManifestField::Id.is_identity());
        assert!(ManifestField::Version.is_identity());
        assert!(!ManifestField::Tags.is_identity());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ManifestField::RequireLicenseAcceptance.to_string(),
            "requireLicenseAcceptance"
        );
    }
}
