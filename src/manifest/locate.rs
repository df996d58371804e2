//! Locating the manifest entry inside an archive.

use crate::read::Entry;
use crate::{Error, Result};

/// Returns whether `name` ends with `suffix`, ignoring ASCII case.
pub fn has_suffix(name: &str, suffix: &str) -> bool {
    let (name, suffix) = (name.as_bytes(), suffix.as_bytes());
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Finds the single entry whose name ends with `suffix`.
///
/// Matching ignores ASCII case and looks at the whole entry name, so a
/// manifest in a sub-directory is found too.
///
/// # Errors
///
/// - [`Error::ManifestNotFound`] if no entry matches
/// - [`Error::MultipleManifests`] if more than one entry matches
///
/// # Example
///
/// ```rust
/// use nupkg::codec::CompressionMethod;
/// use nupkg::manifest::find_manifest;
/// use nupkg::read::Entry;
/// use nupkg::write::WriteOptions;
///
/// let options = WriteOptions::default();
/// let entries = vec![
///     Entry::new("lib/Pkg.dll", b"", CompressionMethod::Stored, &options)?,
///     Entry::new("Pkg.NuSpec", b"", CompressionMethod::Stored, &options)?,
/// ];
/// assert_eq!(find_manifest(&entries, ".nuspec")?, 1);
/// # Ok::<(), nupkg::Error>(())
/// ```
pub fn find_manifest(entries: &[Entry], suffix: &str) -> Result<usize> {
    let mut matches = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| has_suffix(&entry.name, suffix));

    let Some((index, _)) = matches.next() else {
        return Err(Error::ManifestNotFound {
            suffix: suffix.to_string(),
        });
    };

    let others: Vec<String> = matches.map(|(_, entry)| entry.name.clone()).collect();
    if !others.is_empty() {
        let mut names = Vec::with_capacity(others.len() + 1);
        names.push(entries[index].name.clone());
        names.extend(others);
        return Err(Error::MultipleManifests { names });
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CompressionMethod;
    use crate::write::WriteOptions;

    fn entries(names: &[&str]) -> Vec<Entry> {
        names
            .iter()
            .map(|name| {
                Entry::new(*name, b"", CompressionMethod::Stored, &WriteOptions::default())
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_has_suffix() {
        assert!(has_suffix("TestPackage.nuspec", ".nuspec"));
        assert!(has_suffix("TESTPACKAGE.NUSPEC", ".nuspec"));
        assert!(!has_suffix("nuspec", ".nuspec"));
        assert!(!has_suffix("TestPackage.nuspec.bak", ".nuspec"));
    }

    #[test]
    fn test_non_ascii_names() {
        assert!(has_suffix("żółw.nuspec", ".nuspec"));
        assert!(!has_suffix("ż", ".nuspec"));
    }

    #[test]
    fn test_single_match() {
        let list = entries(&["content\\HelloWorld.cs", "TestPackage.nuspec"]);
        assert_eq!(find_manifest(&list, ".nuspec").unwrap(), 1);
    }

    #[test]
    fn test_match_in_subdirectory() {
        let list = entries(&["_rels/.rels", "nested/dir/Pkg.Nuspec"]);
        assert_eq!(find_manifest(&list, ".nuspec").unwrap(), 1);
    }

    #[test]
    fn test_not_found() {
        let list = entries(&["content\\HelloWorld.cs"]);
        match find_manifest(&list, ".nuspec") {
            Err(Error::ManifestNotFound { suffix }) => assert_eq!(suffix, ".nuspec"),
            other => panic!("Expected ManifestNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_multiple_matches() {
        let list = entries(&["a.nuspec", "lib/x.dll", "b/B.NUSPEC"]);
        match find_manifest(&list, ".nuspec") {
            Err(Error::MultipleManifests { names }) => {
                assert_eq!(names, vec!["a.nuspec".to_string(), "b/B.NUSPEC".to_string()])
            }
            other => panic!("Expected MultipleManifests, got: {:?}", other),
        }
    }

    #[test]
    fn test_custom_suffix() {
        let list = entries(&["Pkg.nuspec", "manifest.xml"]);
        assert_eq!(find_manifest(&list, ".xml").unwrap(), 1);
    }
}
