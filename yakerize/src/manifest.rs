//! Version substitution in the staged manifest.
//!
//! Substitution is purely textual: every occurrence of
//! [`VERSION_PLACEHOLDER`] on every line is replaced and the manifest's
//! structure is never inspected.

use crate::error::{Result, YakerizeError};
use camino::Utf8Path;
use log::debug;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Token replaced with the resolved version.
pub const VERSION_PLACEHOLDER: &str = "{{ version }}";

/// Replace every placeholder occurrence in `text` with `version`.
///
/// Line endings are preserved exactly.
///
/// # Examples
///
/// ```
/// use yakerize::manifest::substitute_version;
///
/// let text = "name: pkg\nversion = \"{{ version }}\"\n";
/// assert_eq!(substitute_version(text, "1.2.3"), "name: pkg\nversion = \"1.2.3\"\n");
/// ```
#[must_use]
pub fn substitute_version(text: &str, version: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| line.replace(VERSION_PLACEHOLDER, version))
        .collect()
}

/// Rewrite the manifest at `path` with the version substituted.
///
/// The new contents are written to a sibling temporary file which then
/// replaces the original, so readers never observe a half-written manifest.
///
/// # Errors
///
/// Returns [`YakerizeError::ManifestTemplating`] if the manifest cannot be
/// read or replaced.
pub fn set_version_in_manifest(path: &Utf8Path, version: &str) -> Result<()> {
    let templating = |source: std::io::Error| YakerizeError::ManifestTemplating {
        path: path.to_owned(),
        source,
    };

    let original = fs::read_to_string(path).map_err(templating)?;
    let occurrences = original.matches(VERSION_PLACEHOLDER).count();
    let rendered = substitute_version(&original, version);

    let dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let mut replacement = NamedTempFile::new_in(dir).map_err(templating)?;
    replacement
        .write_all(rendered.as_bytes())
        .map_err(templating)?;
    let permissions = fs::metadata(path).map_err(templating)?.permissions();
    fs::set_permissions(replacement.path(), permissions).map_err(templating)?;
    replacement.persist(path).map_err(|e| templating(e.error))?;

    debug!("substituted {occurrences} version placeholder(s) in {path}");
    Ok(())
}
