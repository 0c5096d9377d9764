//! Version lookup in the project metadata file.

use crate::error::{Result, YakerizeError};
use camino::Utf8Path;

/// Key paths consulted in order; the first non-blank string wins.
const VERSION_KEYS: &[&[&str]] = &[
    &["tool", "bumpversion", "current_version"],
    &["project", "version"],
];

/// Return the first non-blank version string found under [`VERSION_KEYS`].
#[must_use]
pub fn version_from_table(table: &toml::Table) -> Option<String> {
    VERSION_KEYS.iter().find_map(|keys| lookup(table, keys))
}

fn lookup(table: &toml::Table, keys: &[&str]) -> Option<String> {
    let (last, parents) = keys.split_last()?;
    let mut current = table;
    for key in parents {
        current = current.get(*key)?.as_table()?;
    }
    current
        .get(*last)?
        .as_str()
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .map(str::to_owned)
}

/// Read the current version from a TOML project metadata file.
///
/// # Errors
///
/// Returns [`YakerizeError::VersionUnavailable`] if the file is missing,
/// unparseable, or carries no version under any known key.
pub fn read_version(path: &Utf8Path) -> Result<String> {
    let unavailable = |reason: String| YakerizeError::VersionUnavailable {
        path: path.to_owned(),
        reason,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    let table = contents
        .parse::<toml::Table>()
        .map_err(|e| unavailable(e.to_string()))?;

    version_from_table(&table).ok_or_else(|| {
        unavailable("no tool.bumpversion.current_version or project.version entry".to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn table(text: &str) -> toml::Table {
        text.parse().expect("valid TOML")
    }

    #[rstest]
    #[case::bumpversion(
        "[tool.bumpversion]\ncurrent_version = \"2.1.0\"\n[project]\nversion = \"0.0.1\"\n",
        Some("2.1.0")
    )]
    #[case::project_fallback("[project]\nversion = \"0.3.0\"\n", Some("0.3.0"))]
    #[case::blank_bumpversion(
        "[tool.bumpversion]\ncurrent_version = \"  \"\n[project]\nversion = \"0.3.0\"\n",
        Some("0.3.0")
    )]
    #[case::non_string("[project]\nversion = 3\n", None)]
    #[case::missing("[tool.black]\nline-length = 88\n", None)]
    fn version_lookup_follows_priority(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(version_from_table(&table(text)).as_deref(), expected);
    }

    #[test]
    fn read_version_reports_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("pyproject.toml")).expect("UTF-8");

        let err = read_version(&path).expect_err("missing file");
        assert!(matches!(err, YakerizeError::VersionUnavailable { .. }));
        assert!(err.to_string().contains("--version"));
    }

    #[test]
    fn read_version_reads_bumpversion_entry() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("pyproject.toml")).expect("UTF-8");
        std::fs::write(&path, "[tool.bumpversion]\ncurrent_version = \"1.2.3\"\n")
            .expect("write pyproject");

        assert_eq!(read_version(&path).expect("version"), "1.2.3");
    }
}
