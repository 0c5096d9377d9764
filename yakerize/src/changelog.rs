//! Changelog preparation for the next release.
//!
//! Inserts an empty "Unreleased" section above the most recent release
//! heading and, unless told otherwise, commits the result.

use crate::error::{Result, YakerizeError};
use crate::executor::{CommandExecutor, Invocation, failure_message};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// Changelog file name relative to the base directory.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Commit message used when committing the prepared changelog.
pub const COMMIT_MESSAGE: &str = "Prepare changelog for next release";

const HEADING_MARKER: &str = "## ";

const UNRELEASED_TEMPLATE: &str = "## Unreleased\n\n### Added\n\n### Changed\n\n### Removed\n\n\n## ";

/// Insert the unreleased section before the first second-level heading.
///
/// Returns `None` when the text has no such heading.
///
/// # Examples
///
/// ```
/// use yakerize::changelog::insert_unreleased_section;
///
/// let prepared = insert_unreleased_section("# Changelog\n\n## 1.0.0\n").expect("has heading");
/// assert!(prepared.starts_with("# Changelog\n\n## Unreleased\n"));
/// assert!(prepared.ends_with("\n## 1.0.0\n"));
/// ```
#[must_use]
pub fn insert_unreleased_section(text: &str) -> Option<String> {
    text.contains(HEADING_MARKER)
        .then(|| text.replacen(HEADING_MARKER, UNRELEASED_TEMPLATE, 1))
}

/// Prepare `CHANGELOG.md` in `base_dir` and optionally commit it.
///
/// Returns the path of the changelog.
///
/// # Errors
///
/// Returns [`YakerizeError::Changelog`] if the file cannot be read, has no
/// release heading or cannot be written, and [`YakerizeError::Git`] if
/// staging or committing fails.
pub fn prepare_changelog(
    base_dir: &Utf8Path,
    commit: bool,
    executor: &dyn CommandExecutor,
) -> Result<Utf8PathBuf> {
    let path = base_dir.join(CHANGELOG_FILE);
    let changelog_error = |reason: String| YakerizeError::Changelog {
        path: path.clone(),
        reason,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| changelog_error(e.to_string()))?;
    let prepared = insert_unreleased_section(&contents)
        .ok_or_else(|| changelog_error("no \"## \" release heading found".to_owned()))?;
    std::fs::write(&path, prepared).map_err(|e| changelog_error(e.to_string()))?;
    info!("added unreleased section to {path}");

    if commit {
        run_git(executor, base_dir, "add", &["add", CHANGELOG_FILE])?;
        run_git(executor, base_dir, "commit", &["commit", "-m", COMMIT_MESSAGE])?;
    }
    Ok(path)
}

fn run_git(
    executor: &dyn CommandExecutor,
    base_dir: &Utf8Path,
    operation: &'static str,
    args: &[&str],
) -> Result<()> {
    let invocation = Invocation::new("git", base_dir).args(args.iter().copied());
    let output = executor.run(&invocation).map_err(|e| YakerizeError::Git {
        operation,
        message: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(YakerizeError::Git {
            operation,
            message: failure_message(&output),
        });
    }
    Ok(())
}
