//! Collection of pre-built components into the staging area.

use crate::error::{Result, YakerizeError};
use crate::staging::copy_into;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// File name suffix of pre-built components.
pub const COMPONENT_SUFFIX: &str = ".ghuser";

/// Copy every file directly inside `source` whose name ends with
/// `.ghuser` into `dest`, including one named exactly `.ghuser`.
///
/// Subdirectories are not descended into and only regular files are
/// copied. Entries whose names are not valid UTF-8 are skipped with a
/// warning. Returns the copied destination paths in enumeration order.
///
/// # Errors
///
/// Returns [`YakerizeError::ComponentsUnreadable`] if `source` cannot be
/// enumerated, or [`YakerizeError::StagingFailed`] if a copy fails.
pub fn collect_components(source: &Utf8Path, dest: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let unreadable = |err: std::io::Error| YakerizeError::ComponentsUnreadable {
        path: source.to_owned(),
        source: err,
    };

    let mut copied = Vec::new();
    for entry in source.as_std_path().read_dir().map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
            warn!(
                "skipping component with non-UTF-8 name: {}",
                entry.path().display()
            );
            continue;
        };

        if !path
            .file_name()
            .is_some_and(|name| name.ends_with(COMPONENT_SUFFIX))
        {
            continue;
        }
        if !entry.file_type().map_err(unreadable)?.is_file() {
            debug!("skipping non-file entry {path}");
            continue;
        }

        copied.push(copy_into(&path, dest)?);
    }

    debug!("collected {} component(s) from {source}", copied.len());
    Ok(copied)
}
