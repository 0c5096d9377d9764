//! Staging area management.
//!
//! The staging directory mirrors the layout of the final yak package. Each
//! run starts from an empty directory: stale entries are removed one by one
//! and the first removal failure aborts the step, naming the entry that
//! could not be removed.

use crate::error::{Result, YakerizeError};
use crate::resolution::PackageRequest;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::fs;

/// Name of the nested directory holding the readme and license.
pub const MISC_DIR: &str = "misc";

/// Paths of the assets copied into the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAssets {
    /// The staged manifest, still containing the version placeholder.
    pub manifest: Utf8PathBuf,
    /// The staged logo.
    pub logo: Utf8PathBuf,
    /// The staged readme inside `misc/`.
    pub readme: Utf8PathBuf,
    /// The staged license inside `misc/`.
    pub license: Utf8PathBuf,
}

/// A directory laid out like the package being built.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: Utf8PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at `root`. Nothing touches the disk yet.
    #[must_use]
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// Return the staging directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Return the `misc/` subdirectory path.
    #[must_use]
    pub fn misc_path(&self) -> Utf8PathBuf {
        self.root.join(MISC_DIR)
    }

    /// Guarantee the staging directory exists and is empty.
    ///
    /// An existing directory has its direct children removed. A missing one
    /// is created exclusively; its parent must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::StagingFailed`] naming the first entry that
    /// could not be removed, or the directory if it could not be created.
    pub fn prepare(&self) -> Result<()> {
        if self.root.is_dir() {
            debug!("clearing staging directory {}", self.root);
            clear_directory(&self.root)
        } else {
            debug!("creating staging directory {}", self.root);
            create_dir_exclusive(&self.root)
        }
    }

    /// Copy the manifest, logo, readme and license into place.
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::StagingFailed`] if a copy fails or `misc/`
    /// already exists.
    pub fn populate(&self, request: &PackageRequest) -> Result<StagedAssets> {
        let manifest = copy_into(&request.manifest_path, &self.root)?;
        let logo = copy_into(&request.logo_path, &self.root)?;

        let misc = self.misc_path();
        create_dir_exclusive(&misc)?;
        let readme = copy_into(&request.readme_path, &misc)?;
        let license = copy_into(&request.license_path, &misc)?;

        Ok(StagedAssets {
            manifest,
            logo,
            readme,
            license,
        })
    }
}

/// Remove every direct child of `dir`, recursing into subdirectories.
///
/// Symbolic links are removed, never followed.
///
/// # Errors
///
/// Returns [`YakerizeError::StagingFailed`] for the first entry that cannot
/// be enumerated or removed. Entries removed before the failure stay removed.
pub fn clear_directory(dir: &Utf8Path) -> Result<()> {
    let entries = dir.read_dir_utf8().map_err(|e| staging_failed(dir, &e))?;

    for entry in entries {
        let entry = entry.map_err(|e| staging_failed(dir, &e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| staging_failed(path, &e))?;

        let removal = if file_type.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removal.map_err(|e| staging_failed(path, &e))?;
        trace!("removed {path}");
    }

    Ok(())
}

/// Copy `source` into `dest_dir`, keeping its file name.
///
/// # Errors
///
/// Returns [`YakerizeError::StagingFailed`] if `source` has no file name or
/// the copy fails.
pub fn copy_into(source: &Utf8Path, dest_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let name = source.file_name().ok_or_else(|| YakerizeError::StagingFailed {
        path: source.to_owned(),
        reason: "path has no file name".to_owned(),
    })?;
    let dest = dest_dir.join(name);

    fs::copy(source, &dest).map_err(|e| YakerizeError::StagingFailed {
        path: dest.clone(),
        reason: format!("failed to copy {source}: {e}"),
    })?;
    trace!("copied {source} to {dest}");
    Ok(dest)
}

fn create_dir_exclusive(path: &Utf8Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| staging_failed(path, &e))
}

fn staging_failed(path: &Utf8Path, err: &std::io::Error) -> YakerizeError {
    YakerizeError::StagingFailed {
        path: path.to_owned(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
