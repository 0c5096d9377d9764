//! Discovery and platform tagging of the built package.
//!
//! The builder names platform-agnostic packages
//! `<name>-<version>-any-any.yak`. When the package targets a specific host
//! application version, the first `any` becomes that version tag, giving
//! `<name>-<version>-rh8-any.yak`.

use crate::error::{Result, YakerizeError};
use crate::platform::TargetPlatform;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// File extension of built packages, without the dot.
pub const ARTEFACT_EXTENSION: &str = "yak";

/// Generic platform suffix the builder gives platform-agnostic packages.
const WILDCARD_SUFFIX: &str = "-any-any";

/// Return the single `.yak` file directly inside `dir`.
///
/// # Errors
///
/// Returns [`YakerizeError::NoArtefact`] if there is none,
/// [`YakerizeError::AmbiguousArtefacts`] listing the sorted names if there
/// are several, or [`YakerizeError::Io`] if `dir` cannot be read.
pub fn find_artefact(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut found = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.path().extension() == Some(ARTEFACT_EXTENSION) && entry.file_type()?.is_file() {
            found.push(entry.into_path());
        }
    }

    match found.len() {
        0 => Err(YakerizeError::NoArtefact {
            dir: dir.to_owned(),
        }),
        1 => Ok(found.swap_remove(0)),
        _ => {
            let mut names: Vec<&str> = found.iter().filter_map(|p| p.file_name()).collect();
            names.sort_unstable();
            Err(YakerizeError::AmbiguousArtefacts {
                dir: dir.to_owned(),
                found: names.join(", "),
            })
        }
    }
}

/// Return `file_name` with its generic platform tag replaced by `target`.
///
/// # Errors
///
/// Returns [`YakerizeError::UnexpectedArtefactName`] if the stem does not
/// end with `-any-any` or the extension is not `.yak`.
///
/// # Examples
///
/// ```
/// use yakerize::artefact::platform_tagged_name;
/// use yakerize::platform::TargetPlatform;
///
/// let target = TargetPlatform::try_from("rh8").expect("supported");
/// let renamed = platform_tagged_name("mypkg-1.0.0-any-any.yak", &target).expect("generic name");
/// assert_eq!(renamed, "mypkg-1.0.0-rh8-any.yak");
/// ```
pub fn platform_tagged_name(file_name: &str, target: &TargetPlatform) -> Result<String> {
    let unexpected = || YakerizeError::UnexpectedArtefactName {
        name: file_name.to_owned(),
    };

    let stem = file_name
        .strip_suffix(ARTEFACT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .ok_or_else(unexpected)?;
    let base = stem.strip_suffix(WILDCARD_SUFFIX).ok_or_else(unexpected)?;

    Ok(format!("{base}-{target}-any.{ARTEFACT_EXTENSION}"))
}

/// Rename `artefact` in place so its name carries `target`.
///
/// Returns the new path.
///
/// # Errors
///
/// Returns [`YakerizeError::UnexpectedArtefactName`] if the name lacks the
/// generic tag, or [`YakerizeError::Io`] if the rename fails.
pub fn rename_for_platform(artefact: &Utf8Path, target: &TargetPlatform) -> Result<Utf8PathBuf> {
    let file_name = artefact
        .file_name()
        .ok_or_else(|| YakerizeError::UnexpectedArtefactName {
            name: artefact.to_string(),
        })?;
    let renamed = artefact.with_file_name(platform_tagged_name(file_name, target)?);

    std::fs::rename(artefact, &renamed)?;
    info!("renamed {file_name} to {renamed}");
    Ok(renamed)
}
