//! Input resolution for a staging run.
//!
//! Each field of a [`PackageRequest`] is taken from the explicit argument
//! when given, otherwise from `yakerize.toml`, otherwise from a fallback
//! relative to the project base directory. Validation happens here, before
//! any filesystem writes, so a rejected request leaves no trace on disk.

use crate::config::{ProjectContext, default_components_dir};
use crate::error::{InputKind, Result, YakerizeError};
use crate::platform::{BuildPlatform, DEFAULT_TARGET_PLATFORM, TargetPlatform};
use crate::version::read_version;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Readme fallback relative to the base directory.
pub const DEFAULT_README: &str = "README.md";

/// License fallback relative to the base directory.
pub const DEFAULT_LICENSE: &str = "LICENSE";

/// Staging directory fallback relative to the base directory.
pub const DEFAULT_TARGET_DIR: &str = "dist/yak_package";

/// Explicit values supplied by the caller; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestArgs {
    /// Directory containing the `.ghuser` files.
    pub components_dir: Option<Utf8PathBuf>,
    /// Directory the package is staged in.
    pub target_dir: Option<Utf8PathBuf>,
    /// Manifest template.
    pub manifest_path: Option<Utf8PathBuf>,
    /// Package logo.
    pub logo_path: Option<Utf8PathBuf>,
    /// Readme copied into `misc/`.
    pub readme_path: Option<Utf8PathBuf>,
    /// License copied into `misc/`.
    pub license_path: Option<Utf8PathBuf>,
    /// Version substituted into the manifest.
    pub version: Option<String>,
    /// Host application version tag.
    pub target_rhino: Option<String>,
    /// Builder `--platform` value.
    pub platform: Option<String>,
}

/// The fully-resolved inputs for one staging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Manifest template (exists).
    pub manifest_path: Utf8PathBuf,
    /// Package logo (exists).
    pub logo_path: Utf8PathBuf,
    /// Readme (exists).
    pub readme_path: Utf8PathBuf,
    /// License (exists).
    pub license_path: Utf8PathBuf,
    /// Directory holding `.ghuser` files (exists).
    pub components_dir: Utf8PathBuf,
    /// Staging directory; may not exist yet.
    pub target_dir: Utf8PathBuf,
    /// Non-empty version string.
    pub version: String,
    /// Host application version tag.
    pub target_platform: TargetPlatform,
    /// Builder `--platform` value.
    pub build_platform: BuildPlatform,
}

/// Resolve and validate a [`PackageRequest`].
///
/// # Errors
///
/// Returns the first validation failure, in the order readme, license,
/// manifest, logo, components directory, target platform, build platform,
/// version.
pub fn resolve_request(project: &ProjectContext, args: &RequestArgs) -> Result<PackageRequest> {
    let yak = &project.config().yak;

    let readme_path = require_file(
        InputKind::Readme,
        pick(project, args.readme_path.as_deref(), None)
            .or_else(|| Some(project.resolve_path(DEFAULT_README))),
    )?;
    let license_path = require_file(
        InputKind::License,
        pick(project, args.license_path.as_deref(), None)
            .or_else(|| Some(project.resolve_path(DEFAULT_LICENSE))),
    )?;
    let manifest_path = require_file(
        InputKind::Manifest,
        pick(
            project,
            args.manifest_path.as_deref(),
            yak.manifest_path.as_deref(),
        ),
    )?;
    let logo_path = require_file(
        InputKind::Logo,
        pick(project, args.logo_path.as_deref(), yak.logo_path.as_deref()),
    )?;
    let components_dir = resolve_components_dir(project, args.components_dir.as_deref())?;

    let target_dir = pick(project, args.target_dir.as_deref(), yak.target_dir.as_deref())
        .unwrap_or_else(|| project.resolve_path(DEFAULT_TARGET_DIR));

    let target_platform = TargetPlatform::try_from(
        args.target_rhino
            .as_deref()
            .or(yak.target_rhino.as_deref())
            .unwrap_or(DEFAULT_TARGET_PLATFORM),
    )?;
    let build_platform = match args.platform.as_deref().or(yak.platform.as_deref()) {
        Some(raw) => raw.parse()?,
        None => BuildPlatform::default(),
    };

    let version = resolve_version(project, args.version.as_deref())?;

    debug!(
        "resolved request: version {version}, target {target_platform}, platform {build_platform}, staging {target_dir}"
    );

    Ok(PackageRequest {
        manifest_path,
        logo_path,
        readme_path,
        license_path,
        components_dir,
        target_dir,
        version,
        target_platform,
        build_platform,
    })
}

/// Prefer the explicit argument, then the configured value, each resolved
/// against the base directory.
fn pick(
    project: &ProjectContext,
    explicit: Option<&Utf8Path>,
    configured: Option<&str>,
) -> Option<Utf8PathBuf> {
    explicit
        .map(|path| project.resolve_path(path))
        .or_else(|| configured.map(|raw| project.resolve_path(raw)))
}

fn require_file(kind: InputKind, path: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    let path = path.ok_or(YakerizeError::InputUnspecified { kind })?;
    if !path.is_file() {
        return Err(YakerizeError::InputNotFound { kind, path });
    }
    match std::fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(source) => Err(YakerizeError::InputUnreadable { kind, path, source }),
    }
}

fn resolve_components_dir(
    project: &ProjectContext,
    explicit: Option<&Utf8Path>,
) -> Result<Utf8PathBuf> {
    let path = match explicit {
        Some(path) => project.resolve_path(path),
        None => {
            let (flavour, raw) = default_components_dir(project.config()).ok_or(
                YakerizeError::InputUnspecified {
                    kind: InputKind::ComponentsDir,
                },
            )?;
            debug!("components directory taken from [{flavour}] block");
            project.resolve_path(raw)
        }
    };

    if path.is_dir() {
        Ok(path)
    } else {
        Err(YakerizeError::InputNotFound {
            kind: InputKind::ComponentsDir,
            path,
        })
    }
}

fn resolve_version(project: &ProjectContext, explicit: Option<&str>) -> Result<String> {
    let version_file = project.version_file();
    let version = match explicit {
        Some(version) => version.trim().to_owned(),
        None => read_version(&version_file)?,
    };

    if version.is_empty() {
        return Err(YakerizeError::VersionUnavailable {
            path: version_file,
            reason: "the version string is empty".to_owned(),
        });
    }
    Ok(version)
}

#[cfg(test)]
#[path = "resolution_tests.rs"]
mod tests;
