//! Project configuration consumed by the pipeline.
//!
//! Settings live in an optional `yakerize.toml` at the project base
//! directory. A missing file yields the defaults, so a project can drive the
//! pipeline entirely from command-line arguments.
//!
//! Component flavours (`[ghuser_cpython]`, `[ghuser]`) describe where the
//! componentizer writes its output. The package pulls its components from the
//! first flavour in [`Flavour::PRIORITY`] that names a `target_dir`.

use crate::error::{Result, YakerizeError};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::fmt;

/// File name of the project configuration, relative to the base directory.
pub const CONFIG_FILE_NAME: &str = "yakerize.toml";

/// Default project metadata file holding the current version.
pub const DEFAULT_VERSION_FILE: &str = "pyproject.toml";

/// Parsed contents of `yakerize.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project metadata file consulted when no version is passed.
    pub version_file: Option<String>,
    /// Package staging and builder settings.
    pub yak: YakConfig,
    /// Components built with the CPython componentizer.
    pub ghuser_cpython: Option<FlavourConfig>,
    /// Components built with the IronPython componentizer.
    pub ghuser: Option<FlavourConfig>,
}

/// The `[yak]` block.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct YakConfig {
    /// Manifest template path.
    pub manifest_path: Option<String>,
    /// Logo path.
    pub logo_path: Option<String>,
    /// Staging directory; defaults to `dist/yak_package`.
    pub target_dir: Option<String>,
    /// Host application version tag, e.g. `rh8`.
    pub target_rhino: Option<String>,
    /// Value passed to the builder's `--platform` flag.
    pub platform: Option<String>,
    /// Override for the builder download URL.
    pub download_url: Option<String>,
    /// Expected SHA-256 of the downloaded builder, lowercase hex.
    pub sha256: Option<String>,
    /// Download timeout in seconds.
    pub download_timeout_secs: Option<u64>,
    /// Builder invocation timeout in seconds.
    pub build_timeout_secs: Option<u64>,
}

/// A `[ghuser]`-style block describing one componentizer flavour.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FlavourConfig {
    /// Directory of component sources fed to the componentizer.
    pub source_dir: Option<String>,
    /// Directory the componentizer writes `.ghuser` files to.
    pub target_dir: Option<String>,
    /// Optional prefix prepended to built component names.
    pub prefix: Option<String>,
}

/// Named configuration blocks that can supply component directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavour {
    /// The `[ghuser_cpython]` block.
    GhuserCpython,
    /// The `[ghuser]` block.
    Ghuser,
}

impl Flavour {
    /// Lookup order used when no components directory is passed.
    pub const PRIORITY: [Self; 2] = [Self::GhuserCpython, Self::Ghuser];

    /// Return the table name of this flavour in `yakerize.toml`.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::GhuserCpython => "ghuser_cpython",
            Self::Ghuser => "ghuser",
        }
    }
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl ProjectConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::InvalidConfig`] when the text is not valid
    /// TOML, contains unknown keys or sets a zero timeout.
    pub fn parse(contents: &str, path: &Utf8Path) -> Result<Self> {
        let invalid = |reason: String| YakerizeError::InvalidConfig {
            path: path.to_owned(),
            reason,
        };
        let config: Self = toml::from_str(contents).map_err(|e| invalid(e.to_string()))?;

        for (key, secs) in [
            ("download_timeout_secs", config.yak.download_timeout_secs),
            ("build_timeout_secs", config.yak.build_timeout_secs),
        ] {
            if secs == Some(0) {
                return Err(invalid(format!("yak.{key} must be at least 1")));
            }
        }
        Ok(config)
    }

    /// Return the block for `flavour`, if present.
    #[must_use]
    pub fn flavour(&self, flavour: Flavour) -> Option<&FlavourConfig> {
        match flavour {
            Flavour::GhuserCpython => self.ghuser_cpython.as_ref(),
            Flavour::Ghuser => self.ghuser.as_ref(),
        }
    }

    /// Return every configured flavour `target_dir`, in priority order.
    pub fn flavour_target_dirs(&self) -> impl Iterator<Item = (Flavour, &str)> {
        Flavour::PRIORITY.into_iter().filter_map(|flavour| {
            self.flavour(flavour)
                .and_then(|block| block.target_dir.as_deref())
                .map(|dir| (flavour, dir))
        })
    }
}

/// Return the first flavour in [`Flavour::PRIORITY`] that names a
/// componentizer output directory.
///
/// # Examples
///
/// ```
/// use yakerize::config::{Flavour, FlavourConfig, ProjectConfig, default_components_dir};
///
/// let config = ProjectConfig {
///     ghuser: Some(FlavourConfig {
///         target_dir: Some("build/ghuser".to_owned()),
///         ..FlavourConfig::default()
///     }),
///     ..ProjectConfig::default()
/// };
/// assert_eq!(default_components_dir(&config), Some((Flavour::Ghuser, "build/ghuser")));
/// ```
#[must_use]
pub fn default_components_dir(config: &ProjectConfig) -> Option<(Flavour, &str)> {
    config.flavour_target_dirs().next()
}

/// The project base directory paired with its configuration.
#[derive(Clone, Debug)]
pub struct ProjectContext {
    base_dir: Utf8PathBuf,
    config: ProjectConfig,
}

impl ProjectContext {
    /// Create a context from an already-parsed configuration.
    #[must_use]
    pub fn new(base_dir: Utf8PathBuf, config: ProjectConfig) -> Self {
        Self { base_dir, config }
    }

    /// Load `yakerize.toml` from `base_dir`, falling back to defaults when
    /// the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::InvalidConfig`] if the file exists but cannot
    /// be read or parsed.
    pub fn load(base_dir: &Utf8Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("no {CONFIG_FILE_NAME} in {base_dir}; using defaults");
            return Ok(Self::new(base_dir.to_owned(), ProjectConfig::default()));
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| YakerizeError::InvalidConfig {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let config = ProjectConfig::parse(&contents, &path)?;
        debug!("loaded configuration from {path}");
        Ok(Self::new(base_dir.to_owned(), config))
    }

    /// Return the project base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Return the parsed configuration.
    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolve `raw` against the base directory unless it is absolute.
    #[must_use]
    pub fn resolve_path(&self, raw: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        let raw = raw.as_ref();
        if raw.is_absolute() {
            raw.to_owned()
        } else {
            self.base_dir.join(raw)
        }
    }

    /// Return the project metadata file holding the current version.
    #[must_use]
    pub fn version_file(&self) -> Utf8PathBuf {
        self.resolve_path(
            self.config
                .version_file
                .as_deref()
                .unwrap_or(DEFAULT_VERSION_FILE),
        )
    }
}
