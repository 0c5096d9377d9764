//! Package builder.
//!
//! Fetches the packaging executable into the staging area, runs it there,
//! checks that exactly one package came out and, for platform-agnostic
//! builds, tags the package with the target host version. Steps run in
//! order and the first failure aborts the rest.

use crate::artefact::{find_artefact, rename_for_platform};
use crate::config::YakConfig;
use crate::download::{BuilderDownloader, DEFAULT_DOWNLOAD_TIMEOUT, YAK_URL, install_builder};
use crate::error::{Result, YakerizeError};
use crate::executor::{CommandExecutor, DEFAULT_COMMAND_TIMEOUT, Invocation, failure_message};
use crate::platform::{BuildPlatform, TargetPlatform};
use crate::verification::BuilderVerifier;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::time::Duration;

/// Download and invocation settings for the packaging executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderSettings {
    /// Where the executable is downloaded from.
    pub url: String,
    /// Time budget for the download.
    pub download_timeout: Duration,
    /// Time budget for the build invocation.
    pub build_timeout: Duration,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            url: YAK_URL.to_owned(),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            build_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl BuilderSettings {
    /// Take settings from the `[yak]` block, defaulting what it omits.
    #[must_use]
    pub fn from_config(yak: &YakConfig) -> Self {
        let defaults = Self::default();
        Self {
            url: yak.download_url.clone().unwrap_or(defaults.url),
            download_timeout: yak
                .download_timeout_secs
                .map_or(defaults.download_timeout, Duration::from_secs),
            build_timeout: yak
                .build_timeout_secs
                .map_or(defaults.build_timeout, Duration::from_secs),
        }
    }
}

/// What the builder left in the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// The downloaded packaging executable.
    pub executable: Utf8PathBuf,
    /// The final package, renamed when the build was platform-agnostic.
    pub artefact: Utf8PathBuf,
}

/// Drives the packaging executable against a populated staging area.
pub struct PackageBuilder<'a> {
    settings: &'a BuilderSettings,
    downloader: &'a dyn BuilderDownloader,
    verifier: &'a dyn BuilderVerifier,
    executor: &'a dyn CommandExecutor,
}

impl<'a> PackageBuilder<'a> {
    /// Assemble a builder from its collaborators.
    #[must_use]
    pub fn new(
        settings: &'a BuilderSettings,
        downloader: &'a dyn BuilderDownloader,
        verifier: &'a dyn BuilderVerifier,
        executor: &'a dyn CommandExecutor,
    ) -> Self {
        Self {
            settings,
            downloader,
            verifier,
            executor,
        }
    }

    /// Fetch, run, validate and tag.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step: download or
    /// verification, invocation, artefact validation, or rename.
    pub fn build(
        &self,
        staging_dir: &Utf8Path,
        build_platform: BuildPlatform,
        target: &TargetPlatform,
    ) -> Result<BuildOutcome> {
        let executable = install_builder(
            staging_dir,
            &self.settings.url,
            self.downloader,
            self.verifier,
        )?;

        self.invoke(&executable, staging_dir, build_platform)?;

        let built = find_artefact(staging_dir)?;
        let artefact = if build_platform.is_wildcard() {
            rename_for_platform(&built, target)?
        } else {
            debug!("keeping builder name {built} for {build_platform} build");
            built
        };

        Ok(BuildOutcome {
            executable,
            artefact,
        })
    }

    fn invoke(
        &self,
        executable: &Utf8Path,
        staging_dir: &Utf8Path,
        build_platform: BuildPlatform,
    ) -> Result<()> {
        let program = absolute(executable)?;
        let invocation = Invocation::new(program.as_str(), staging_dir)
            .args(["build", "--platform", build_platform.as_str()])
            .timeout(self.settings.build_timeout);

        info!("running {}", invocation.command_line());
        let output = self.executor.run(&invocation)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(YakerizeError::BuilderFailed {
                reason: failure_message(&output),
            })
        }
    }
}

fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let absolute = std::path::absolute(path)?;
    Utf8PathBuf::try_from(absolute).map_err(|e| YakerizeError::NonUtf8Path(e.to_string()))
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
