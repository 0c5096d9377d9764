//! Stage-and-build orchestration.
//!
//! Runs input resolution, staging, manifest templating, component
//! collection and the package build in that fixed order. The first failing
//! step ends the run; whatever it already wrote stays on disk.

use crate::builder::{BuilderSettings, PackageBuilder};
use crate::components::collect_components;
use crate::config::ProjectContext;
use crate::download::BuilderDownloader;
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::manifest::set_version_in_manifest;
use crate::output::{success_message, write_stderr_line};
use crate::resolution::{RequestArgs, resolve_request};
use crate::staging::StagingArea;
use crate::verification::verifier_for;
use camino::Utf8PathBuf;
use log::info;
use std::io::Write;

/// Context for a pipeline run.
pub struct PipelineContext<'a> {
    /// Project base directory and configuration.
    pub project: &'a ProjectContext,
    /// Suppress progress output.
    pub quiet: bool,
}

/// External collaborators used by the build step.
pub struct Services<'a> {
    /// Fetches the packaging executable.
    pub downloader: &'a dyn BuilderDownloader,
    /// Runs the packaging executable.
    pub executor: &'a dyn CommandExecutor,
}

/// The deliverables of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// The populated staging directory.
    pub staging_dir: Utf8PathBuf,
    /// Components copied into the staging directory.
    pub components: Vec<Utf8PathBuf>,
    /// The final package file.
    pub artefact: Utf8PathBuf,
}

/// Stage and build the yak package described by `args` and the project
/// configuration.
///
/// Prints progress to stderr if not in quiet mode.
///
/// # Errors
///
/// Returns the first error raised by any step. Validation errors are
/// raised before anything is written.
pub fn yakerize(
    context: &PipelineContext<'_>,
    args: &RequestArgs,
    services: &Services<'_>,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let yak = &context.project.config().yak;
    let request = resolve_request(context.project, args)?;
    let verifier = verifier_for(yak.sha256.as_deref())?;
    let settings = BuilderSettings::from_config(yak);

    let staging = StagingArea::new(request.target_dir.clone());
    progress(context.quiet, stderr, format!("Staging package in {}...", staging.path()));
    staging.prepare()?;
    let assets = staging.populate(&request)?;

    set_version_in_manifest(&assets.manifest, &request.version)?;
    info!("manifest version set to {}", request.version);

    let components = collect_components(&request.components_dir, staging.path())?;
    progress(
        context.quiet,
        stderr,
        format!(
            "Collected {} component(s) from {}",
            components.len(),
            request.components_dir
        ),
    );

    progress(context.quiet, stderr, format!("Downloading yak from {}...", settings.url));
    let builder = PackageBuilder::new(
        &settings,
        services.downloader,
        verifier.as_ref(),
        services.executor,
    );
    let outcome = builder.build(
        staging.path(),
        request.build_platform,
        &request.target_platform,
    )?;

    progress(context.quiet, stderr, success_message(components.len(), &outcome.artefact));

    Ok(PipelineOutcome {
        staging_dir: request.target_dir,
        components,
        artefact: outcome.artefact,
    })
}

fn progress(quiet: bool, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !quiet {
        write_stderr_line(stderr, message);
    }
}
