//! yakerize CLI entrypoint.
//!
//! Dispatches to the stage, clean and prepare-changelog operations and maps
//! their outcome to the process exit status.

use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;
use yakerize::builder::BuilderSettings;
use yakerize::changelog::prepare_changelog;
use yakerize::clean::{CleanOptions, clean};
use yakerize::cli::{Cli, Command};
use yakerize::config::ProjectContext;
use yakerize::download::HttpDownloader;
use yakerize::error::{Result, YakerizeError};
use yakerize::executor::SystemCommandExecutor;
use yakerize::output::{clean_summary, write_stderr_line};
use yakerize::pipeline::{PipelineContext, Services, yakerize};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli, stderr: &mut dyn Write) -> Result<()> {
    let base_dir = determine_base_dir(cli.base_dir)?;
    let project = ProjectContext::load(&base_dir)?;

    match cli.command {
        Command::Stage(args) => {
            let settings = BuilderSettings::from_config(&project.config().yak);
            let downloader = HttpDownloader::new(settings.download_timeout);
            let services = Services {
                downloader: &downloader,
                executor: &SystemCommandExecutor,
            };
            let context = PipelineContext {
                project: &project,
                quiet: cli.quiet,
            };
            yakerize(&context, &args.into(), &services, stderr)?;
        }
        Command::Clean(args) => {
            let removed = clean(&project, CleanOptions::from(&args))?;
            if !cli.quiet {
                write_stderr_line(stderr, clean_summary(removed));
            }
        }
        Command::PrepareChangelog(args) => {
            let path =
                prepare_changelog(project.base_dir(), !args.no_commit, &SystemCommandExecutor)?;
            if !cli.quiet {
                write_stderr_line(stderr, format!("Prepared {path} for the next release"));
            }
        }
    }
    Ok(())
}

/// Use the given base directory or the current directory.
fn determine_base_dir(base_dir: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(dir) = base_dir {
        return Ok(dir);
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| YakerizeError::NonUtf8Path(e.to_string()))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
