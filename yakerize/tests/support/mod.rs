//! Test support utilities for yakerize integration and behaviour tests.
//!
//! Provides a disposable project tree with every pipeline input in place and
//! a one-shot loopback HTTP server standing in for the vendor endpoint.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;
use yakerize::config::ProjectContext;
use yakerize::download::{BUILDER_EXECUTABLE, BuilderDownloader};
use yakerize::error::Result;
use yakerize::executor::CommandExecutor;
use yakerize::pipeline::{PipelineContext, PipelineOutcome, Services, yakerize};
use yakerize::resolution::RequestArgs;
use yakerize::test_utils::ExpectedCall;

/// Manifest template written into every project tree.
pub const MANIFEST_TEMPLATE: &str =
    "---\nname: mypkg\nversion = \"{{ version }}\"\nauthors:\n- Someone\n";

/// Version recorded in the tree's `pyproject.toml`.
pub const PROJECT_VERSION: &str = "1.0.0";

/// Name the stub builder gives the package.
pub const GENERIC_ARTEFACT: &str = "mypkg-1.0.0-any-any.yak";

/// Name the package should end up with for `rh8`.
pub const RH8_ARTEFACT: &str = "mypkg-1.0.0-rh8-any.yak";

/// A project laid out the way the pipeline expects.
pub struct ProjectTree {
    _temp: TempDir,
    /// Project base directory.
    pub base: Utf8PathBuf,
}

impl ProjectTree {
    /// Create a project with two components and default configuration.
    pub fn new() -> Self {
        Self::with_yak_settings("")
    }

    /// Create a project whose `[yak]` block carries `extra` lines.
    pub fn with_yak_settings(extra: &str) -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let base = Utf8PathBuf::try_from(temp.path().to_owned()).expect("temp path not UTF-8");

        for dir in ["yak", "build/ghuser", "dist"] {
            fs::create_dir_all(base.join(dir)).expect("create project dir");
        }
        let files: [(&str, &str); 8] = [
            ("README.md", "# mypkg\n"),
            ("LICENSE", "MIT License\n"),
            (
                "pyproject.toml",
                "[project]\nname = \"mypkg\"\n\n[tool.bumpversion]\ncurrent_version = \"1.0.0\"\n",
            ),
            ("yak/manifest.yml", MANIFEST_TEMPLATE),
            ("yak/icon.png", "png"),
            ("build/ghuser/Alpha.ghuser", "alpha"),
            ("build/ghuser/Beta.ghuser", "beta"),
            ("build/ghuser/notes.txt", "not a component"),
        ];
        for (path, contents) in files {
            fs::write(base.join(path), contents).expect("write project file");
        }

        let config = format!(
            concat!(
                "[yak]\n",
                "manifest_path = \"yak/manifest.yml\"\n",
                "logo_path = \"yak/icon.png\"\n",
                "{extra}\n",
                "[ghuser]\n",
                "source_dir = \"src/components\"\n",
                "target_dir = \"build/ghuser\"\n",
            ),
            extra = extra
        );
        fs::write(base.join("yakerize.toml"), config).expect("write yakerize.toml");

        Self { _temp: temp, base }
    }

    /// Load the project configuration.
    pub fn project(&self) -> ProjectContext {
        ProjectContext::load(&self.base).expect("project configuration loads")
    }

    /// The default staging directory.
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.base.join("dist/yak_package")
    }

    /// Run the stage pipeline with the given collaborators.
    pub fn stage(
        &self,
        args: &RequestArgs,
        downloader: &dyn BuilderDownloader,
        executor: &dyn CommandExecutor,
    ) -> Result<PipelineOutcome> {
        let project = self.project();
        let context = PipelineContext {
            project: &project,
            quiet: true,
        };
        let services = Services {
            downloader,
            executor,
        };
        yakerize(&context, args, &services, &mut std::io::sink())
    }
}

/// The builder invocation for `platform`, leaving `artefacts` behind.
pub fn build_call(platform: &'static str, artefacts: &[&'static str]) -> ExpectedCall {
    ExpectedCall::new(BUILDER_EXECUTABLE, &["build", "--platform", platform]).creating(artefacts)
}

/// Sorted names of the direct children of `dir`.
pub fn sorted_entries(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = dir
        .read_dir_utf8()
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_owned())
        .collect();
    names.sort();
    names
}

/// Serves exactly one HTTP response on a loopback port.
pub struct LoopbackServer {
    /// URL of the served executable.
    pub url: String,
}

impl LoopbackServer {
    /// Answer the first request with `status_line` (e.g. `404 Not Found`)
    /// and `body`.
    pub fn respond(status_line: &'static str, body: &'static [u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buffer[..n]),
                }
            }
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        });

        Self {
            url: format!("http://{addr}/yak.exe"),
        }
    }
}
