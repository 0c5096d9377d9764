//! Shared test utilities for the yakerize crate.

use crate::download::{BuilderDownloader, DownloadError};
use crate::error::{Result, YakerizeError};
use crate::executor::{CommandExecutor, Invocation};
use camino::Utf8Path;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// File name of the program, e.g. `yak.exe` or `git`.
    pub program: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// Files written into the working directory before the result is
    /// returned, standing in for what the real program would produce.
    pub creates: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expect `program` with `args`, succeeding without side effects.
    pub fn new(program: &'static str, args: &[&'static str]) -> Self {
        Self {
            program,
            args: args.to_vec(),
            creates: Vec::new(),
            result: Ok(success_output()),
        }
    }

    /// Write the named files into the working directory when invoked.
    #[must_use]
    pub fn creating(mut self, files: &[&'static str]) -> Self {
        self.creates = files.to_vec();
        self
    }

    /// Return `result` instead of success.
    #[must_use]
    pub fn returning(mut self, result: Result<Output>) -> Self {
        self.result = result;
        self
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    seen: RefCell<Vec<Invocation>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Returns the invocations received so far.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.seen.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        self.seen.borrow_mut().push(invocation.clone());

        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| YakerizeError::StubMismatch {
                message: format!("unexpected invocation `{}`", invocation.command_line()),
            })?;

        let program = Utf8Path::new(&invocation.program)
            .file_name()
            .unwrap_or(&invocation.program);
        if program != call.program || invocation.args != call.args {
            return Err(YakerizeError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{}`",
                    call.program,
                    call.args.join(" "),
                    invocation.command_line()
                ),
            });
        }

        for name in &call.creates {
            std::fs::write(invocation.working_dir.join(name), name.as_bytes())?;
        }
        call.result
    }
}

/// A downloader that serves a fixed body, or fails with 404.
#[derive(Debug, Clone)]
pub struct StubDownloader {
    body: Option<Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Serve `body` for every request.
    pub fn serving(body: &[u8]) -> Self {
        Self {
            body: Some(body.to_vec()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Answer every request with 404.
    pub fn not_found() -> Self {
        Self {
            body: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Returns the URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl BuilderDownloader for StubDownloader {
    fn download(&self, url: &str, dest: &Path) -> std::result::Result<u64, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        let body = self.body.as_ref().ok_or_else(|| DownloadError::NotFound {
            url: url.to_owned(),
        })?;
        std::fs::write(dest, body)?;
        Ok(body.len() as u64)
    }
}
