//! External command execution.
//!
//! Commands receive their working directory explicitly; the process-wide
//! current directory is never changed. Every invocation carries a timeout
//! after which the child is killed.

use crate::error::{Result, YakerizeError};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default time budget for external commands.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// A fully-described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run, either a bare name looked up on `PATH` or a path.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Directory the program runs in.
    pub working_dir: Utf8PathBuf,
    /// Time after which the program is killed.
    pub timeout: Duration,
}

impl Invocation {
    /// Describe `program` running in `working_dir` with the default timeout.
    #[must_use]
    pub fn new(program: impl Into<String>, working_dir: &Utf8Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.to_owned(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Append arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Replace the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the command line for logs and error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Run the invocation to completion and return its captured output.
    ///
    /// A non-zero exit status is not an error at this level; callers
    /// inspect [`Output::status`].
    ///
    /// # Errors
    ///
    /// Returns [`YakerizeError::CommandLaunch`] if the program cannot be
    /// started and [`YakerizeError::CommandTimeout`] if it exceeds its
    /// timeout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use yakerize::executor::{CommandExecutor, Invocation, SystemCommandExecutor};
    ///
    /// let invocation = Invocation::new("git", Utf8Path::new(".")).args(["status"]);
    /// let output = SystemCommandExecutor.run(&invocation)?;
    /// assert!(output.status.success());
    /// # Ok::<(), yakerize::error::YakerizeError>(())
    /// ```
    fn run(&self, invocation: &Invocation) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, invocation: &Invocation) -> Result<Output> {
        debug!(
            "running `{}` in {}",
            invocation.command_line(),
            invocation.working_dir
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(invocation.working_dir.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| YakerizeError::CommandLaunch {
                program: invocation.program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        match child.wait_timeout(invocation.timeout)? {
            Some(status) => Ok(Output {
                status,
                stdout: join_drain(stdout),
                stderr: join_drain(stderr),
            }),
            None => {
                terminate(&mut child);
                Err(YakerizeError::CommandTimeout {
                    program: invocation.program.clone(),
                    seconds: invocation.timeout.as_secs(),
                })
            }
        }
    }
}

/// Read a child pipe to the end on a background thread.
fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            // A read error truncates the captured output; the exit status
            // still reports the outcome.
            let _ = reader.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn join_drain(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Return the trimmed stderr of a failed command, falling back to stdout
/// and finally to the exit status when both are empty.
#[must_use]
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_owned();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return stdout.trim().to_owned();
    }
    format!("exited with {}", output.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{exit_status, failure_output};
    use tempfile::TempDir;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().to_owned()).expect("UTF-8 path");
        (temp, path)
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let invocation =
            Invocation::new("yak.exe", Utf8Path::new("/tmp")).args(["build", "--platform", "any"]);
        assert_eq!(invocation.command_line(), "yak.exe build --platform any");
        assert_eq!(invocation.timeout, DEFAULT_COMMAND_TIMEOUT);
    }

    #[test]
    fn failure_message_prefers_stderr() {
        assert_eq!(failure_message(&failure_output("  boom \n")), "boom");
    }

    #[test]
    fn failure_message_falls_back_to_status() {
        let output = Output {
            status: exit_status(3),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        assert!(failure_message(&output).contains('3'));
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let (_temp, dir) = temp_dir();
        let invocation = Invocation::new("yakerize-no-such-program", &dir);

        let err = SystemCommandExecutor
            .run(&invocation)
            .expect_err("program does not exist");
        assert!(matches!(err, YakerizeError::CommandLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_the_given_working_directory() {
        let (_temp, dir) = temp_dir();
        let before = std::env::current_dir().expect("cwd");

        let output = SystemCommandExecutor
            .run(&Invocation::new("pwd", &dir))
            .expect("pwd runs");

        let reported = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        let expected = dir.as_std_path().canonicalize().expect("canonical dir");
        assert_eq!(
            std::path::Path::new(&reported)
                .canonicalize()
                .expect("canonical"),
            expected
        );
        assert_eq!(std::env::current_dir().expect("cwd"), before);
    }

    #[cfg(unix)]
    #[test]
    fn slow_commands_are_killed_on_timeout() {
        let (_temp, dir) = temp_dir();
        let invocation = Invocation::new("sleep", &dir)
            .args(["5"])
            .timeout(Duration::from_millis(100));

        let err = SystemCommandExecutor
            .run(&invocation)
            .expect_err("command times out");
        assert!(matches!(err, YakerizeError::CommandTimeout { .. }));
    }
}
