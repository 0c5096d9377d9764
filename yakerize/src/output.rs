//! Progress and summary messages for the CLI.

use camino::Utf8Path;
use std::io::Write;

/// Write a line to stderr, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after staging and building.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use yakerize::output::success_message;
///
/// let message = success_message(2, Utf8Path::new("dist/yak_package/pkg-1.0.0-rh8-any.yak"));
/// assert!(message.contains("2 components"));
/// ```
#[must_use]
pub fn success_message(component_count: usize, artefact: &Utf8Path) -> String {
    let plural = if component_count == 1 {
        "component"
    } else {
        "components"
    };
    format!("Built {artefact} with {component_count} {plural}")
}

/// Format the summary printed after `clean`.
#[must_use]
pub fn clean_summary(removed: usize) -> String {
    let plural = if removed == 1 { "path" } else { "paths" };
    format!("Removed {removed} {plural}")
}
