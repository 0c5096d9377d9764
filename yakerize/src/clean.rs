//! Removal of generated artefacts from the project tree.
//!
//! Cleaning is best-effort: a path that cannot be removed is logged and
//! skipped.

use crate::config::ProjectContext;
use crate::error::{Result, YakerizeError};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;

/// What to remove besides `dist/`, which is always removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Remove generated API documentation.
    pub docs: bool,
    /// Remove `__pycache__` directories and `.pyc` files.
    pub bytecode: bool,
    /// Remove `build/` and egg-info directories.
    pub builds: bool,
    /// Remove configured componentizer output directories.
    pub ghuser: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            docs: true,
            bytecode: true,
            builds: true,
            ghuser: true,
        }
    }
}

/// Collect the paths `clean` would remove that currently exist.
///
/// # Errors
///
/// Returns [`YakerizeError::Io`] if a search pattern is rejected.
pub fn clean_targets(project: &ProjectContext, options: CleanOptions) -> Result<Vec<Utf8PathBuf>> {
    let base = project.base_dir();
    let mut targets = Vec::new();

    if options.docs {
        targets.push(base.join("docs/api/generated"));
    }
    targets.push(base.join("dist"));

    if options.bytecode {
        for tree in ["src", "tests"] {
            targets.extend(glob_paths(base, &format!("{tree}/**/__pycache__"))?);
        }
        targets.extend(pyc_files(base));
    }

    if options.builds {
        targets.push(base.join("build"));
        targets.extend(glob_paths(base, "src/**/*.egg-info")?);
    }

    if options.ghuser {
        targets.extend(
            project
                .config()
                .flavour_target_dirs()
                .map(|(_, dir)| project.resolve_path(dir)),
        );
    }

    targets.retain(|path| path.symlink_metadata().is_ok());
    targets.sort();
    targets.dedup();
    Ok(targets)
}

/// Remove generated artefacts and return how many paths were removed.
///
/// # Errors
///
/// Returns an error only if the removal targets cannot be computed;
/// individual removal failures are logged and skipped.
pub fn clean(project: &ProjectContext, options: CleanOptions) -> Result<usize> {
    let mut removed = 0;
    for path in clean_targets(project, options)? {
        match remove_path(&path) {
            Ok(()) => {
                debug!("removed {path}");
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove {path}: {e}"),
        }
    }
    Ok(removed)
}

fn remove_path(path: &Utf8Path) -> std::io::Result<()> {
    if path.symlink_metadata()?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn glob_paths(base: &Utf8Path, pattern: &str) -> Result<Vec<Utf8PathBuf>> {
    let full = format!("{}/{pattern}", glob::Pattern::escape(base.as_str()));
    let paths = glob::glob(&full)
        .map_err(|e| YakerizeError::Io(std::io::Error::new(ErrorKind::InvalidInput, e.msg)))?;
    Ok(paths
        .filter_map(std::result::Result::ok)
        .filter_map(|path| Utf8PathBuf::try_from(path).ok())
        .collect())
}

/// Every `.pyc` file under `base`, skipping `.git`.
fn pyc_files(base: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![base.to_owned()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = dir.read_dir_utf8() else {
            continue;
        };
        for entry in entries.filter_map(std::result::Result::ok) {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if entry.file_name() != ".git" {
                    pending.push(entry.into_path());
                }
            } else if entry.path().extension() == Some("pyc") {
                found.push(entry.into_path());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlavourConfig, ProjectConfig};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Tree {
        _temp: TempDir,
        base: Utf8PathBuf,
    }

    impl Tree {
        fn project(&self) -> ProjectContext {
            ProjectContext::new(
                self.base.clone(),
                ProjectConfig {
                    ghuser: Some(FlavourConfig {
                        target_dir: Some("src/pkg/ghuser".to_owned()),
                        ..FlavourConfig::default()
                    }),
                    ..ProjectConfig::default()
                },
            )
        }
    }

    #[fixture]
    fn tree() -> Tree {
        let temp = TempDir::new().expect("temp dir");
        let base = Utf8PathBuf::try_from(temp.path().to_owned()).expect("UTF-8 path");
        for dir in [
            "dist/yak_package",
            "build/lib",
            "docs/api/generated",
            "src/pkg/__pycache__",
            "src/pkg.egg-info",
            "src/pkg/ghuser",
            "tests/__pycache__",
            ".git/objects",
        ] {
            fs::create_dir_all(base.join(dir)).expect("create dir");
        }
        for file in [
            "src/pkg/__init__.py",
            "src/pkg/module.pyc",
            "tasks.pyc",
            ".git/objects/keep.pyc",
        ] {
            fs::write(base.join(file), "x").expect("write file");
        }
        Tree { _temp: temp, base }
    }

    #[rstest]
    fn removes_all_generated_paths(tree: Tree) {
        let removed = clean(&tree.project(), CleanOptions::default()).expect("clean succeeds");

        for gone in [
            "dist",
            "build",
            "docs/api/generated",
            "src/pkg/__pycache__",
            "src/pkg.egg-info",
            "src/pkg/ghuser",
            "tests/__pycache__",
            "src/pkg/module.pyc",
            "tasks.pyc",
        ] {
            assert!(!tree.base.join(gone).exists(), "{gone} should be removed");
        }
        assert!(tree.base.join("src/pkg/__init__.py").is_file());
        assert!(tree.base.join(".git/objects/keep.pyc").is_file());
        assert_eq!(removed, 9);
    }

    #[rstest]
    fn flags_keep_their_paths(tree: Tree) {
        let options = CleanOptions {
            docs: false,
            bytecode: false,
            builds: false,
            ghuser: false,
        };

        let removed = clean(&tree.project(), options).expect("clean succeeds");

        assert_eq!(removed, 1);
        assert!(!tree.base.join("dist").exists());
        assert!(tree.base.join("build").is_dir());
        assert!(tree.base.join("docs/api/generated").is_dir());
        assert!(tree.base.join("tasks.pyc").is_file());
        assert!(tree.base.join("src/pkg/ghuser").is_dir());
    }

    #[rstest]
    fn missing_paths_are_ignored(tree: Tree) {
        fs::remove_dir_all(tree.base.join("dist")).expect("remove dist");

        let targets =
            clean_targets(&tree.project(), CleanOptions::default()).expect("targets computed");

        assert!(!targets.contains(&tree.base.join("dist")));
    }
}
