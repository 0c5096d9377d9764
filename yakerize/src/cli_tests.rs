//! Tests for CLI parsing and argument conversion.

use super::*;
use clap::CommandFactory;
use rstest::rstest;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn stage_parses_defaults() {
    let cli = Cli::parse_from(["yakerize", "stage"]);
    assert!(cli.base_dir.is_none());
    assert!(!cli.quiet);
    match cli.command {
        Command::Stage(args) => assert_eq!(RequestArgs::from(args), RequestArgs::default()),
        other => panic!("expected Stage command, got {other:?}"),
    }
}

#[test]
fn stage_converts_every_argument() {
    let cli = Cli::parse_from([
        "yakerize",
        "stage",
        "--components-dir",
        "build/ghuser",
        "--target-dir",
        "out",
        "--manifest-path",
        "yak/manifest.yml",
        "--logo-path",
        "yak/icon.png",
        "--readme-path",
        "README.rst",
        "--license-path",
        "LICENSE.txt",
        "--version",
        "2.0.0",
        "--target-rhino",
        "rh7",
        "--platform",
        "win",
    ]);

    let Command::Stage(args) = cli.command else {
        panic!("expected Stage command");
    };
    let request = RequestArgs::from(args);

    assert_eq!(request.components_dir, Some(Utf8PathBuf::from("build/ghuser")));
    assert_eq!(request.target_dir, Some(Utf8PathBuf::from("out")));
    assert_eq!(request.readme_path, Some(Utf8PathBuf::from("README.rst")));
    assert_eq!(request.version.as_deref(), Some("2.0.0"));
    assert_eq!(request.target_rhino.as_deref(), Some("rh7"));
    assert_eq!(request.platform.as_deref(), Some("win"));
}

#[rstest]
#[case::before(&["yakerize", "--base-dir", "/proj", "-q", "clean"])]
#[case::after(&["yakerize", "clean", "--base-dir", "/proj", "--quiet"])]
fn global_flags_parse_in_any_position(#[case] argv: &[&str]) {
    let cli = Cli::parse_from(argv);
    assert_eq!(cli.base_dir, Some(Utf8PathBuf::from("/proj")));
    assert!(cli.quiet);
}

#[test]
fn clean_flags_disable_categories() {
    let cli = Cli::parse_from(["yakerize", "clean", "--no-docs", "--no-ghuser"]);
    let Command::Clean(args) = cli.command else {
        panic!("expected Clean command");
    };

    let options = CleanOptions::from(&args);
    assert!(!options.docs);
    assert!(options.bytecode);
    assert!(options.builds);
    assert!(!options.ghuser);
}

#[test]
fn prepare_changelog_parses_no_commit() {
    let cli = Cli::parse_from(["yakerize", "prepare-changelog", "--no-commit"]);
    assert!(matches!(
        cli.command,
        Command::PrepareChangelog(PrepareChangelogArgs { no_commit: true })
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["yakerize"]).is_err());
}
