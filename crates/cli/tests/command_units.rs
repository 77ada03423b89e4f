use std::collections::HashMap;
use std::fs;
use std::path::Path;

use clap::Parser;
use release_audit::app::Cli;
use release_audit::commands::{binary_command, print_config_command, run_with};
use release_audit_core::environment::{CommandError, CommandOutput, CommandRunner};
use release_audit_core::report::{EXIT_FAILURE, EXIT_SUCCESS};
use tempfile::tempdir;

/// Answers only the commands it was given; anything else fails to spawn.
#[derive(Default)]
struct FakeRunner {
    ok: HashMap<String, String>,
}

impl FakeRunner {
    fn toolchain() -> Self {
        let mut ok = HashMap::new();
        ok.insert("go version".to_string(), "go version go1.23.4 linux/amd64".to_string());
        ok.insert("go mod verify".to_string(), "all modules verified".to_string());
        ok.insert("go mod tidy".to_string(), String::new());
        ok.insert("git diff --name-only".to_string(), String::new());
        Self { ok }
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
    ) -> Result<CommandOutput, CommandError> {
        let key = format!("{} {}", program, args.join(" "));
        match self.ok.get(&key) {
            Some(stdout) => {
                Ok(CommandOutput { status: Some(0), stdout: stdout.clone(), stderr: String::new() })
            }
            None => Err(CommandError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            }),
        }
    }
}

fn go_project() -> tempfile::TempDir {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("go.mod"), "module example.com/runner\n").expect("go.mod");
    fs::create_dir_all(dir.path().join("cmd/runner")).expect("mkdir");
    fs::write(dir.path().join("cmd/runner/main.go"), "package main\n").expect("main.go");
    dir
}

fn parse(root: &Path, args: &[&str]) -> Cli {
    let root = root.to_str().expect("utf-8 path");
    let argv = ["release-audit", "--root", root].into_iter().chain(args.iter().copied());
    Cli::try_parse_from(argv).expect("parse args")
}

#[test]
fn default_command_is_all() {
    let dir = go_project();
    let cli = parse(dir.path(), &[]);
    assert!(cli.command.is_none());
    assert_eq!(run_with(&cli, &FakeRunner::toolchain()).expect("run"), EXIT_SUCCESS);
}

#[test]
fn build_environment_fails_without_toolchain() {
    let dir = go_project();
    let cli = parse(dir.path(), &["build-env"]);
    assert_eq!(run_with(&cli, &FakeRunner::default()).expect("run"), EXIT_FAILURE);

    let cli = parse(dir.path(), &["build-environment", "--json"]);
    assert_eq!(run_with(&cli, &FakeRunner::toolchain()).expect("run"), EXIT_SUCCESS);
}

#[test]
fn release_passes_on_clean_project_without_binaries() {
    let dir = go_project();
    let cli = parse(dir.path(), &["release"]);
    assert_eq!(run_with(&cli, &FakeRunner::toolchain()).expect("run"), EXIT_SUCCESS);
}

#[test]
fn release_fails_when_tidy_changes_files() {
    let dir = go_project();
    let mut runner = FakeRunner::toolchain();
    runner.ok.insert("git diff --name-only".to_string(), "go.sum\n".to_string());
    let cli = parse(dir.path(), &["release"]);
    assert_eq!(run_with(&cli, &runner).expect("run"), EXIT_FAILURE);
}

#[test]
fn binary_without_path_is_an_audit_failure() {
    let dir = go_project();
    let cli = parse(dir.path(), &["binary"]);
    assert_eq!(binary_command(&cli.global, &FakeRunner::default(), None).expect("run"), 1);
    assert_eq!(run_with(&cli, &FakeRunner::default()).expect("run"), EXIT_FAILURE);
}

#[test]
fn invalid_config_surfaces_as_error() {
    let dir = go_project();
    let cli = parse(dir.path(), &["--config", "missing.yaml", "build-tags"]);
    let err = run_with(&cli, &FakeRunner::toolchain()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read audit config"));
}

#[test]
fn print_config_succeeds_with_defaults() {
    let dir = go_project();
    let cli = parse(dir.path(), &["print-config"]);
    assert_eq!(print_config_command(&cli.global).expect("print"), EXIT_SUCCESS);
}
