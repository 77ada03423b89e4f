//! Build environment queries.
//!
//! External commands (toolchain, version control) go through the
//! `CommandRunner` trait so checks can be exercised without a real toolchain.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::ToolchainConfig;

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {status}: {stderr}")]
    Failed { command: String, status: String, stderr: String },
}

/// Runs external commands synchronously with captured output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path)
        -> Result<CommandOutput, CommandError>;
}

/// `CommandRunner` backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, CommandError> {
        log::debug!("running {} {} in {}", program, args.join(" "), cwd.display());
        let out = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| CommandError::Spawn { program: program.to_string(), source })?;
        Ok(CommandOutput {
            status: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Run a command and require a zero exit status.
pub fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<CommandOutput, CommandError> {
    let out = runner.run(program, args, cwd)?;
    if out.success() {
        Ok(out)
    } else {
        let command =
            std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ");
        Err(CommandError::Failed {
            command,
            status: out.status.map(|s| s.to_string()).unwrap_or_else(|| "signal".into()),
            stderr: out.stderr.trim().to_string(),
        })
    }
}

/// Toolchain commands bound to a project root.
pub struct Toolchain<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a ToolchainConfig,
    root: PathBuf,
}

impl<'a> Toolchain<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a ToolchainConfig, root: &Path) -> Self {
        Self { runner, config, root: root.to_path_buf() }
    }

    /// `go version`, trimmed.
    pub fn version(&self) -> Result<String, CommandError> {
        let out = run_checked(self.runner, &self.config.program, &["version"], &self.root)?;
        Ok(out.stdout.trim().to_string())
    }

    /// `go mod verify`.
    pub fn verify_modules(&self) -> Result<(), CommandError> {
        run_checked(self.runner, &self.config.program, &["mod", "verify"], &self.root).map(|_| ())
    }

    /// `go mod tidy`.
    pub fn tidy_modules(&self) -> Result<(), CommandError> {
        run_checked(self.runner, &self.config.program, &["mod", "tidy"], &self.root).map(|_| ())
    }

    /// Files with uncommitted changes according to version control.
    ///
    /// A non-zero exit is not an error here; whatever was printed is used.
    pub fn changed_files(&self) -> Result<Vec<String>, CommandError> {
        let out =
            self.runner.run(&self.config.vcs_program, &["diff", "--name-only"], &self.root)?;
        Ok(out.stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
    }
}
