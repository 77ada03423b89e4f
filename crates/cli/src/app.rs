use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Post-build security auditor for Go command-runner releases.
///
/// Runs without a subcommand as `all`. Every check prints `LABEL: message`
/// lines, or one JSON summary with `--json`.
#[derive(Parser, Debug)]
#[command(
    name = "release-audit",
    version = release_audit_core::version(),
    about = "Security checks for release binaries and source trees",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Project root directory. Defaults to the current working directory.
    #[arg(long, global = true, default_value = ".")]
    pub root: String,

    /// Audit config file (JSON, or YAML by extension). Defaults to
    /// `.release-audit/config.{json,yaml,yml}` under the root when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run every check (the default).
    All,

    /// Check the toolchain, the module manifest, and module integrity.
    #[command(alias = "build-env")]
    BuildEnvironment,

    /// Check that testing-support files carry the build constraint.
    BuildTags,

    /// Check the source tree for retired flags and internal APIs.
    #[command(alias = "patterns")]
    ForbiddenPatterns,

    /// Scan one binary for test artifacts and check its permissions.
    Binary {
        /// Path to the binary to check.
        path: Option<String>,
    },

    /// Comprehensive pre-release sequence, including module tidiness and
    /// production binary validation.
    Release,

    /// Print the effective audit configuration as JSON.
    PrintConfig,
}
