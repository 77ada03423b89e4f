//! Audit configuration and on-disk layout.
//!
//! - `AuditConfig`: serializable rule set. Every field has a default, so a
//!   partial config file only overrides what it names.
//! - `AuditLayout`: computed paths for a project root.
//! - `load_audit_config`: resolves and parses the config file, if any.

mod layout;
mod util;

pub use layout::AuditLayout;
pub(crate) use layout::slash_joined;
pub use util::{load_audit_config, parse_audit_config, ConfigFormat};

use serde::{Deserialize, Serialize};

use crate::analysis::SignatureSet;
use crate::model::DEFAULT_MIN_STRING_LENGTH;
use crate::permissions::DEFAULT_EXPECTED_MODE;

/// External toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain executable (looked up on PATH when not absolute).
    pub program: String,
    /// Module manifest, relative to the project root.
    pub manifest: String,
    /// Version control executable used for the tidiness check.
    pub vcs_program: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self { program: "go".into(), manifest: "go.mod".into(), vcs_program: "git".into() }
    }
}

/// Source-tree rules enforced by the pattern scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRules {
    /// File extension (without the dot) of scanned source files.
    pub extension: String,
    /// Directory names skipped anywhere in the tree.
    pub excluded_dirs: Vec<String>,
    /// File name suffix identifying test files.
    pub test_file_suffix: String,
    /// Retired command-line flags. Any occurrence fails.
    pub forbidden_flags: Vec<String>,
    /// Package-private constructors.
    pub internal_constructors: Vec<String>,
    /// Subtree (relative to the root) allowed to use the internal constructors.
    pub internal_constructor_subtree: String,
    /// Path fragments that should come from configuration. Advisory.
    pub hardcoded_paths: Vec<String>,
    /// File (relative to the root) allowed to define the hardcoded paths.
    pub hardcoded_path_definition: String,
    /// Exact file names that expose testing APIs.
    pub testing_support_files: Vec<String>,
    /// File name suffixes that expose testing APIs.
    pub testing_support_suffixes: Vec<String>,
    /// Marker that must precede the package clause in testing-support files.
    pub build_constraint: String,
}

impl Default for SourceRules {
    fn default() -> Self {
        Self {
            extension: "go".into(),
            excluded_dirs: vec!["vendor".into()],
            test_file_suffix: "_test.go".into(),
            forbidden_flags: vec!["--hash-directory".into()],
            internal_constructors: vec!["newManagerInternal".into()],
            internal_constructor_subtree: "internal/verification".into(),
            hardcoded_paths: vec!["go-safe-cmd-runner/hashes".into()],
            hardcoded_path_definition: "internal/cmdcommon/common.go".into(),
            testing_support_files: vec!["manager_testing.go".into()],
            testing_support_suffixes: vec!["_testing.go".into()],
            build_constraint: "//go:build test".into(),
        }
    }
}

/// Release binary rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryRules {
    /// Binaries checked by `all`, relative to the project root.
    pub release_binaries: Vec<String>,
    /// Production build directory, relative to the project root.
    pub production_dir: String,
    /// Binary names expected inside `production_dir`.
    pub production_binaries: Vec<String>,
    /// Production binaries expected to carry the setuid bit.
    pub setuid_binaries: Vec<String>,
    pub min_string_length: usize,
    pub expected_mode: u32,
    pub signatures: SignatureSet,
}

impl Default for BinaryRules {
    fn default() -> Self {
        Self {
            release_binaries: vec![
                "build/prod/runner".into(),
                "build/prod/record".into(),
                "build/prod/verify".into(),
            ],
            production_dir: "build/prod".into(),
            production_binaries: vec!["record".into(), "verify".into(), "runner".into()],
            setuid_binaries: vec!["runner".into()],
            min_string_length: DEFAULT_MIN_STRING_LENGTH,
            expected_mode: DEFAULT_EXPECTED_MODE,
            signatures: SignatureSet::default(),
        }
    }
}

/// Complete audit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Human-friendly project name used in report headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub toolchain: ToolchainConfig,
    pub source: SourceRules,
    pub binaries: BinaryRules,
}

impl AuditConfig {
    /// Name shown in report headers.
    pub fn display_name(&self) -> &str {
        self.project.as_deref().unwrap_or("go-safe-cmd-runner")
    }
}
