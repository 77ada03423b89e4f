//! Permission auditing for release binaries.
//!
//! The minimal requirement is that the owner can read and execute the file.
//! Any other difference from the expected mode is advisory.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Mode release binaries are expected to carry.
pub const DEFAULT_EXPECTED_MODE: u32 = 0o755;

const OWNER_READ: u32 = 0o400;
const OWNER_EXECUTE: u32 = 0o100;
const ANY_EXECUTE: u32 = 0o111;
const PERMISSION_BITS: u32 = 0o777;
const SETUID_BIT: u32 = 0o4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Nothing at the path; there is nothing to check.
    Absent,
    Ok,
    /// Usable, but the permission bits differ from the expected mode.
    NonIdealMode,
    NotRegularFile,
    /// Owner lacks read and/or execute.
    NotExecutable,
}

impl PermissionStatus {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Absent | Self::Ok | Self::NonIdealMode)
    }
}

/// Result of auditing one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionVerdict {
    pub is_regular_file: bool,
    pub is_executable: bool,
    pub matches_expected_mode: bool,
    /// Full mode bits as reported by the filesystem (0 when absent).
    pub mode: u32,
    pub expected_mode: u32,
    pub verdict: PermissionStatus,
}

impl PermissionVerdict {
    fn absent(expected_mode: u32) -> Self {
        Self {
            is_regular_file: false,
            is_executable: false,
            matches_expected_mode: false,
            mode: 0,
            expected_mode,
            verdict: PermissionStatus::Absent,
        }
    }

    /// Owner permission triplet, e.g. `0o7` for rwx.
    pub fn owner_bits(&self) -> u32 {
        (self.mode & 0o700) >> 6
    }

    pub fn has_setuid(&self) -> bool {
        self.mode & SETUID_BIT != 0
    }
}

/// Evaluate raw mode bits against the policy.
pub fn evaluate_mode(mode: u32, is_regular_file: bool, expected_mode: u32) -> PermissionVerdict {
    let owner_ok = mode & (OWNER_READ | OWNER_EXECUTE) == (OWNER_READ | OWNER_EXECUTE);
    let is_executable = mode & ANY_EXECUTE != 0;
    let matches_expected_mode = mode & PERMISSION_BITS == expected_mode & PERMISSION_BITS;

    let verdict = if !is_regular_file {
        PermissionStatus::NotRegularFile
    } else if !owner_ok {
        PermissionStatus::NotExecutable
    } else if !matches_expected_mode {
        PermissionStatus::NonIdealMode
    } else {
        PermissionStatus::Ok
    };

    PermissionVerdict {
        is_regular_file,
        is_executable,
        matches_expected_mode,
        mode,
        expected_mode,
        verdict,
    }
}

#[cfg(unix)]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    // No POSIX mode bits; approximate from the read-only flag.
    if metadata.permissions().readonly() {
        0o555
    } else {
        0o755
    }
}

/// Audit the file at `path` against `expected_mode`.
pub fn audit_permissions(path: impl AsRef<Path>, expected_mode: u32) -> PermissionVerdict {
    let path = path.as_ref();
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return PermissionVerdict::absent(expected_mode),
    };
    evaluate_mode(mode_of(&metadata), metadata.is_file(), expected_mode)
}
