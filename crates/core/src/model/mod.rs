//! Core data model shared by the binary and source checks.
//!
//! - `BinaryString`: a printable run pulled out of a binary file.
//! - `SignaturePattern` / `PatternCategory`: literal test signatures.
//! - `Verdict`: the PASS/FAIL outcome of a single binary scan.

use serde::{Deserialize, Serialize};

/// Lowest byte value treated as printable ASCII (space).
pub const PRINTABLE_MIN: u8 = 32;

/// Highest byte value treated as printable ASCII (`~`).
pub const PRINTABLE_MAX: u8 = 126;

/// Default minimum run length for extracted strings.
pub const DEFAULT_MIN_STRING_LENGTH: usize = 4;

/// Returns true when `byte` lies in the printable-ASCII range `[32, 126]`.
pub fn is_printable(byte: u8) -> bool {
    (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&byte)
}

/// A maximal run of printable-ASCII bytes extracted from a binary.
///
/// Strings produced by the extractor never contain a byte outside `[32, 126]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryString {
    /// Byte offset of the first character in the source file.
    pub offset: u64,
    pub value: String,
}

impl BinaryString {
    pub fn new(offset: u64, value: impl Into<String>) -> Self {
        Self { offset, value: value.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl AsRef<str> for BinaryString {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Which rule family a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Test-only function names and test file suffixes. Never suppressed.
    HardFail,
    /// User test file path fragments. Subject to suppression rules.
    SoftFail,
}

/// A literal substring signature used to recognise test artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePattern {
    pub pattern: String,
    pub category: PatternCategory,
}

impl SignaturePattern {
    pub fn hard_fail(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), category: PatternCategory::HardFail }
    }

    pub fn soft_fail(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), category: PatternCategory::SoftFail }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        candidate.contains(self.pattern.as_str())
    }
}

/// Final verdict for one scanned binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}
