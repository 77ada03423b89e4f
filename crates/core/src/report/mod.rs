//! Check outcomes and the folded audit summary.
//!
//! Every check returns a `CheckOutcome` value; nothing is accumulated on a
//! shared object. The frontend folds outcomes into an `AuditSummary` and maps
//! it to a process exit status.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Exit status for a fully passing audit.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when any check failed or an unexpected error occurred.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when the run was interrupted by the user.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Severity of a single finding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Pass,
    Warning,
    Error,
}

impl Severity {
    /// Prefix used in the text report.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Pass => "PASS",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// One diagnostic produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    /// Supporting lines: offending files, matched strings, etc.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { severity, message: message.into(), details: Vec::new() }
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }
}

/// Result of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub findings: Vec<Finding>,
}

impl CheckOutcome {
    /// Start a passing outcome; recording an error flips it to failed.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), passed: true, findings: Vec::new() }
    }

    pub fn push(&mut self, finding: Finding) {
        if finding.severity == Severity::Error {
            self.passed = false;
        }
        self.findings.push(finding);
    }

    /// Record `finding` and mark the check failed regardless of its severity.
    pub fn fail(&mut self, finding: Finding) {
        self.passed = false;
        self.findings.push(finding);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Finding::new(Severity::Info, message));
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.push(Finding::new(Severity::Pass, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Finding::new(Severity::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Finding::new(Severity::Error, message));
    }

    /// Append every finding of `other` and AND its status into this one.
    pub fn absorb(&mut self, other: CheckOutcome) {
        self.passed &= other.passed;
        self.findings.extend(other.findings);
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity == severity)
    }

    /// Findings of exactly `severity`.
    pub fn findings_of(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }
}

/// Folded result of an audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub passed: bool,
    pub generated_at: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl AuditSummary {
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let passed = outcomes.iter().all(|o| o.passed);
        Self { passed, generated_at: Utc::now().to_rfc3339(), outcomes }
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    pub fn failed_checks(&self) -> Vec<&str> {
        self.outcomes.iter().filter(|o| !o.passed).map(|o| o.name.as_str()).collect()
    }
}
