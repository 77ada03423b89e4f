use anyhow::Result;
use release_audit_core::report::{AuditSummary, CheckOutcome, Finding, Severity};

/// Print one status line, e.g. `ERROR: Binary not found: build/prod/runner`.
pub fn print_status(severity: Severity, message: &str) {
    println!("{}: {}", severity.label(), message);
}

pub fn print_finding(finding: &Finding) {
    print_status(finding.severity, &finding.message);
    for detail in &finding.details {
        println!("{detail}");
    }
}

pub fn print_outcome(outcome: &CheckOutcome) {
    for finding in &outcome.findings {
        print_finding(finding);
    }
}

/// Print `summary` as pretty JSON.
pub fn print_summary_json(summary: &AuditSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Text rendering of a summary: every outcome, then the closing verdict line.
pub fn print_summary(summary: &AuditSummary, success: &str, failure: &str) {
    for outcome in &summary.outcomes {
        print_outcome(outcome);
    }
    if summary.passed {
        print_status(Severity::Pass, success);
    } else {
        print_status(Severity::Error, failure);
    }
}
