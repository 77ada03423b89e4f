//! Audit orchestration.
//!
//! `Auditor` runs each check family and returns its `CheckOutcome`; the
//! `all` and `release` sequences fold those outcomes into an `AuditSummary`.
//! No state is carried between checks.

use std::path::Path;

use crate::analysis::{classify, SignatureSet};
use crate::config::{AuditConfig, AuditLayout};
use crate::environment::{CommandRunner, Toolchain};
use crate::model::BinaryString;
use crate::permissions::{audit_permissions, PermissionStatus};
use crate::report::{AuditSummary, CheckOutcome, Finding, Severity};
use crate::services::digest::binary_fingerprint;
use crate::source::{is_testing_support_file, scan_source_tree, PatternHit, SourceScanReport};
use crate::strings::{extract_strings, ExtractError};

pub const CHECK_BUILD_ENVIRONMENT: &str = "build-environment";
pub const CHECK_MODULE_TIDINESS: &str = "module-tidiness";
pub const CHECK_BUILD_TAGS: &str = "build-tags";
pub const CHECK_FORBIDDEN_PATTERNS: &str = "forbidden-patterns";
pub const CHECK_BINARY_SECURITY: &str = "binary-security";
pub const CHECK_BINARY_PERMISSIONS: &str = "binary-permissions";
pub const CHECK_RELEASE_BINARIES: &str = "release-binaries";
pub const CHECK_PRODUCTION_BINARIES: &str = "production-binaries";

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Group hits under each configured pattern, in configuration order.
fn group_by_pattern<'a>(
    patterns: &'a [String],
    hits: &'a [PatternHit],
) -> Vec<(&'a str, Vec<&'a str>)> {
    patterns
        .iter()
        .map(|pattern| {
            let files = hits
                .iter()
                .filter(|h| &h.pattern == pattern)
                .map(|h| h.file.as_str())
                .collect::<Vec<_>>();
            (pattern.as_str(), files)
        })
        .filter(|(_, files)| !files.is_empty())
        .collect()
}

/// Turn an extraction result into the binary-security outcome.
///
/// An extraction failure never fails the check on its own: it is reported as
/// a warning and the binary is treated as having no strings.
pub fn binary_security_outcome(
    binary_name: &str,
    extracted: Result<Vec<BinaryString>, ExtractError>,
    signatures: &SignatureSet,
) -> CheckOutcome {
    let mut outcome = CheckOutcome::new(CHECK_BINARY_SECURITY);
    outcome.info(format!("Checking binary security for: {binary_name}"));

    let strings = match extracted {
        Ok(strings) => strings,
        Err(err) => {
            log::warn!("string extraction failed for {binary_name}: {err}");
            outcome.warn(format!("Failed to analyze binary strings: {err}"));
            return outcome;
        }
    };

    let result = classify(&strings, signatures);
    log::debug!(
        "{}: {} strings scanned, verdict {}",
        binary_name,
        result.strings_scanned,
        result.verdict.as_str()
    );

    for hit in &result.hard_fail {
        outcome.push(
            Finding::new(
                Severity::Error,
                format!(
                    "Test functions found in production binary: {binary_name} (pattern: {})",
                    hit.pattern
                ),
            )
            .with_details(hit.examples.iter().cloned()),
        );
    }

    if result.soft_fail_matched {
        outcome.fail(
            Finding::new(
                Severity::Warning,
                format!("User test file references found in binary: {binary_name}"),
            )
            .with_details(result.soft_fail_examples.iter().cloned()),
        );
    }

    if result.is_clean() {
        outcome.pass(format!("No test artifacts found in binary: {binary_name}"));
    }
    outcome
}

/// Runs the individual checks for one project.
pub struct Auditor<'a> {
    layout: AuditLayout,
    config: AuditConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Auditor<'a> {
    pub fn new(layout: AuditLayout, config: AuditConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { layout, config, runner }
    }

    pub fn layout(&self) -> &AuditLayout {
        &self.layout
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    fn toolchain(&self) -> Toolchain<'_> {
        Toolchain::new(self.runner, &self.config.toolchain, &self.layout.root)
    }

    /// Toolchain present, manifest present, modules verified.
    pub fn build_environment(&self) -> CheckOutcome {
        let mut outcome = CheckOutcome::new(CHECK_BUILD_ENVIRONMENT);
        outcome.info("Checking build environment integrity");
        let toolchain = self.toolchain();

        match toolchain.version() {
            Ok(version) => outcome.info(format!("Toolchain version: {version}")),
            Err(err) => {
                outcome.push(
                    Finding::new(
                        Severity::Error,
                        format!(
                            "Toolchain '{}' is not installed or not in PATH",
                            self.config.toolchain.program
                        ),
                    )
                    .with_details([err.to_string()]),
                );
                return outcome;
            }
        }

        if !self.layout.manifest_path(&self.config).is_file() {
            outcome.error(format!("{} file not found", self.config.toolchain.manifest));
            return outcome;
        }

        if let Err(err) = toolchain.verify_modules() {
            outcome.push(
                Finding::new(
                    Severity::Error,
                    "Module verification failed - module integrity check failed",
                )
                .with_details([err.to_string()]),
            );
            return outcome;
        }

        outcome.pass("Build environment integrity check passed");
        outcome
    }

    /// Tidy modules, then require a clean working tree.
    pub fn module_tidiness(&self) -> CheckOutcome {
        let mut outcome = CheckOutcome::new(CHECK_MODULE_TIDINESS);
        outcome.info("Checking that modules are tidy");
        let toolchain = self.toolchain();

        if let Err(err) = toolchain.tidy_modules() {
            outcome.error(format!("Modules check failed: {err}"));
            return outcome;
        }

        match toolchain.changed_files() {
            Ok(changed) if changed.is_empty() => outcome.pass("Modules are up to date"),
            Ok(changed) => outcome.push(
                Finding::new(
                    Severity::Error,
                    "Module tidy resulted in changes. Please commit the changes first.",
                )
                .with_details(changed),
            ),
            Err(err) => outcome.error(format!("Could not inspect working tree changes: {err}")),
        }
        outcome
    }

    /// Walk the source tree once.
    pub fn scan_sources(&self) -> SourceScanReport {
        scan_source_tree(&self.layout.root, &self.config.source)
    }

    /// Build-constraint gate over an existing scan.
    pub fn build_tags_from(&self, report: &SourceScanReport) -> CheckOutcome {
        let rules = &self.config.source;
        let mut outcome = CheckOutcome::new(CHECK_BUILD_TAGS);
        outcome.info("Checking build tag compliance");

        for skipped in &report.unreadable {
            let name = skipped.file.rsplit('/').next().unwrap_or(&skipped.file);
            if is_testing_support_file(name, rules) {
                outcome.warn(format!("Could not read file {}: {}", skipped.file, skipped.reason));
            }
        }

        if !report.build_tags.passed() {
            outcome.push(
                Finding::new(
                    Severity::Error,
                    format!("Files with testing APIs missing '{}' tag:", rules.build_constraint),
                )
                .with_details(report.build_tags.missing_constraint.iter().cloned()),
            );
            return outcome;
        }

        outcome.pass("Build tag compliance check passed");
        outcome
    }

    /// Forbidden-pattern rules over an existing scan.
    pub fn forbidden_patterns_from(&self, report: &SourceScanReport) -> CheckOutcome {
        let rules = &self.config.source;
        let forbidden = &report.forbidden;
        let mut outcome = CheckOutcome::new(CHECK_FORBIDDEN_PATTERNS);
        outcome.info("Checking for forbidden patterns in source code");

        for skipped in &report.unreadable {
            outcome.warn(format!("Could not read file {}: {}", skipped.file, skipped.reason));
        }

        for (flag, files) in group_by_pattern(&rules.forbidden_flags, &forbidden.forbidden_flags) {
            outcome.push(
                Finding::new(Severity::Error, format!("Found forbidden {flag} flag usage:"))
                    .with_details(files),
            );
        }

        let constructor_hits =
            group_by_pattern(&rules.internal_constructors, &forbidden.internal_constructors);
        for (ctor, files) in constructor_hits {
            outcome.push(
                Finding::new(
                    Severity::Error,
                    format!(
                        "Found forbidden direct {ctor} usage outside {}:",
                        rules.internal_constructor_subtree
                    ),
                )
                .with_details(files),
            );
        }

        if !forbidden.hardcoded_paths.is_empty() {
            outcome.push(
                Finding::new(Severity::Warning, "Found potential hardcoded path references:")
                    .with_details(forbidden.hardcoded_paths.iter().map(|h| h.file.clone())),
            );
        }

        if outcome.passed {
            outcome.pass("No forbidden patterns found");
        }
        outcome
    }

    pub fn build_tags(&self) -> CheckOutcome {
        self.build_tags_from(&self.scan_sources())
    }

    pub fn forbidden_patterns(&self) -> CheckOutcome {
        self.forbidden_patterns_from(&self.scan_sources())
    }

    /// Artifact scan for one binary. A missing binary fails.
    pub fn binary_security(&self, path: &Path) -> CheckOutcome {
        let name = display_name(path);
        if !path.is_file() {
            let mut outcome = CheckOutcome::new(CHECK_BINARY_SECURITY);
            outcome.info(format!("Checking binary security for: {name}"));
            outcome.error(format!("Binary not found: {}", path.display()));
            return outcome;
        }
        let extracted = extract_strings(path, self.config.binaries.min_string_length);
        binary_security_outcome(&name, extracted, &self.config.binaries.signatures)
    }

    /// Permission audit for one binary. A missing binary passes vacuously.
    pub fn binary_permissions(&self, path: &Path) -> CheckOutcome {
        let mut outcome = CheckOutcome::new(CHECK_BINARY_PERMISSIONS);
        let verdict = audit_permissions(path, self.config.binaries.expected_mode);
        if verdict.verdict == PermissionStatus::Absent {
            log::debug!("{} not present, skipping permission check", path.display());
            return outcome;
        }

        outcome.info(format!("Checking binary permissions for: {}", display_name(path)));
        match verdict.verdict {
            PermissionStatus::NotRegularFile => {
                outcome.error(format!("Not a regular file: {}", path.display()));
            }
            PermissionStatus::NotExecutable => {
                outcome.error(format!(
                    "Binary is not executable by its owner: {} (owner {:o}, expected at least r-x)",
                    path.display(),
                    verdict.owner_bits()
                ));
            }
            PermissionStatus::NonIdealMode => {
                outcome.warn(format!(
                    "Binary permissions unexpected: {:o} (expected {:o})",
                    verdict.mode & 0o777,
                    verdict.expected_mode
                ));
                outcome.pass("Binary permissions check passed");
            }
            PermissionStatus::Ok => outcome.pass("Binary permissions check passed"),
            PermissionStatus::Absent => {}
        }
        outcome
    }

    /// Artifact scan and permission audit for one binary.
    pub fn binary(&self, path: &Path) -> Vec<CheckOutcome> {
        vec![self.binary_security(path), self.binary_permissions(path)]
    }

    /// Environment, build tags, forbidden patterns, and every declared
    /// release binary that exists.
    pub fn all(&self) -> AuditSummary {
        let scan = self.scan_sources();
        let mut outcomes = vec![
            self.build_environment(),
            self.build_tags_from(&scan),
            self.forbidden_patterns_from(&scan),
        ];

        let mut skipped = CheckOutcome::new(CHECK_RELEASE_BINARIES);
        for binary in self.layout.release_binaries(&self.config) {
            if binary.is_file() {
                outcomes.extend(self.binary(&binary));
            } else {
                skipped.info(format!(
                    "Binary not found (skipping): {}",
                    self.layout.relative_display(&binary)
                ));
            }
        }
        if !skipped.findings.is_empty() {
            outcomes.push(skipped);
        }

        AuditSummary::from_outcomes(outcomes)
    }

    /// Full validation of the production build directory.
    pub fn production_binaries(&self) -> CheckOutcome {
        let rules = &self.config.binaries;
        let mut outcome = CheckOutcome::new(CHECK_PRODUCTION_BINARIES);
        let build_dir = self.layout.production_dir(&self.config);

        if !build_dir.is_dir() {
            outcome.error(format!(
                "Production build directory not found: {}. Run the release build first.",
                self.layout.relative_display(&build_dir)
            ));
            return outcome;
        }

        for name in &rules.production_binaries {
            let path = build_dir.join(name);
            outcome.info(format!("Validating {name}"));

            if !path.is_file() {
                outcome.error(format!("Binary not found: {}", path.display()));
                continue;
            }

            match std::fs::metadata(&path) {
                Ok(meta) => outcome.info(format!(
                    "Binary size: {:.1}MB ({} bytes)",
                    meta.len() as f64 / (1024.0 * 1024.0),
                    meta.len()
                )),
                Err(err) => outcome.warn(format!("Could not stat {}: {err}", path.display())),
            }
            match binary_fingerprint(&path) {
                Ok(hash) => outcome.info(format!("SHA-256: {hash}")),
                Err(err) => outcome.warn(format!("{err:#}")),
            }

            outcome.absorb(self.binary_permissions(&path));
            outcome.absorb(self.binary_security(&path));

            if rules.setuid_binaries.iter().any(|b| b == name) {
                let verdict = audit_permissions(&path, rules.expected_mode);
                if verdict.has_setuid() {
                    outcome.pass(format!("{name} binary has setuid bit set"));
                } else {
                    outcome.warn(format!(
                        "{name} binary does not have setuid bit (this is expected in CI)"
                    ));
                }
            }
        }

        if outcome.passed {
            outcome.pass("All production binaries passed validation");
        } else {
            outcome.error("Some production binaries failed validation");
        }
        outcome
    }

    /// Environment, module tidiness, build tags, forbidden patterns, then the
    /// production binaries when a production build is present.
    pub fn release(&self) -> AuditSummary {
        let scan = self.scan_sources();
        let mut outcomes = vec![
            self.build_environment(),
            self.module_tidiness(),
            self.build_tags_from(&scan),
            self.forbidden_patterns_from(&scan),
        ];

        let build_dir = self.layout.production_dir(&self.config);
        let any_present = self
            .config
            .binaries
            .production_binaries
            .iter()
            .any(|name| build_dir.join(name).exists());
        if build_dir.exists() && any_present {
            outcomes.push(self.production_binaries());
        } else {
            let mut skipped = CheckOutcome::new(CHECK_PRODUCTION_BINARIES);
            skipped.info("No production binaries found - skipping binary validation");
            outcomes.push(skipped);
        }

        AuditSummary::from_outcomes(outcomes)
    }
}
