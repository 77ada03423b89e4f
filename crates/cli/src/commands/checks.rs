use anyhow::Result;
use release_audit_core::environment::{CommandRunner, SystemRunner};
use release_audit_core::report::{AuditSummary, CheckOutcome, Severity, EXIT_SUCCESS};
use release_audit_core::services::audit::{Auditor, CHECK_BINARY_SECURITY};

use crate::app::{Cli, Command, GlobalOptions};
use crate::commands::{
    load_context, print_outcome, print_status, print_summary, print_summary_json,
};

/// Section titles for the release sequence, in execution order.
const RELEASE_STEPS: [&str; 5] =
    ["Build Environment", "Module Tidiness", "Build Tags", "Code Patterns", "Production Binaries"];

fn auditor<'a>(opts: &GlobalOptions, runner: &'a dyn CommandRunner) -> Result<Auditor<'a>> {
    let (layout, config) = load_context(&opts.root, opts.config.as_deref())?;
    Ok(Auditor::new(layout, config, runner))
}

/// Render the outcomes of a single check family and return its exit status.
fn finish(outcomes: Vec<CheckOutcome>, opts: &GlobalOptions) -> Result<i32> {
    let summary = AuditSummary::from_outcomes(outcomes);
    if opts.json {
        print_summary_json(&summary)?;
    } else {
        summary.outcomes.iter().for_each(print_outcome);
    }
    Ok(summary.exit_code())
}

/// Dispatch the parsed command line using the system command runner.
pub fn run(cli: &Cli) -> Result<i32> {
    run_with(cli, &SystemRunner)
}

/// Dispatch the parsed command line with an explicit command runner.
pub fn run_with(cli: &Cli, runner: &dyn CommandRunner) -> Result<i32> {
    let opts = &cli.global;
    match cli.command.clone().unwrap_or(Command::All) {
        Command::All => all_command(opts, runner),
        Command::BuildEnvironment => build_environment_command(opts, runner),
        Command::BuildTags => build_tags_command(opts, runner),
        Command::ForbiddenPatterns => forbidden_patterns_command(opts, runner),
        Command::Binary { path } => binary_command(opts, runner, path.as_deref()),
        Command::Release => release_command(opts, runner),
        Command::PrintConfig => print_config_command(opts),
    }
}

/// Run every check and fold the results.
pub fn all_command(opts: &GlobalOptions, runner: &dyn CommandRunner) -> Result<i32> {
    let auditor = auditor(opts, runner)?;
    if !opts.json {
        print_status(
            Severity::Info,
            &format!("Starting additional security checks for {}", auditor.config().display_name()),
        );
    }

    let summary = auditor.all();
    if opts.json {
        print_summary_json(&summary)?;
    } else {
        print_summary(
            &summary,
            "All additional security checks passed",
            "Some security checks failed",
        );
    }
    Ok(summary.exit_code())
}

pub fn build_environment_command(opts: &GlobalOptions, runner: &dyn CommandRunner) -> Result<i32> {
    let auditor = auditor(opts, runner)?;
    finish(vec![auditor.build_environment()], opts)
}

pub fn build_tags_command(opts: &GlobalOptions, runner: &dyn CommandRunner) -> Result<i32> {
    let auditor = auditor(opts, runner)?;
    finish(vec![auditor.build_tags()], opts)
}

pub fn forbidden_patterns_command(opts: &GlobalOptions, runner: &dyn CommandRunner) -> Result<i32> {
    let auditor = auditor(opts, runner)?;
    finish(vec![auditor.forbidden_patterns()], opts)
}

/// Scan one binary. The path is optional at the parser level so a missing
/// argument is reported as an audit error (exit 1) rather than a usage error.
pub fn binary_command(
    opts: &GlobalOptions,
    runner: &dyn CommandRunner,
    path: Option<&str>,
) -> Result<i32> {
    let Some(path) = path else {
        let mut outcome = CheckOutcome::new(CHECK_BINARY_SECURITY);
        outcome.error("Binary path required for binary check");
        return finish(vec![outcome], opts);
    };
    let auditor = auditor(opts, runner)?;
    let binary_path = auditor.layout().resolve(path);
    finish(auditor.binary(&binary_path), opts)
}

/// Comprehensive pre-release sequence with step headers.
pub fn release_command(opts: &GlobalOptions, runner: &dyn CommandRunner) -> Result<i32> {
    let auditor = auditor(opts, runner)?;
    let summary = auditor.release();

    if opts.json {
        print_summary_json(&summary)?;
        return Ok(summary.exit_code());
    }

    println!("=== Build Security Check ===");
    for (idx, outcome) in summary.outcomes.iter().enumerate() {
        let title = RELEASE_STEPS.get(idx).copied().unwrap_or(outcome.name.as_str());
        println!("\n--- Step {}: {} ---", idx + 1, title);
        print_outcome(outcome);
    }
    println!("\n=== Build Security Check Summary ===");
    if summary.passed {
        print_status(Severity::Pass, "All build security checks passed");
    } else {
        print_status(Severity::Error, "Some build security checks failed");
        for name in summary.failed_checks() {
            println!("  - {name}");
        }
    }
    Ok(summary.exit_code())
}

/// Print the effective configuration (after file lookup and defaults).
pub fn print_config_command(opts: &GlobalOptions) -> Result<i32> {
    let (layout, config) = load_context(&opts.root, opts.config.as_deref())?;
    log::debug!("effective config for {}", layout.root.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(EXIT_SUCCESS)
}
