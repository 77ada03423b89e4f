use clap::Parser;
use release_audit::app::Cli;
use release_audit::commands::{print_status, run};
use release_audit_core::report::{Severity, EXIT_FAILURE, EXIT_INTERRUPTED};

fn main() {
    ctrlc::set_handler(|| {
        print_status(Severity::Error, "Interrupted by user");
        std::process::exit(EXIT_INTERRUPTED);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Warnings on stderr by default; --verbose enables debug; RUST_LOG overrides.
    let level = if cli.global.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            print_status(Severity::Error, &format!("Unexpected error: {err:#}"));
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
