use release_audit_core::config::AuditConfig;
use release_audit_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn default_config_targets_go_runner_project() {
    let config = AuditConfig::default();
    assert_eq!(config.display_name(), "go-safe-cmd-runner");
    assert_eq!(config.toolchain.program, "go");
    assert_eq!(config.binaries.min_string_length, 4);
    assert_eq!(config.binaries.expected_mode, 0o755);
    assert_eq!(config.binaries.release_binaries.len(), 3);
}
