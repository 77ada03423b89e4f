use std::fs;

use release_audit::resolve_project_root;
use release_audit::commands::load_context;
use tempfile::tempdir;

/// Both cases change the process working directory, so they share one test.
#[test]
fn resolve_project_root_resolves_relative_roots() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = resolve_project_root(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    let result = resolve_project_root("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    let missing = resolve_project_root("not-there").expect("fallback");
    assert!(missing.is_absolute());
    assert!(missing.ends_with("not-there"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn load_context_reads_project_config() {
    let tmp = tempdir().expect("tempdir");
    let meta = tmp.path().join(".release-audit");
    fs::create_dir_all(&meta).expect("meta dir");
    fs::write(meta.join("config.json"), r#"{"project":"runner-fork"}"#).expect("config");

    let root = tmp.path().to_str().expect("utf-8 path");
    let (layout, config) = load_context(root, None).expect("load context");
    assert_eq!(layout.root, tmp.path().canonicalize().expect("canon"));
    assert_eq!(config.display_name(), "runner-fork");
}
