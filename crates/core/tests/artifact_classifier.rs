use release_audit_core::analysis::{classify, SignatureSet};
use release_audit_core::model::{BinaryString, Verdict};
use release_audit_core::strings::extract_from_bytes;

fn strings(values: &[&str]) -> Vec<BinaryString> {
    values.iter().enumerate().map(|(i, v)| BinaryString::new(i as u64, *v)).collect()
}

#[test]
fn clean_strings_pass() {
    let result = classify(&strings(&["production code", "normal data"]), &SignatureSet::default());
    assert_eq!(result.verdict, Verdict::Pass);
    assert!(result.hard_fail.is_empty());
    assert!(!result.soft_fail_matched);
    assert_eq!(result.strings_scanned, 2);
}

#[test]
fn hard_fail_pattern_fails_and_echoes_string() {
    let result = classify(
        &strings(&["production code", "NewManagerForTest", "normal data"]),
        &SignatureSet::default(),
    );
    assert_eq!(result.verdict, Verdict::Fail);
    assert!(!result.soft_fail_matched);
    assert_eq!(result.hard_fail.len(), 1);
    assert_eq!(result.hard_fail[0].pattern, "NewManagerForTest");
    assert_eq!(result.hard_fail[0].examples, vec!["NewManagerForTest".to_string()]);
}

#[test]
fn hard_fail_is_never_suppressed() {
    let result = classify(
        &strings(&["/go/pkg/mod/toolchain@v1/src/pkg/foo_test.go"]),
        &SignatureSet::default(),
    );
    assert_eq!(result.verdict, Verdict::Fail);
    assert_eq!(result.hard_fail[0].pattern, "_test.go");
}

#[test]
fn suppression_is_evaluated_per_string() {
    let result = classify(
        &strings(&[
            "/go/pkg/mod/toolchain@v1/src/runtime/test.go",
            "/home/user/proj/helper_testing.go",
        ]),
        &SignatureSet::default(),
    );
    assert_eq!(result.verdict, Verdict::Fail);
    assert!(result.hard_fail.is_empty());
    assert!(result.soft_fail_matched);
    assert_eq!(result.soft_fail_examples, vec!["/home/user/proj/helper_testing.go".to_string()]);
}

#[test]
fn suppressed_toolchain_paths_alone_pass() {
    let data: &[u8] = b"\x00\x01runtime.CallersFrames\x00\
/home/issei/go/pkg/mod/golang.org/toolchain@v0.0.1-go1.24.6.linux-arm64/src/runtime/synctest.go\x00\
synctest\x00writeString\x00WriteString\x00production code\x02normal data\xff";
    let result = classify(&extract_from_bytes(data, 4), &SignatureSet::default());
    assert_eq!(result.verdict, Verdict::Pass);
}

#[test]
fn user_test_file_outside_toolchain_fails() {
    let result = classify(
        &strings(&["debug.Stack", "TestMain", "/home/user/project/test.go", "production code"]),
        &SignatureSet::default(),
    );
    assert_eq!(result.verdict, Verdict::Fail);
    assert!(result.hard_fail.is_empty());
    assert!(result.soft_fail_matched);
}

#[test]
fn both_scans_report_independently() {
    let result = classify(
        &strings(&["*testing.T", "/srv/app/cmd/helper_testing.go"]),
        &SignatureSet::default(),
    );
    assert_eq!(result.hard_fail[0].pattern, "testing.T");
    assert!(result.soft_fail_matched);
}

#[test]
fn custom_signatures_replace_defaults() {
    let signatures = SignatureSet {
        hard_fail: vec!["MockClock".into()],
        soft_fail: vec!["fixtures/".into()],
        suppressions: vec!["/third_party/".into()],
    };
    let fail = classify(&strings(&["NewManagerForTest", "MockClock"]), &signatures);
    assert_eq!(fail.hard_fail[0].pattern, "MockClock");

    let suppressed = classify(&strings(&["/third_party/fixtures/a.go"]), &signatures);
    assert_eq!(suppressed.verdict, Verdict::Pass);

    let user = classify(&strings(&["/src/fixtures/a.go"]), &signatures);
    assert_eq!(user.verdict, Verdict::Fail);
}
