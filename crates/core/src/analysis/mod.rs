//! Artifact classification for extracted binary strings.
//!
//! Decides whether a release binary carries test code:
//! - Hard-fail signatures (test-only function names, test file suffixes) fail
//!   the binary outright; the first signature in priority order with any hit
//!   is reported and later signatures are not examined.
//! - Soft-fail signatures (user test file path fragments) fail the binary only
//!   when they appear in a string that no suppression rule exempts. Toolchain
//!   and module-cache paths routinely contain `test.go` and are suppressed per
//!   string.

use serde::{Deserialize, Serialize};

use crate::model::{BinaryString, PatternCategory, SignaturePattern, Verdict};

/// Maximum number of example strings kept per matched signature.
pub const MAX_EXAMPLES: usize = 5;

/// Signature configuration for the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureSet {
    /// Hard-fail patterns in priority order.
    pub hard_fail: Vec<String>,
    /// User test path fragments.
    pub soft_fail: Vec<String>,
    /// Substrings marking a string as toolchain-internal.
    pub suppressions: Vec<String>,
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self {
            hard_fail: vec!["NewManagerForTest".into(), "testing.T".into(), "_test.go".into()],
            soft_fail: vec!["test.go".into(), "testing.go".into()],
            suppressions: vec!["toolchain@".into(), "/go/pkg/mod/".into()],
        }
    }
}

impl SignatureSet {
    /// All signatures as typed patterns, hard-fail first.
    pub fn patterns(&self) -> Vec<SignaturePattern> {
        self.hard_fail
            .iter()
            .map(SignaturePattern::hard_fail)
            .chain(self.soft_fail.iter().map(SignaturePattern::soft_fail))
            .collect()
    }

    /// Returns true when `candidate` contains any suppression substring.
    pub fn is_suppressed(&self, candidate: &str) -> bool {
        self.suppressions.iter().any(|s| candidate.contains(s.as_str()))
    }
}

/// A signature together with the strings that matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: String,
    /// Up to `MAX_EXAMPLES` matching strings, in file order.
    pub examples: Vec<String>,
}

/// Classification outcome for one binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Matched hard-fail signatures. At most one entry: the first signature
    /// in priority order that matched.
    pub hard_fail: Vec<PatternMatch>,
    pub soft_fail_matched: bool,
    /// Unsuppressed strings that matched a soft-fail signature.
    pub soft_fail_examples: Vec<String>,
    pub verdict: Verdict,
    pub strings_scanned: usize,
}

impl ScanResult {
    pub fn is_clean(&self) -> bool {
        self.verdict.is_pass()
    }
}

fn first_hard_fail(
    strings: &[BinaryString],
    patterns: &[SignaturePattern],
) -> Option<PatternMatch> {
    patterns.iter().filter(|p| p.category == PatternCategory::HardFail).find_map(|signature| {
        let examples: Vec<String> = strings
            .iter()
            .filter(|s| signature.matches(s.as_str()))
            .take(MAX_EXAMPLES)
            .map(|s| s.value.clone())
            .collect();
        if examples.is_empty() {
            None
        } else {
            Some(PatternMatch { pattern: signature.pattern.clone(), examples })
        }
    })
}

fn user_test_references(
    strings: &[BinaryString],
    patterns: &[SignaturePattern],
    signatures: &SignatureSet,
) -> Vec<String> {
    let soft: Vec<&SignaturePattern> =
        patterns.iter().filter(|p| p.category == PatternCategory::SoftFail).collect();
    strings
        .iter()
        .filter(|s| !signatures.is_suppressed(s.as_str()))
        .filter(|s| soft.iter().any(|p| p.matches(s.as_str())))
        .take(MAX_EXAMPLES)
        .map(|s| s.value.clone())
        .collect()
}

/// Classify a string sequence against `signatures`.
///
/// Both scans always run so the result describes everything that was found,
/// even though a hard-fail hit alone already decides the verdict.
pub fn classify(strings: &[BinaryString], signatures: &SignatureSet) -> ScanResult {
    let patterns = signatures.patterns();
    let hard_fail: Vec<PatternMatch> = first_hard_fail(strings, &patterns).into_iter().collect();
    let soft_fail_examples = user_test_references(strings, &patterns, signatures);
    let soft_fail_matched = !soft_fail_examples.is_empty();

    let verdict = if !hard_fail.is_empty() || soft_fail_matched {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    ScanResult {
        hard_fail,
        soft_fail_matched,
        soft_fail_examples,
        verdict,
        strings_scanned: strings.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<BinaryString> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| BinaryString::new(i as u64 * 100, v.to_string()))
            .collect()
    }

    #[test]
    fn examples_are_capped_and_ordered() {
        let input: Vec<String> = (0..8).map(|i| format!("pkg_{i}_test.go")).collect();
        let refs: Vec<&str> = input.iter().map(String::as_str).collect();
        let result = classify(&strings(&refs), &SignatureSet::default());
        assert_eq!(result.hard_fail.len(), 1);
        assert_eq!(result.hard_fail[0].pattern, "_test.go");
        assert_eq!(result.hard_fail[0].examples.len(), MAX_EXAMPLES);
        assert_eq!(result.hard_fail[0].examples[0], "pkg_0_test.go");
    }

    #[test]
    fn first_priority_pattern_wins() {
        let result = classify(
            &strings(&["foo_test.go", "NewManagerForTest", "*testing.T"]),
            &SignatureSet::default(),
        );
        assert_eq!(result.hard_fail.len(), 1);
        assert_eq!(result.hard_fail[0].pattern, "NewManagerForTest");
    }

    #[test]
    fn patterns_list_hard_fail_first() {
        let patterns = SignatureSet::default().patterns();
        assert_eq!(patterns.len(), 5);
        assert_eq!(patterns[0].pattern, "NewManagerForTest");
        assert_eq!(patterns[4].pattern, "testing.go");
    }
}
