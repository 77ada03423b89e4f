use std::fs;

use release_audit_core::model::is_printable;
use release_audit_core::strings::{extract_from_bytes, extract_strings, ExtractError};
use tempfile::tempdir;

fn values(data: &[u8], min: usize) -> Vec<String> {
    extract_from_bytes(data, min).into_iter().map(|s| s.value).collect()
}

/// Straightforward reference: split on non-printable bytes, keep long segments.
fn reference_scan(data: &[u8], min: usize) -> Vec<String> {
    data.split(|b| !is_printable(*b))
        .filter(|seg| !seg.is_empty() && seg.len() >= min)
        .map(|seg| String::from_utf8(seg.to_vec()).unwrap())
        .collect()
}

/// Deterministic byte soup biased towards printable runs.
fn pseudo_random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let r = (state >> 33) as u8;
            if r % 5 == 0 {
                r % 32
            } else if r % 11 == 0 {
                0x80 | r
            } else {
                32 + (r % 95)
            }
        })
        .collect()
}

#[test]
fn matches_reference_scanner_for_many_inputs() {
    for seed in 0..50u64 {
        let data = pseudo_random_bytes(seed, 512 + seed as usize * 7);
        for min in [1usize, 2, 4, 10] {
            let got = values(&data, min);
            assert_eq!(got, reference_scan(&data, min), "seed {seed} min {min}");
            assert!(got.iter().all(|s| s.len() >= min));
            assert!(got.iter().all(|s| s.bytes().all(is_printable)));
        }
    }
}

#[test]
fn trailing_run_without_delimiter_is_emitted() {
    assert_eq!(values(b"\x00\x01hello", 4), vec!["hello"]);
}

#[test]
fn empty_and_non_printable_inputs_yield_nothing() {
    assert!(values(b"", 4).is_empty());
    assert!(values(&[0u8, 1, 2, 127, 200, 255, 31], 1).is_empty());
}

#[test]
fn fully_printable_input_is_one_string() {
    assert_eq!(values(b"production code", 4), vec!["production code"]);
    assert!(values(b"abc", 4).is_empty());
}

#[test]
fn offsets_follow_file_order_without_dedup() {
    let strings = extract_from_bytes(b"\x00same\x00same\xffother", 4);
    let offsets: Vec<u64> = strings.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![1, 6, 11]);
    assert_eq!(strings[0].value, strings[1].value);
}

#[test]
fn extracts_from_file_on_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bin");
    fs::write(&path, b"\x00\x01\x02hello\x00world\x03\x04test123\xff\xfe").unwrap();

    let strings: Vec<String> =
        extract_strings(&path, 4).unwrap().into_iter().map(|s| s.value).collect();
    assert_eq!(strings, vec!["hello", "world", "test123"]);
}

#[test]
fn respects_minimum_length_from_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bin");
    fs::write(&path, b"\x00ab\x00\x01hello\x00x\x02world123\xff").unwrap();

    let default_min: Vec<String> =
        extract_strings(&path, 4).unwrap().into_iter().map(|s| s.value).collect();
    assert_eq!(default_min, vec!["hello", "world123"]);

    let short: Vec<String> =
        extract_strings(&path, 2).unwrap().into_iter().map(|s| s.value).collect();
    assert!(short.contains(&"ab".to_string()));
    assert!(!short.contains(&"x".to_string()));
}

#[test]
fn large_file_runs_cross_chunk_boundaries() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("big.bin");
    let mut data = vec![0u8; 8190];
    data.extend_from_slice(b"NewManagerForTest");
    data.push(0);
    fs::write(&path, &data).unwrap();

    let strings = extract_strings(&path, 4).unwrap();
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[0].value, "NewManagerForTest");
    assert_eq!(strings[0].offset, 8190);
}

#[test]
fn missing_file_is_an_open_error() {
    let temp = tempdir().unwrap();
    let err = extract_strings(temp.path().join("nope"), 4).unwrap_err();
    assert!(matches!(err, ExtractError::Open { .. }), "unexpected error: {err}");
    assert!(err.to_string().contains("Could not open binary file"));
}
