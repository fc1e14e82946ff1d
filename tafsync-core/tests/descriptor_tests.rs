//! Patcher integration tests: idempotence, write gating, and document fidelity.

use std::fs;
use std::path::PathBuf;

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;
use tafsync_core::{patch, AudioId, DescriptorError, PatchOutcome, TafHeader};

const DESCRIPTOR: &str = "\
article: tt-10000001
data:
- series: Die Maus
  episodes: Geschichten über Äpfel
  release: 1700000000
  ids:
  - audio-id: 1600000000
    hash: 0123456789abcdef
    size: 555
    tracks: 3
    confidence: 2
";

fn header() -> TafHeader {
    TafHeader {
        valid: true,
        audio_id: Some(AudioId::from("123")),
        sha1_hash: Some("abc".into()),
        size: Some(10),
        track_seconds: vec![1.0, 2.0],
    }
}

fn fixture(contents: &str) -> (assert_fs::TempDir, PathBuf) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("10000001.yaml");
    file.write_str(contents).expect("write fixture");
    let path = file.path().to_path_buf();
    (dir, path)
}

fn ids(path: &PathBuf) -> Vec<serde_yaml::Value> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(path).expect("read")).expect("yaml");
    doc["data"][0]["ids"].as_sequence().expect("ids").clone()
}

// ---------------------------------------------------------------------------
// 1. Insertion
// ---------------------------------------------------------------------------

#[test]
fn new_record_lands_at_list_head() {
    let (_dir, path) = fixture(DESCRIPTOR);

    let outcome = patch(&path, Some(&header()), false).expect("patch");
    assert_eq!(outcome, PatchOutcome::Patched { path: path.clone() });

    let ids = ids(&path);
    assert_eq!(ids.len(), 2);
    let expected: serde_yaml::Value = serde_yaml::from_str(
        "{audio-id: '123', hash: abc, size: 10, tracks: 2, confidence: 0}",
    )
    .expect("expected yaml");
    assert_eq!(ids[0], expected);
    assert_eq!(ids[1]["audio-id"], serde_yaml::Value::from(1_600_000_000u64));
}

#[test]
fn patch_twice_inserts_once() {
    let (_dir, path) = fixture(DESCRIPTOR);

    let first = patch(&path, Some(&header()), false).expect("first");
    let after_first = fs::read_to_string(&path).expect("read");
    let second = patch(&path, Some(&header()), false).expect("second");

    assert!(first.is_change());
    assert_eq!(second, PatchOutcome::AlreadyPresent { path: path.clone() });
    assert_eq!(fs::read_to_string(&path).expect("read"), after_first);
    assert_eq!(ids(&path).len(), 2);
}

#[test]
fn existing_record_means_no_write() {
    let (dir, path) = fixture(DESCRIPTOR);
    let mut h = header();
    h.audio_id = Some(AudioId::Number(1_600_000_000));
    h.sha1_hash = Some("0123456789abcdef".into());

    let outcome = patch(&path, Some(&h), false).expect("patch");
    assert_eq!(outcome, PatchOutcome::AlreadyPresent { path: path.clone() });
    dir.child("10000001.yaml").assert(DESCRIPTOR);
}

#[test]
fn only_first_eligible_entry_is_patched() {
    let (_dir, path) = fixture(
        "data:\n- series: a\n  ids: []\n- series: b\n  ids: []\n",
    );
    patch(&path, Some(&header()), false).expect("patch");

    let doc: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&path).expect("read")).expect("yaml");
    assert_eq!(doc["data"][0]["ids"].as_sequence().expect("ids").len(), 1);
    assert_eq!(doc["data"][1]["ids"].as_sequence().expect("ids").len(), 0);
}

#[test]
fn dry_run_reports_without_writing() {
    let (dir, path) = fixture(DESCRIPTOR);
    let outcome = patch(&path, Some(&header()), true).expect("patch");
    assert_eq!(outcome, PatchOutcome::WouldPatch { path });
    dir.child("10000001.yaml").assert(DESCRIPTOR);
}

// ---------------------------------------------------------------------------
// 2. Document fidelity
// ---------------------------------------------------------------------------

#[test]
fn key_order_and_unicode_survive_rewrite() {
    let (dir, path) = fixture(DESCRIPTOR);
    patch(&path, Some(&header()), false).expect("patch");

    let written = fs::read_to_string(&path).expect("read");
    let article = written.find("article:").expect("article key");
    let data = written.find("data:").expect("data key");
    let series = written.find("series:").expect("series key");
    let release = written.find("release:").expect("release key");
    assert!(article < data && data < series && series < release);

    dir.child("10000001.yaml")
        .assert(predicate::str::contains("Geschichten über Äpfel"));
    assert!(!dir.child("10000001.yaml.tmp").path().exists(), "temp file left behind");
}

// ---------------------------------------------------------------------------
// 3. Gating
// ---------------------------------------------------------------------------

#[rstest]
#[case::absent(None)]
#[case::invalid(Some(TafHeader { valid: false, ..header() }))]
#[case::no_audio_id(Some(TafHeader { audio_id: None, ..header() }))]
#[case::no_hash(Some(TafHeader { sha1_hash: None, ..header() }))]
fn unusable_header_does_not_touch_file(#[case] h: Option<TafHeader>) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    // The file does not exist: touching it would surface as an I/O error.
    let path = dir.path().join("missing.yaml");
    let outcome = patch(&path, h.as_ref(), false).expect("patch");
    assert_eq!(outcome, PatchOutcome::InvalidHeader { path });
}

#[test]
fn document_without_ids_is_left_alone() {
    let contents = "data:\n- series: a\n";
    let (dir, path) = fixture(contents);
    let outcome = patch(&path, Some(&header()), false).expect("patch");
    assert_eq!(outcome, PatchOutcome::NoEligibleEntry { path });
    dir.child("10000001.yaml").assert(contents);
}

// ---------------------------------------------------------------------------
// 4. Errors
// ---------------------------------------------------------------------------

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let (_dir, path) = fixture(": : corrupt : yaml : !!!\n  - broken: [unclosed");
    let err = patch(&path, Some(&header()), false).unwrap_err();
    assert!(matches!(err, DescriptorError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("10000001.yaml"));
}

#[test]
fn list_document_is_rejected() {
    let (_dir, path) = fixture("- this is a list, not a mapping\n");
    let err = patch(&path, Some(&header()), false).unwrap_err();
    assert!(matches!(err, DescriptorError::NotAMapping { .. }), "got: {err}");
}
