//! End-to-end runs of the `rfq` binary against the office-supplies fixture.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/office_supplies")
        .join(name)
}

fn rfq() -> Command {
    let mut cmd = Command::cargo_bin("rfq").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn lists_rfqs_without_rfq_flag() {
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("RFQ-100\tongoing\tOffice refurbishment\t3 quoted, 1 pending"))
        .stdout(predicate::str::contains("RFQ-200\tongoing\tPrinter paper\t0 quoted, 1 pending"));
}

#[test]
fn compares_and_exports_the_selection() {
    let out = tempfile::tempdir().unwrap();
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-100", "--select", "Q-1,Q-2", "--select", "Q-3", "--render", "json", "html"])
        .arg("--out")
        .arg(out.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("*Q-2\tBureau Plus\tfull\t4776.00 EUR"))
        .stdout(predicate::str::contains(" Q-3\tNordic Office\tpartial\t3000.00 EUR"));

    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("comparison.json")).unwrap()).unwrap();
    assert_eq!(doc["best_offer"]["offer_id"], "Q-2");
    assert_eq!(doc["line_items"]["columns"][2], "Nordic Office");

    let html = fs::read_to_string(out.path().join("comparison.html")).unwrap();
    assert!(html.contains("Bureau Plus"));

    let offers: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("offers.json")).unwrap()).unwrap();
    assert_eq!(offers["offers"].as_array().unwrap().len(), 3);
    assert_eq!(offers["pending_vendors"][0], "Lumen Supply");
}

#[test]
fn seeded_runs_are_byte_identical() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    for dir in [&a, &b] {
        rfq()
            .arg("--dataset")
            .arg(fixture("dataset.json"))
            .arg("--params")
            .arg(fixture("params.json"))
            .args(["--rfq", "RFQ-100", "--quiet", "--out"])
            .arg(dir.path())
            .assert()
            .success();
    }
    assert_eq!(
        fs::read(a.path().join("offers.json")).unwrap(),
        fs::read(b.path().join("offers.json")).unwrap()
    );
}

#[test]
fn validate_only_prints_the_report() {
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-100", "--validate-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pass\": true"));
}

#[test]
fn reminders_go_to_pending_vendors() {
    let out = tempfile::tempdir().unwrap();
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-100", "--remind", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("reminder sent"))
        .stderr(predicate::str::contains("Lumen Supply"));
}

#[test]
fn unquoted_offer_is_a_selection_error() {
    let out = tempfile::tempdir().unwrap();
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-100", "--select", "Q-4", "--out"])
        .arg(out.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("offer Q-4 is not a quote in this pool"));
}

#[test]
fn rfq_without_quotes_cannot_be_compared() {
    let out = tempfile::tempdir().unwrap();
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-200", "--select", "Q-1", "--out"])
        .arg(out.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no vendor has submitted a quote"));
}

#[test]
fn fourth_offer_hits_the_selection_limit() {
    let dir = tempfile::tempdir().unwrap();
    let quote = |id: &str, vendor: &str| {
        format!(
            r#"{{"id":"{id}","rfq_id":"R1","vendor_name":"{vendor}","location":"","submitted_rfq":true,"amount":"10.00"}}"#
        )
    };
    let dataset = format!(
        r#"{{"rfqs":[{{"id":"R1","title":"Bolts","items":[{{"name":"Bolt","quantity":10,"unit":"pcs"}}],"status":"ongoing"}}],
            "submissions":[{},{},{},{}]}}"#,
        quote("S1", "A"),
        quote("S2", "B"),
        quote("S3", "C"),
        quote("S4", "D")
    );
    let path = dir.path().join("dataset.json");
    fs::write(&path, dataset).unwrap();

    rfq()
        .arg("--dataset")
        .arg(&path)
        .args(["--rfq", "R1", "--select", "S1,S2,S3,S4", "--out"])
        .arg(dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("selection limit reached"));
}

#[test]
fn unknown_rfq_and_bad_params_are_validation_errors() {
    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-999"])
        .assert()
        .code(2);

    rfq()
        .arg("--dataset")
        .arg(fixture("dataset.json"))
        .args(["--rfq", "RFQ-100", "--split", "seeded"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("split_seed"));
}

#[test]
fn remote_dataset_is_refused() {
    rfq()
        .args(["--dataset", "https://example.org/dataset.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}
