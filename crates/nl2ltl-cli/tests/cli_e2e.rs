use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn nl2ltl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_nl2ltl"))
}

fn run(args: &[&str]) -> Output {
    Command::new(nl2ltl_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run nl2ltl")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "nl2ltl failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn templates_json_lists_catalog() {
    let json = stdout_json(&run(&["templates", "--json"]));
    let entries = json.as_array().expect("array");
    assert_eq!(entries.len(), 8);
    assert_eq!(entries[0]["name"], "Existence");
    assert_eq!(entries[0]["ltlf"], "F(a)");
    assert_eq!(entries[0]["ppltl"], "O(a)");
    assert_eq!(entries[7]["name"], "NotCoExistence");
}

#[test]
fn explain_tolerates_misspelled_kind() {
    let json = stdout_json(&run(&["explain", "precedense", "gmail", "slack", "--json"]));
    assert_eq!(json["display"], "Precedence(gmail, slack)");
    assert_eq!(json["ltlf"], "((!slack U gmail) | G(!slack))");
    assert_eq!(json["template"]["template"], "Precedence");
}

#[test]
fn explain_with_wrong_arity_fails() {
    let output = run(&["explain", "Response", "gmail"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expects exactly 2"));
}

#[test]
fn translate_classifier_payload_with_greedy_filter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("parse.json");
    fs::write(
        &input,
        serde_json::json!({
            "text": "whenever I get a Gmail, send a Slack.",
            "intent": {"name": "Response", "confidence": 0.8},
            "entities": [
                {"entity": "connector", "value": "Gmail", "confidence_entity": 0.99},
                {"entity": "connector", "value": "Slack", "confidence_entity": 0.97}
            ],
            "intent_ranking": [
                {"name": "Response", "confidence": 0.8},
                {"name": "Existence", "confidence": 0.5},
                {"name": "ChainResponse", "confidence": 0.3}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let input = input.to_string_lossy().to_string();
    let json = stdout_json(&run(&[
        "translate", "--input", &input, "--format", "classifier", "--json",
    ]));
    let candidates = json.as_array().expect("array");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["display"], "Response(gmail, slack)");
    assert_eq!(candidates[0]["confidence"], 0.8);

    let json = stdout_json(&run(&[
        "translate", "--input", &input, "--format", "classifier", "--filter", "basic", "--json",
    ]));
    assert_eq!(json.as_array().map(Vec::len), Some(3));
}

#[test]
fn translate_generator_completion_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("completion.txt");
    fs::write(&input, "PATTERN: Existence\nSYMBOLS: Drive\n").unwrap();

    let output = run(&[
        "translate",
        "--input",
        &input.to_string_lossy(),
        "--format",
        "generator",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Declare Template: Existence(drive)"));
    assert!(stdout.contains("English meaning:  Eventually, drive will happen."));
}

#[test]
fn parse_reports_logic_class() {
    let json = stdout_json(&run(&["parse", "G(a -> X b)", "--json"]));
    assert_eq!(json["formula"], "G(a -> X(b))");
    assert_eq!(json["logic"], "future");
    assert_eq!(json["past_dual"], "H(a -> Y(b))");
}
