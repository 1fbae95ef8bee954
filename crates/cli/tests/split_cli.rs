use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BUNDLE: &str = "(function () {\n  function boot(app) {\n    app.start();\n  }\n  boot(window.app);\n})();\n(function () {\n  // TODO: wire events\n  const onClick = (ev) => {\n    ev.preventDefault();\n  };\n})();\n";

#[allow(deprecated)]
fn cli(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("context-split").expect("binary");
    cmd.current_dir(workdir).env_remove("RUST_LOG");
    cmd
}

fn run_json(workdir: &Path, args: &[&str]) -> Value {
    let output = cli(workdir).args(args).output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn setup() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("bundle.js"), BUNDLE).unwrap();
    fs::write(
        temp.path().join("jobs.py"),
        "class Job:\n    def run(self):\n        return 1\n\nJob().run()\n",
    )
    .unwrap();
    temp
}

#[test]
fn split_json_round_trips_the_file() {
    let temp = setup();
    let body = run_json(
        temp.path(),
        &["split", "bundle.js", "--max-lines", "6", "--json"],
    );

    let chunks = body["chunks"].as_array().expect("chunks");
    assert_eq!(chunks.len(), 2);
    let joined: String = chunks
        .iter()
        .map(|c| c["text"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(joined, BUNDLE);
    assert_eq!(chunks[0]["depth_out"], 0);
    assert_eq!(chunks[1]["start_line"], 7);
    assert_eq!(body["stats"]["total_chunks"], 2);
    assert_eq!(body["strategy"], "strict");
}

#[test]
fn split_accepts_legacy_strategy_letters_and_hints() {
    let temp = setup();
    let body = run_json(
        temp.path(),
        &[
            "split",
            "bundle.js",
            "--max-chars",
            "20",
            "--strategy",
            "A",
            "--hints",
            "--json",
        ],
    );
    assert_eq!(body["strategy"], "construct-priority");
    let chunks = body["chunks"].as_array().expect("chunks");
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0]["text"].as_str().unwrap().ends_with("})();\n"));
    assert_eq!(chunks[0]["hints"]["defines"][0], "boot");
}

#[test]
fn split_rejects_zero_limits() {
    let temp = setup();
    cli(temp.path())
        .args(["split", "bundle.js", "--max-chars", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_chars must be > 0"));
}

#[test]
fn split_reports_missing_files() {
    let temp = setup();
    cli(temp.path())
        .args(["split", "missing.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read missing.js"));
}

#[test]
fn split_reads_config_file_and_flags_override_it() {
    let temp = setup();
    fs::write(
        temp.path().join("splitter.toml"),
        "max_lines = 1\nstrategy = \"hybrid\"\n",
    )
    .unwrap();

    let body = run_json(
        temp.path(),
        &["--config", "splitter.toml", "split", "bundle.js", "--json"],
    );
    // Hybrid only looks ahead 30% of the tentative offset, so the first
    // terminator is reached from line 5 and the last from line 9.
    assert_eq!(body["strategy"], "hybrid");
    let ends: Vec<u64> = body["chunks"]
        .as_array()
        .expect("chunks")
        .iter()
        .filter_map(|c| c["end_offset"].as_u64())
        .collect();
    assert_eq!(ends, vec![15, 38, 55, 59, 85, 100, 123, 187]);

    let body = run_json(
        temp.path(),
        &[
            "--config",
            "splitter.toml",
            "split",
            "bundle.js",
            "--max-lines",
            "100",
            "--json",
        ],
    );
    assert_eq!(body["chunks"].as_array().map(Vec::len), Some(1));
}

#[test]
fn split_text_output_lists_parts() {
    let temp = setup();
    cli(temp.path())
        .args(["--quiet", "split", "bundle.js", "--max-lines", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/2] lines 1-6"))
        .stdout(predicate::str::contains("[2/2] lines 7-12"))
        .stdout(predicate::str::contains("Chunks: 2"));
}

#[test]
fn extract_prints_construct_verbatim() {
    let temp = setup();
    cli(temp.path())
        .args(["--quiet", "extract", "bundle.js", "--name", "onClick"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  const onClick = (ev) => {\n    ev.preventDefault();\n  }",
        ));
}

#[test]
fn extract_detects_indentation_dialect_from_extension() {
    let temp = setup();
    let body = run_json(temp.path(), &["extract", "jobs.py", "--name", "Job", "--json"]);
    assert_eq!(body["found"], true);
    assert_eq!(body["kind"], "class");
    assert_eq!(body["end_line"], 4);
}

#[test]
fn extract_miss_is_reported_not_failed() {
    let temp = setup();
    let body = run_json(temp.path(), &["extract", "bundle.js", "--name", "nope", "--json"]);
    assert_eq!(body["found"], false);
    assert_eq!(body["reason"], "not_found");
}

#[test]
fn grep_counts_all_hits() {
    let temp = setup();
    let body = run_json(
        temp.path(),
        &[
            "grep",
            "bundle.js",
            "--needle",
            "})();",
            "--context-lines",
            "0",
            "--max-matches",
            "1",
            "--json",
        ],
    );
    assert_eq!(body["hit_count"], 2);
    assert_eq!(body["matches"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["matches"][0]["hit_line_number"], 6);
    assert_eq!(body["matches"][0]["text"], "})();\n");
}

#[test]
fn grep_reads_stdin() {
    let temp = setup();
    cli(temp.path())
        .args(["--quiet", "grep", "-", "--needle", "TODO", "-C", "1"])
        .write_stdin(BUNDLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("--- 'TODO' hit line 8 (lines 7-9)"))
        .stdout(predicate::str::contains("1 hits, showing 1"));
}

#[test]
fn scope_indexes_dom_and_storage_strings() {
    let temp = setup();
    fs::write(
        temp.path().join("page.js"),
        "const root = document.getElementById(\"app\");\nconst rows = root.querySelectorAll('.row');\nlocalStorage.setItem(\"theme\", \"dark\");\nlocalStorage.getItem('theme');\nsessionStorage.removeItem(\"draft\");\n",
    )
    .unwrap();

    let body = run_json(temp.path(), &["scope", "page.js", "--json"]);
    assert_eq!(body["file"], "page.js");
    assert_eq!(body["dom_ids"]["items"], serde_json::json!(["app"]));
    assert_eq!(body["selectors"]["items"], serde_json::json!([".row"]));
    assert_eq!(body["local_storage_keys"]["items"], serde_json::json!(["theme"]));
    assert_eq!(body["session_storage_keys"]["items"], serde_json::json!(["draft"]));
    assert_eq!(body["top_identifiers"][0], serde_json::json!(["localStorage", 2]));

    cli(temp.path())
        .args(["--quiet", "scope", "-"])
        .write_stdin(BUNDLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("<stdin>: "))
        .stdout(predicate::str::contains("  - onClick"));
}
