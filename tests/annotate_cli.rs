mod common;

use common::{run_cli, write_config, SAMPLE_SOURCE};
use std::fs;
use std::path::PathBuf;

fn sample_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("sample.rs");
    fs::write(&path, SAMPLE_SOURCE).unwrap();
    path
}

// =================================================================
// annotate: listing output
// =================================================================

#[test]
fn full_percentage_lists_every_eligible_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let path_str = path.to_str().unwrap();

    let (code, stdout, stderr) = run_cli(&["annotate", path_str, "--percentage", "100"], "");
    assert_eq!(code, 0, "stderr: {stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "two eligible lines in the fixture");
    // Listings are 1-based; columns are 0-based character offsets.
    assert!(
        lines[0].starts_with(&format!("{path_str}:3:4: ")),
        "got: {}",
        lines[0]
    );
    assert!(
        lines[1].starts_with(&format!("{path_str}:5:0: ")),
        "got: {}",
        lines[1]
    );
}

#[test]
fn comment_and_short_lines_are_never_listed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.rs");
    fs::write(
        &path,
        "// only comments in this file\n# and hash markers\nok;\n\n* block interior\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(
        &["annotate", path.to_str().unwrap(), "--percentage", "100"],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.is_empty(), "expected no listing, got: {stdout}");
}

#[test]
fn stdin_is_annotated_when_no_files_are_given() {
    let (code, stdout, stderr) =
        run_cli(&["annotate", "--percentage", "100"], SAMPLE_SOURCE);
    assert_eq!(code, 0, "stderr: {stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("-:3:4: "), "got: {}", lines[0]);
}

#[test]
fn listings_are_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let args = ["annotate", path.to_str().unwrap(), "--percentage", "37"];

    let (code_a, first, _) = run_cli(&args, "");
    let (code_b, second, _) = run_cli(&args, "");
    assert_eq!(code_a, 0);
    assert_eq!(code_b, 0);
    assert_eq!(first, second, "same input and gate, same listing");
}

// =================================================================
// annotate: JSON output
// =================================================================

#[test]
fn json_output_carries_the_annotation_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let path_str = path.to_str().unwrap();

    let (code, stdout, stderr) = run_cli(
        &["annotate", path_str, "--percentage", "100", "--json"],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v[0]["path"], path_str);
    let annotations = v[0]["annotations"].as_array().unwrap();
    assert_eq!(annotations.len(), 2);
    // Records keep 0-based lines, unlike the listing.
    assert_eq!(annotations[0]["line"], 2);
    assert_eq!(annotations[0]["startColumn"], 4);
    assert_eq!(annotations[0]["endColumn"], 29);
    assert!(annotations[0]["message"].is_string());
    assert_eq!(annotations[1]["line"], 4);
    assert_eq!(annotations[1]["startColumn"], 0);
}

// =================================================================
// annotate: templates
// =================================================================

#[test]
fn template_flag_overrides_the_listing_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);

    let (code, stdout, stderr) = run_cli(
        &[
            "annotate",
            path.to_str().unwrap(),
            "--percentage",
            "100",
            "--template",
            "{{ line }}|{{ message }}",
        ],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("3|"), "got: {}", lines[0]);
    assert!(lines[1].starts_with("5|"), "got: {}", lines[1]);
}

#[test]
fn listing_template_preference_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let path_str = path.to_str().unwrap();
    let config = write_config(
        dir.path(),
        "percentage = 100\nlisting_template = \"{{ path }} L{{ line }}\"\n",
    );

    let (code, stdout, stderr) = run_cli(
        &["--config", config.to_str().unwrap(), "annotate", path_str],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], format!("{path_str} L3"));
    assert_eq!(lines[1], format!("{path_str} L5"));
}

#[test]
fn broken_template_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);

    let (code, _, stderr) = run_cli(
        &[
            "annotate",
            path.to_str().unwrap(),
            "--percentage",
            "100",
            "--template",
            "{{ unclosed",
        ],
        "",
    );
    assert_eq!(code, 2);
    assert!(
        stderr.contains("parsing listing template"),
        "got: {stderr}"
    );
}

// =================================================================
// Configuration and validation
// =================================================================

#[test]
fn percentage_comes_from_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let config = write_config(dir.path(), "percentage = 100\n");

    let (code, stdout, stderr) = run_cli(
        &[
            "--config",
            config.to_str().unwrap(),
            "annotate",
            path.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn custom_messages_replace_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let config = write_config(
        dir.path(),
        "percentage = 100\nmessages = [\"you sure about this?\"]\n",
    );

    let (code, stdout, _) = run_cli(
        &[
            "--config",
            config.to_str().unwrap(),
            "annotate",
            path.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(code, 0);
    for line in stdout.lines() {
        assert!(
            line.ends_with("you sure about this?"),
            "single-message catalog, got: {line}"
        );
    }
}

#[test]
fn out_of_range_percentage_flag_is_a_usage_error() {
    let (code, _, stderr) = run_cli(&["annotate", "--percentage", "0"], "");
    assert_eq!(code, 2);
    assert!(stderr.contains("invalid value"), "got: {stderr}");

    let (code, _, stderr) = run_cli(&["annotate", "--percentage", "101"], "");
    assert_eq!(code, 2);
    assert!(stderr.contains("invalid value"), "got: {stderr}");
}

#[test]
fn out_of_range_config_percentage_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let config = write_config(dir.path(), "percentage = 0\n");

    let (code, _, stderr) = run_cli(
        &[
            "--config",
            config.to_str().unwrap(),
            "annotate",
            path.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(code, 2);
    assert!(
        stderr.contains("percentage must be between 1 and 100"),
        "got: {stderr}"
    );
}

#[test]
fn empty_messages_list_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_file(&dir);
    let config = write_config(dir.path(), "messages = []\n");

    let (code, _, stderr) = run_cli(
        &[
            "--config",
            config.to_str().unwrap(),
            "annotate",
            path.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("messages list"), "got: {stderr}");
}

#[test]
fn unreadable_file_is_reported() {
    let (code, _, stderr) = run_cli(
        &[
            "annotate",
            "/nonexistent/definitely_not_here.rs",
            "--percentage",
            "100",
        ],
        "",
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("reading"), "got: {stderr}");
}

// =================================================================
// explain
// =================================================================

#[test]
fn explain_walks_through_an_eligible_line() {
    let (code, stdout, stderr) = run_cli(
        &["explain", "const x = 1;", "--percentage", "100"],
        "",
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(
        stdout.contains("eligible: code starts at column 0"),
        "got: {stdout}"
    );
    assert!(stdout.contains("digest:"), "got: {stdout}");
    assert!(stdout.contains("gate:"), "got: {stdout}");
    // Percentage 100 always gates in.
    assert!(stdout.contains("message:"), "got: {stdout}");
    assert!(!stdout.contains("gate stays closed"), "got: {stdout}");
}

#[test]
fn explain_names_the_rejection_reason() {
    let (code, stdout, _) = run_cli(&["explain", "// a comment line for the demo"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("ineligible: comment line"), "got: {stdout}");

    let (code, stdout, _) = run_cli(&["explain", "ok;"], "");
    assert_eq!(code, 0);
    assert!(
        stdout.contains("ineligible: shorter than 10 characters"),
        "got: {stdout}"
    );

    let (code, stdout, _) = run_cli(&["explain", "   "], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("ineligible: blank line"), "got: {stdout}");
}
