use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn get_jrep_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jrep"))
}

fn temp_file(test_name: &str, file_name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jrep_cli_{}_{}", std::process::id(), test_name));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let path = dir.join(file_name);
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

#[test]
fn test_version_flag() {
    let output = get_jrep_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("jrep"), "Version output should contain 'jrep'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Version output should contain version number"
    );
}

#[test]
fn test_report_over_two_files() {
    let a = temp_file("two_files", "a.json", r#"{"score": 10}"#);
    let b = temp_file("two_files", "b.json", r#"{"score": 20}"#);

    let output = get_jrep_binary()
        .arg(&a)
        .arg(&b)
        .arg("--paths")
        .arg("total=score")
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("a.json"));
    assert!(stdout.contains("b.json"));
    assert!(stdout.contains("total"));
    assert!(stdout.contains("10"));
    assert!(stdout.contains("20"));
    assert!(stdout.contains("30.00"), "Numeric column should be totaled");
}

#[test]
fn test_stdin_document() {
    let mut child = get_jrep_binary()
        .arg("--paths")
        .arg("score")
        .arg("--color")
        .arg("never")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn jrep");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(br#"{"score": 7}"#)
        .unwrap();
    let output = child.wait_with_output().expect("Failed to wait on jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("stdin"));
    assert!(stdout.contains("7"));
}

#[test]
fn test_array_document_rows_are_indexed() {
    let batch = temp_file(
        "array_doc",
        "batch.json",
        r#"[{"score": 1}, {"score": 2}]"#,
    );

    let output = get_jrep_binary()
        .arg(&batch)
        .arg("--paths")
        .arg("score")
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("batch.json [Item 1]"));
    assert!(stdout.contains("batch.json [Item 2]"));
}

#[test]
fn test_missing_paths_flag_fails() {
    let a = temp_file("no_paths", "a.json", r#"{"score": 1}"#);

    let output = get_jrep_binary()
        .arg(&a)
        .output()
        .expect("Failed to execute jrep");

    assert!(!output.status.success(), "Missing --paths should fail");
}

#[test]
fn test_unparseable_document_does_not_abort_batch() {
    let good = temp_file("bad_json", "good.json", r#"{"score": 3}"#);
    let bad = temp_file("bad_json", "bad.json", "{not json");

    let output = get_jrep_binary()
        .arg(&good)
        .arg(&bad)
        .arg("--paths")
        .arg("score")
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success(), "Batch should survive one bad file");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("good.json"));
    assert!(stdout.contains("3"));
    assert!(stdout.contains("bad.json"));
    assert!(stdout.contains("N/A"));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("JSON parse error"));
}

#[test]
fn test_output_file() {
    let a = temp_file("out_file", "a.json", r#"{"score": 4}"#);
    let out = a.parent().unwrap().join("report.txt");

    let output = get_jrep_binary()
        .arg(&a)
        .arg("--paths")
        .arg("score")
        .arg("--out")
        .arg(&out)
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let written = std::fs::read_to_string(&out).expect("Output file should exist");
    assert!(written.contains("a.json"));
    assert!(written.contains("4"));
}

#[test]
fn test_paths_file() {
    let a = temp_file("paths_file", "a.json", r#"{"score": 2, "name": "x"}"#);
    let paths = temp_file("paths_file", "columns.txt", "total=score\nname\n");

    let output = get_jrep_binary()
        .arg(&a)
        .arg("--paths-file")
        .arg(&paths)
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("total"));
    assert!(stdout.contains("name"));
    assert!(stdout.contains("2"));
    assert!(stdout.contains("x"));
}

#[test]
fn test_compact_table() {
    let a = temp_file("compact", "a.json", r#"{"score": 1}"#);

    let output = get_jrep_binary()
        .arg(&a)
        .arg("--paths")
        .arg("score")
        .arg("--compact")
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains('│'), "Compact output should have no borders");
    assert!(stdout.contains("a.json"));
}

#[test]
fn test_completions_subcommand() {
    let output = get_jrep_binary()
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute jrep");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("jrep"));
}
