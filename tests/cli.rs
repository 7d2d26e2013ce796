//! Integration tests for the cellgrid binary

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run the binary with a private config so a user's config.toml can't leak in.
fn run_with_stdin(config: &str, args: &[&str], stdin: &str) -> (String, String, i32) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, config).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_cellgrid"))
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    // The binary may exit without reading stdin (e.g. `-c` with no script).
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

const SMALL: &str = "initial_rows = 2\ninitial_cols = 2\n";

fn run_command(args: &[&str]) -> (String, String, i32) {
    run_with_stdin(SMALL, args, "")
}

#[test]
fn test_command_on_empty_sheet() {
    let (stdout, _, code) = run_command(&["-c", "=SUM(A1:B2)"]);
    assert_eq!(stdout.trim(), "0");
    assert_eq!(code, 0);
}

#[test]
fn test_command_passes_plain_text_through() {
    let (stdout, _, code) = run_command(&["-c", "hello"]);
    assert_eq!(stdout.trim(), "hello");
    assert_eq!(code, 0);
}

#[test]
fn test_command_error_prints_sentinel_and_warns() {
    let (stdout, stderr, code) = run_command(&["-c", "=MAX(1A)"]);
    assert_eq!(stdout.trim(), "#ERROR");
    assert!(stderr.contains("WARN"));
    assert_eq!(code, 0);
}

#[test]
fn test_script_from_stdin_exports_csv() {
    let script = "A1: 1\nB1: 2\nA2: =SUM(A1:B1)\nB2: \"say \\\"hi\\\"\"\n";
    let (stdout, _, code) = run_with_stdin(SMALL, &[], script);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim_end(),
        "\"1\",\"2\"\n\"3\",\"say \"\"hi\"\"\""
    );
}

#[test]
fn test_script_file_with_command() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("sheet.txt");
    std::fs::write(&script, "A1: 4\nA2: 8\nA3: text\n").unwrap();

    let (stdout, _, code) = run_command(&[script.to_str().unwrap(), "-c", "=AVERAGE(A1:A3)"]);
    assert_eq!(stdout.trim(), "6.00");
    assert_eq!(code, 0);
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let (stdout, _, code) = run_with_stdin(SMALL, &["-o", out.to_str().unwrap()], "A1: x\n");
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "\"x\",\"\"\n\"\",\"\""
    );
}

#[test]
fn test_recalc_flag_refreshes_formulas() {
    let script = "A1: 1\nB1: =A1\nA1: 5\n";
    let (stdout, _, _) = run_with_stdin(SMALL, &["-c", "=B1"], script);
    // -c without a script name still reads nothing from stdin.
    assert_eq!(stdout.trim(), "");

    let (stdout, _, _) = run_with_stdin(SMALL, &["-", "-c", "=B1"], script);
    assert_eq!(stdout.trim(), "1");

    let (stdout, _, _) = run_with_stdin(SMALL, &["-", "--recalc", "-c", "=B1"], script);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_automatic_recalc_from_config() {
    let config = "initial_rows = 2\ninitial_cols = 2\nrecalc = \"automatic\"\n";
    let script = "A1: 1\nB1: =A1\nA1: 5\n";
    let (stdout, _, _) = run_with_stdin(config, &["-", "-c", "=B1"], script);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_bad_script_reports_line() {
    let (_, stderr, code) = run_with_stdin(SMALL, &[], "A1: 1\n9Z: 2\n");
    assert_eq!(code, 1);
    assert!(stderr.contains("line 2"));
}

#[test]
fn test_bad_config_fails() {
    let (_, stderr, code) = run_with_stdin("zoom = 3\n", &["-c", "1"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("config"));
}

#[test]
fn test_missing_script_fails() {
    let missing = Path::new("definitely/not/here.txt");
    let (_, stderr, code) = run_command(&[missing.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("reading edit script"));
}

#[test]
fn test_help_lists_functions() {
    let (stdout, _, code) = run_command(&["--help"]);
    assert_eq!(code, 0);
    for name in ["SUM", "AVERAGE", "COUNT", "MAX", "MIN"] {
        assert!(stdout.contains(name), "{name} missing from help");
    }
    assert!(stdout.contains("Count of non-blank cells in a range"));
}

#[test]
fn test_command_row_zero_reads_outside_grid() {
    let (stdout, _, code) = run_with_stdin(SMALL, &["-", "-c", "=SUM(A0:A2)"], "A1: 1\nA2: 2\n");
    assert_eq!(stdout.trim(), "3");
    assert_eq!(code, 0);
}
