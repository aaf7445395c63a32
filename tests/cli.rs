//! Integration tests for the command-line interface.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn run(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("splitsheet-{}-{}", std::process::id(), name));
    fs::write(&path, content).expect("Failed to write temp file");
    path
}

const SCENARIO: &str = r#"
total = 18300000

[[party]]
name = "Alice"
share = 0.25

[party.expenses]
agency_fee = 100000

[[party]]
name = "Bob"
share = 0.25

[[party]]
name = "Carol"
share = "1/2"
"#;

#[test]
fn test_template_sheet_listing() {
    let (stdout, _, code) = run(&["--parties", "3", "--format", "sheet"]);
    assert_eq!(code, 0);
    assert!(stdout.contains(r#"B5: =IF(B4<>"", ROUND(B4*$B$1, 0), "")"#));
    assert!(stdout.contains(r#"D5: =IF(D4<>"", ROUND(SUM(B4:D4)*$B$1, 0)-SUM(B5:C5), "")"#));
    assert!(stdout.contains("E5: =SUM(B5:D5)"));
    assert!(stdout.contains("B3: \"Party A\""));
}

#[test]
fn test_compute_markdown() {
    let config = temp_file("scenario.toml", SCENARIO);
    let (stdout, _, code) = run(&["--format", "md", config.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("18,300,000"));
    assert!(stdout.contains("4,575,000"));
    assert!(stdout.contains("9,150,000"));
    // Alice's closing balance after her agency fee.
    assert!(stdout.contains("4,475,000"));
    assert!(stdout.contains("25.00%"));
    let _ = fs::remove_file(config);
}

#[test]
fn test_check_modes_agree() {
    let config = temp_file("check.toml", SCENARIO);
    let (stdout, _, code) = run(&["--check", config.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("agree"));
    let _ = fs::remove_file(config);
}

#[test]
fn test_invalid_share_sum_is_reported() {
    let config = temp_file(
        "bad-shares.toml",
        "total = 100\n\n[[party]]\nname = \"A\"\nshare = 0.5\n\n[[party]]\nname = \"B\"\nshare = 0.4\n",
    );
    let (_, stderr, code) = run(&[config.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must sum to 1"));
    let _ = fs::remove_file(config);
}

#[test]
fn test_csv_export_keeps_formulas_live() {
    let config = temp_file("csv-export.toml", SCENARIO);
    let out = std::env::temp_dir().join(format!("splitsheet-{}-out.csv", std::process::id()));
    let (stdout, _, code) = run(&[
        "--formulas",
        "-o",
        out.to_str().unwrap(),
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Exported to"));

    let content = fs::read_to_string(&out).expect("Failed to read exported CSV");
    assert!(content.contains("=IF("));
    assert!(content.contains("Total sale price"));
    let _ = fs::remove_file(config);
    let _ = fs::remove_file(out);
}

#[test]
fn test_unknown_option_fails() {
    let (_, stderr, code) = run(&["--frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"));
}
