use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("barsheet").unwrap()
}

#[test]
fn validate_rejects_leading_zero_codes() {
    cmd()
        .args(["validate", "--text", "04018-28\nM4018-29"])
        .assert()
        .failure()
        .stderr(contains("04018-28"))
        .stderr(contains("line 1"));
}

#[test]
fn validate_accepts_zeros_after_delimiters() {
    cmd()
        .args(["validate", "--text", "M4018-028\nABC-001\nXYZ-0099"])
        .assert()
        .success()
        .stdout(contains("3 code(s) passed validation"));
}

#[test]
fn validate_reads_stdin_by_default() {
    cmd()
        .arg("validate")
        .write_stdin("A-1\n\nB-2\n")
        .assert()
        .success()
        .stdout(contains("2 code(s) passed validation"));
}

#[test]
fn validate_reports_every_offender_as_json() {
    cmd()
        .args(["validate", "--json", "--text", "042\nOK-1\n099"])
        .assert()
        .failure()
        .stdout(contains("\"line_number\": 1"))
        .stdout(contains("\"line_number\": 3"));
}

#[test]
fn generate_writes_a_docx_to_the_given_path() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("sheet.docx");
    cmd()
        .args(["generate", "--text", "M4018-028\nABC-001", "--format", "docx"])
        .arg("-o")
        .arg(&target)
        .assert()
        .success()
        .stdout(contains("2 barcode(s)"));
    let bytes = fs::read(&target).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn generate_uses_the_timestamped_name_inside_a_directory() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["generate", "--text", "A-1\nB-2\nC-3", "--format", "pdf"])
        .arg("-o")
        .arg(tmp.path())
        .assert()
        .success();
    let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().flatten().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().into_string().unwrap();
    assert!(name.starts_with("barcode_"), "{name}");
    assert!(name.ends_with(".pdf"), "{name}");
    let bytes = fs::read(entries[0].path()).unwrap();
    assert_eq!(&bytes[..4], b"%PDF");
}

#[test]
fn generate_blocks_on_validation_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("sheet.xlsx");
    cmd()
        .args(["generate", "--text", "042\nOK-1\n099", "--format", "xlsx"])
        .arg("-o")
        .arg(&target)
        .assert()
        .failure()
        .stderr(contains("042"))
        .stderr(contains("099"));
    assert!(!target.exists());
}

#[test]
fn generate_rejects_empty_input() {
    cmd()
        .args(["generate", "--text", "\n\n", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(contains("no codes"));
}

#[test]
fn barcode_command_writes_a_png() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("code.png");
    cmd()
        .args(["barcode", "M4018-29"])
        .arg("-o")
        .arg(&target)
        .assert()
        .success()
        .stdout(contains("Rendered"));
    let bytes = fs::read(&target).unwrap();
    assert_eq!(&bytes[..4], [0x89, b'P', b'N', b'G']);
}
