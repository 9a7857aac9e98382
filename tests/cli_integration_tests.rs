//! CLI integration tests - the binary run as a subprocess.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

fn write_source_report(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Сводный отчет по НДФЛ").unwrap();
    sheet.write_string(1, 4, "Налоговая база").unwrap();
    sheet.write_string(1, 5, "Исчислено всего").unwrap();
    sheet.write_string(2, 0, "Б1").unwrap();
    sheet.write_string(2, 1, "Иванов").unwrap();
    sheet.write_number(2, 4, 1_000_000.0).unwrap();
    sheet.write_number(2, 5, 130_005.0).unwrap();
    workbook.save(path).unwrap();
}

#[test]
fn test_correct_rejects_wrong_extension() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.csv");
    std::fs::write(&input, "a;b;c").unwrap();

    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("correct")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only .xlsx files are accepted"));
}

#[test]
fn test_correct_writes_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("upload.xlsx");
    write_source_report(&input);
    let media = temp_dir.path().join("media");

    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("correct")
        .arg(&input)
        .arg("--output-dir")
        .arg(&media)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    assert!(media.join("report.xlsx").exists());
}

#[test]
fn test_correct_unique_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("upload.xlsx");
    write_source_report(&input);
    let media = temp_dir.path().join("media");

    for _ in 0..2 {
        Command::cargo_bin("ndfl-report")
            .unwrap()
            .arg("correct")
            .arg(&input)
            .arg("--output-dir")
            .arg(&media)
            .arg("--unique")
            .assert()
            .success();
    }

    let reports = std::fs::read_dir(&media).unwrap().count();
    assert_eq!(reports, 2);
}

#[test]
fn test_correct_missing_file_fails() {
    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("correct")
        .arg("does-not-exist.xlsx")
        .assert()
        .failure();
}

#[test]
fn test_inspect_prints_flagged_rows() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("upload.xlsx");
    write_source_report(&input);

    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("inspect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Иванов"))
        .stdout(predicate::str::contains("rows deviate"));

    // inspect must not leave any report behind
    assert!(!Path::new("media/report.xlsx").exists());
}

#[test]
fn test_layout_dump() {
    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("layout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Лист1"))
        .stdout(predicate::str::contains("cbe4e5"));
}

#[test]
fn test_layout_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let layout_path = temp_dir.path().join("layout.yaml");

    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("layout")
        .arg("--output")
        .arg(&layout_path)
        .assert()
        .success();

    let input = temp_dir.path().join("upload.xlsx");
    write_source_report(&input);
    let media = temp_dir.path().join("media");

    Command::cargo_bin("ndfl-report")
        .unwrap()
        .arg("correct")
        .arg(&input)
        .arg("--output-dir")
        .arg(&media)
        .arg("--layout")
        .arg(&layout_path)
        .assert()
        .success();

    assert!(media.join("report.xlsx").exists());
}
