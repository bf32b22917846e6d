//! Integration tests for batch reading and task listings.

use std::path::PathBuf;

use mpp_cfb::CompoundFileWriter;
use mpp_cli::inspect::{exit_code, read_files, task_rows, to_json};
use mpp_reader::ReaderOptions;
use tempfile::TempDir;

const TASK_STRIDE: usize = 96;

fn comp_obj(format: &str) -> Vec<u8> {
    let mut data = vec![0u8; 28];
    for s in ["Microsoft Project 9.0", format, "MSProject.Project"] {
        data.extend(((s.len() + 1) as u32).to_le_bytes());
        data.extend(s.as_bytes());
        data.push(0);
    }
    data
}

/// Task records as (uid, id, parent), no variable data.
fn task_block(tasks: &[(i32, i32, i32)]) -> Vec<u8> {
    let mut fixed = Vec::new();
    for &(uid, id, parent) in tasks {
        let mut record = vec![0u8; TASK_STRIDE];
        record[0..4].copy_from_slice(&uid.to_le_bytes());
        record[4..8].copy_from_slice(&id.to_le_bytes());
        record[8..12].copy_from_slice(&parent.to_le_bytes());
        record[64..68].copy_from_slice(&(-1i32).to_le_bytes());
        fixed.extend(record);
    }
    fixed
}

fn write_project(dir: &TempDir, name: &str, tasks: &[(i32, i32, i32)]) -> PathBuf {
    let data = CompoundFileWriter::new()
        .with_stream("\u{1}CompObj", comp_obj("MSProject.MPP9"))
        .unwrap()
        .with_stream("   19/TBkndTask/FixedData", task_block(tasks))
        .unwrap()
        .finish()
        .unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_reads_keep_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_project(&dir, "a.mpp", &[(1, 1, -1)]),
        dir.path().join("missing.mpp"),
        write_project(&dir, "b.mpp", &[(1, 1, -1), (2, 2, 1)]),
    ];
    let reads = read_files(&paths, &ReaderOptions::new());

    assert_eq!(reads.len(), 3);
    for (read, path) in reads.iter().zip(&paths) {
        assert_eq!(&read.path, path);
    }
    assert_eq!(reads[0].result.as_ref().unwrap().task_count(), 1);
    let error = reads[1].result.as_ref().unwrap_err();
    assert!(format!("{error:#}").contains("file not found"), "{error:#}");
    assert_eq!(reads[2].result.as_ref().unwrap().task_count(), 2);
    assert_eq!(exit_code(&reads, false), 1);
}

#[test]
fn test_strict_exit_code_only_for_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let clean = vec![write_project(&dir, "clean.mpp", &[(1, 1, -1), (2, 2, 1)])];
    let reads = read_files(&clean, &ReaderOptions::new());
    assert_eq!(exit_code(&reads, true), 0);

    let dangling = vec![write_project(&dir, "dangling.mpp", &[(1, 1, -1), (2, 2, 7)])];
    let reads = read_files(&dangling, &ReaderOptions::new());
    assert!(reads[0].has_diagnostics());
    assert_eq!(exit_code(&reads, false), 0);
    assert_eq!(exit_code(&reads, true), 2);
}

#[test]
fn test_task_rows_follow_the_outline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_project(
        &dir,
        "outline.mpp",
        &[(10, 1, -1), (30, 3, 10), (20, 2, 10), (40, 4, -1), (50, 5, 20)],
    );
    let reads = read_files(&[path], &ReaderOptions::new());
    let project = reads[0].result.as_ref().unwrap();

    let rows: Vec<(String, i32, usize)> = task_rows(project)
        .into_iter()
        .map(|row| (row.outline, row.uid, row.depth))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("1".to_string(), 10, 0),
            ("1.1".to_string(), 20, 1),
            ("1.1.1".to_string(), 50, 2),
            ("1.2".to_string(), 30, 1),
            ("2".to_string(), 40, 0),
        ]
    );
}

#[test]
fn test_json_reports_errors_inline() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_project(&dir, "ok.mpp", &[(1, 1, -1)]),
        dir.path().join("gone.mpp"),
    ];
    let reads = read_files(&paths, &ReaderOptions::new());
    let json: serde_json::Value = serde_json::from_str(&to_json(&reads).unwrap()).unwrap();

    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].get("project").is_some());
    assert!(entries[0].get("error").is_none());
    assert!(entries[1].get("project").is_none());
    assert!(entries[1]["error"].as_str().unwrap().contains("gone.mpp"));
}
