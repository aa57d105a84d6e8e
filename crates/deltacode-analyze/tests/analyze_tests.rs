use std::path::{Path, PathBuf};

use deltacode_analyze::{ConsistencyError, DeltaCode, DeltaConfig, DeltaStatus};
use deltacode_core::ScanSide;
use deltacode_scan::{JsonScanLoader, ScanLoader, ScanResult};
use serde_json::{Value, json};
use tempfile::TempDir;

/// (path, type, sha1, size)
type Entry = (String, &'static str, Option<String>, u64);

fn file(path: impl Into<String>, n: u32) -> Entry {
    (path.into(), "file", Some(format!("{n:040x}")), 100 + u64::from(n))
}

fn dir(path: impl Into<String>) -> Entry {
    (path.into(), "directory", None, 0)
}

/// Eight files shared by most scenarios.
fn base_files() -> Vec<Entry> {
    (1..=8)
        .map(|i| file(format!("project/src/file{i}.c"), i))
        .collect()
}

fn write_scan(temp: &TempDir, name: &str, entries: &[Entry]) -> PathBuf {
    let files: Vec<Value> = entries
        .iter()
        .map(|(path, kind, sha1, size)| {
            json!({
                "path": path,
                "type": kind,
                "sha1": sha1,
                "size": size,
                "licenses": [],
                "copyrights": [],
            })
        })
        .collect();
    let report = json!({
        "scancode_notice": "Generated with ScanCode",
        "scancode_version": "2.2.1",
        "scancode_options": {"--info": true},
        "files_count": files.len(),
        "files": files,
    });

    let path = temp.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();
    path
}

fn load(path: &Path) -> ScanResult {
    JsonScanLoader::new().load(Some(path))
}

fn compare(new: &[Entry], old: &[Entry], config: DeltaConfig) -> DeltaCode {
    let temp = TempDir::new().unwrap();
    let new_path = write_scan(&temp, "new.json", new);
    let old_path = write_scan(&temp, "old.json", old);
    DeltaCode::with_config(load(&new_path), load(&old_path), config).unwrap()
}

fn counts(result: &DeltaCode) -> (usize, usize, usize, usize) {
    let stats = result.get_stats().unwrap();
    (stats.added, stats.modified, stats.removed, stats.unchanged)
}

#[test]
fn test_identical_scan() {
    let temp = TempDir::new().unwrap();
    let path = write_scan(&temp, "identical.json", &base_files());

    let result = DeltaCode::new(load(&path), load(&path)).unwrap();

    assert_eq!(counts(&result), (0, 0, 0, 8));
}

#[test]
fn test_identical_scan_without_checksums() {
    let temp = TempDir::new().unwrap();
    let entries: Vec<Entry> = base_files()
        .into_iter()
        .map(|(path, kind, _, size)| (path, kind, None, size))
        .collect();
    let path = write_scan(&temp, "info-less.json", &entries);

    let result = DeltaCode::new(load(&path), load(&path)).unwrap();

    assert_eq!(counts(&result), (0, 0, 0, 8));
}

#[test]
fn test_file_added() {
    let mut new = base_files();
    new.push(file("project/src/extra.c", 99));

    let result = compare(&new, &base_files(), DeltaConfig::default());

    assert_eq!(counts(&result), (1, 0, 0, 8));
    let added: Vec<_> = result.deltas_with_status(DeltaStatus::Added).collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].new_file.as_ref().unwrap().path, "project/src/extra.c");
    assert!(added[0].old_file.is_none());
}

#[test]
fn test_file_removed() {
    let mut new = base_files();
    new.pop();

    let result = compare(&new, &base_files(), DeltaConfig::default());

    assert_eq!(counts(&result), (0, 0, 1, 7));
}

#[test]
fn test_file_renamed_is_added_and_removed_by_default() {
    let mut new = base_files();
    new[3].0 = "project/src/renamed.c".to_string();

    let result = compare(&new, &base_files(), DeltaConfig::default());

    assert_eq!(counts(&result), (1, 0, 1, 7));
    assert_eq!(result.get_stats().unwrap().moved, None);
}

#[test]
fn test_file_renamed_is_moved_with_detection() {
    let mut new = base_files();
    new[3].0 = "project/src/renamed.c".to_string();
    let config = DeltaConfig::builder().detect_moves(true).build().unwrap();

    let result = compare(&new, &base_files(), config);

    assert_eq!(counts(&result), (0, 0, 0, 7));
    assert_eq!(result.get_stats().unwrap().moved, Some(1));

    let moved: Vec<_> = result.deltas_with_status(DeltaStatus::Moved).collect();
    assert_eq!(moved[0].new_file.as_ref().unwrap().path, "project/src/renamed.c");
    assert_eq!(moved[0].old_file.as_ref().unwrap().path, "project/src/file4.c");
}

#[test]
fn test_file_modified() {
    let mut new = base_files();
    new[0].2 = Some("f".repeat(40));

    let result = compare(&new, &base_files(), DeltaConfig::default());

    assert_eq!(counts(&result), (0, 1, 0, 7));
}

#[test]
fn test_json_file_added() {
    let mut new = base_files();
    new.push(file("project/src/extra.c", 99));

    let result = compare(&new, &base_files(), DeltaConfig::default());
    let json_output = serde_json::to_string(&result.to_report(false)).unwrap();
    let loaded: Value = serde_json::from_str(&json_output).unwrap();

    assert_eq!(loaded["deltas_count"], 9);
    assert_eq!(loaded["deltacode_stats"]["added"], 1);
    assert_eq!(loaded["deltacode_stats"]["modified"], 0);
    assert_eq!(loaded["deltacode_stats"]["removed"], 0);
    assert_eq!(loaded["deltacode_stats"]["unchanged"], 8);
    assert!(loaded["deltacode_stats"].get("moved").is_none());
    assert!(loaded.get("deltas").is_none());
}

#[test]
fn test_json_file_modified() {
    let mut new = base_files();
    new[0].2 = Some("f".repeat(40));

    let result = compare(&new, &base_files(), DeltaConfig::default());
    let loaded: Value = serde_json::to_value(result.to_report(true)).unwrap();

    assert_eq!(loaded["deltas_count"], 8);
    assert_eq!(loaded["deltacode_stats"]["modified"], 1);
    assert_eq!(loaded["deltacode_stats"]["unchanged"], 7);

    let deltas = loaded["deltas"].as_array().unwrap();
    assert_eq!(deltas.len(), 8);
    assert_eq!(deltas[0]["status"], "modified");
    assert_eq!(deltas[0]["new_path"], "project/src/file1.c");
}

#[test]
fn test_alignment_with_full_root_old_scan() {
    let mut new = vec![dir("zlib-1.2.11")];
    new.extend((0..292).map(|i| file(format!("zlib-1.2.11/f{i}.c"), i)));
    let mut old = vec![dir("/home/user/zlib-1.2.11")];
    old.extend((0..39).map(|i| file(format!("/home/user/zlib-1.2.11/f{i}.c"), i)));

    let temp = TempDir::new().unwrap();
    let new_path = write_scan(&temp, "align-new.json", &new);
    let old_path = write_scan(&temp, "align-old.json", &old);
    let result = DeltaCode::new(load(&new_path), load(&old_path)).unwrap();

    assert_eq!(result.new.files_count, Some(293));
    assert_eq!(result.old.files_count, Some(40));

    for (record, entry) in result.new.iter().zip(&new) {
        assert_eq!(record.original_path, entry.0.as_str());
        assert_eq!(record.original_path, record.path);
    }
    for (record, entry) in result.old.iter().zip(&old) {
        assert_eq!(record.original_path, entry.0.as_str());
        assert!(record.original_path.ends_with(record.path.as_str()));
    }

    let alignment = result.alignment().unwrap();
    assert_eq!((alignment.new_strip, alignment.old_strip), (0, 2));
    assert_eq!(counts(&result), (253, 0, 0, 40));
}

#[test]
fn test_alignment_can_be_disabled() {
    let new = vec![file("zlib/a.c", 1), file("zlib/b.c", 2)];
    let old = vec![file("/home/zlib/a.c", 1), file("/home/zlib/b.c", 2)];
    let config = DeltaConfig::builder().align_paths(false).build().unwrap();

    let result = compare(&new, &old, config);

    assert_eq!(counts(&result), (2, 0, 2, 0));
}

#[test]
fn test_directories_excluded_from_counters() {
    let mut new = vec![dir("project"), dir("project/src")];
    new.extend(base_files());
    let old = new.clone();
    let config = DeltaConfig::builder()
        .count_directories(false)
        .build()
        .unwrap();

    let result = compare(&new, &old, config);

    assert_eq!(counts(&result), (0, 0, 0, 8));
    assert_eq!(result.to_report(false).deltas_count, Some(10));
}

#[test]
fn test_file_replacing_directory_still_counted() {
    let new = vec![file("project/src", 1)];
    let old = vec![dir("project/src")];
    let config = DeltaConfig::builder()
        .count_directories(false)
        .build()
        .unwrap();

    let result = compare(&new, &old, config);

    assert_eq!(counts(&result), (0, 1, 0, 0));
    assert_eq!(result.deltas.as_ref().unwrap()[0].status, DeltaStatus::Modified);
}

#[test]
fn test_directories_counted_by_default() {
    let mut new = vec![dir("project"), dir("project/src")];
    new.extend(base_files());
    let old = new.clone();

    let result = compare(&new, &old, DeltaConfig::default());

    assert_eq!(counts(&result), (0, 0, 0, 10));
}

#[test]
fn test_every_record_in_exactly_one_delta() {
    let mut new = base_files();
    new.remove(2);
    new[0].2 = Some("e".repeat(40));
    new.push(file("project/docs/readme.txt", 50));
    let old = base_files();

    let result = compare(&new, &old, DeltaConfig::default());
    let deltas = result.deltas.as_ref().unwrap();

    for record in result.new.iter() {
        let hits = deltas
            .iter()
            .filter(|d| d.new_file.as_ref() == Some(record))
            .count();
        assert_eq!(hits, 1, "{}", record.path);
    }
    for record in result.old.iter() {
        let hits = deltas
            .iter()
            .filter(|d| d.old_file.as_ref() == Some(record))
            .count();
        assert_eq!(hits, 1, "{}", record.path);
    }
    assert_eq!(counts(&result), (1, 1, 1, 6));
}

#[test]
fn test_runs_are_identical() {
    let mut new = base_files();
    new.reverse();
    new.push(file("project/src/extra.c", 99));
    let config = DeltaConfig::builder().detect_moves(true).build().unwrap();

    let first = compare(&new, &base_files(), config.clone());
    let second = compare(&new, &base_files(), config);

    assert_eq!(first.deltas, second.deltas);
    assert_eq!(
        serde_json::to_string(&first.to_report(true)).unwrap(),
        serde_json::to_string(&second.to_report(true)).unwrap()
    );
}

#[test]
fn test_delta_len_error() {
    let mut new = base_files();
    new.push(file("project/src/extra.c", 99));
    let mut result = compare(&new, &base_files(), DeltaConfig::default());

    // Should never happen in practice
    result.new.files_count = Some(42);

    let err = result.determine_delta().unwrap_err();
    assert!(matches!(
        err,
        ConsistencyError::CountMismatch {
            side: ScanSide::New,
            expected: 42,
            actual: 9,
        }
    ));
}

#[test]
fn test_invalid_paths() {
    let loader = JsonScanLoader::new();
    let new = loader.load(Some(Path::new("/some/invalid/path/1.json")));
    let old = loader.load(Some(Path::new("/some/invalid/path/2.json")));

    let result = DeltaCode::new(new, old).unwrap();

    assert_eq!(result.new.source_path(), Path::new("/some/invalid/path/1.json"));
    assert_eq!(result.new.files_count, None);
    assert!(result.new.files.is_none());
    assert_eq!(result.old.source_path(), Path::new("/some/invalid/path/2.json"));
    assert_eq!(result.old.files_count, None);
    assert!(result.old.files.is_none());
    assert!(result.deltas.is_none());
    assert!(result.get_stats().is_none());
}

#[test]
fn test_empty_paths() {
    let loader = JsonScanLoader::new();
    let result = DeltaCode::new(
        loader.load(Some(Path::new(""))),
        loader.load(Some(Path::new(""))),
    )
    .unwrap();

    assert_eq!(result.new.source_path(), Path::new(""));
    assert_eq!(result.new.files_count, None);
    assert!(result.new.files.is_none());
    assert_eq!(result.old.files_count, None);
    assert!(result.old.files.is_none());
    assert!(result.deltas.is_none());
}

#[test]
fn test_none_paths() {
    let loader = JsonScanLoader::new();
    let result = DeltaCode::new(loader.load(None), loader.load(None)).unwrap();

    assert_eq!(result.new.source_path(), Path::new(""));
    assert_eq!(result.old.source_path(), Path::new(""));
    assert!(result.deltas.is_none());

    let loaded = serde_json::to_value(result.to_report(false)).unwrap();
    assert!(loaded["deltas_count"].is_null());
    assert!(loaded["deltacode_stats"].is_null());
}

#[test]
fn test_empty_scans_are_zero_not_unavailable() {
    let result = compare(&[], &[], DeltaConfig::default());

    assert!(result.is_available());
    assert_eq!(counts(&result), (0, 0, 0, 0));
    assert_eq!(result.to_report(false).deltas_count, Some(0));
}
