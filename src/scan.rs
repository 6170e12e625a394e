//! File-set scanning.
//!
//! Two discovery modes feed the classifier: plain directory listings
//! (baseline side) and the marker-file protocol (produced side), where any
//! regular file stamped strictly after the zero-byte marker counts as
//! produced by this run.
use crate::error::DiffoutError;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;

/// Basenames of regular files directly under `dir`, non-recursive.
///
/// A missing directory is logged and treated as the empty set; a first run
/// has no baseline yet and that must not abort comparison.
pub fn list_basenames(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    if !dir.is_dir() {
        warn!("directory missing, treating as empty: {}", dir.display());
        return Ok(names);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Regular files in the marker's directory with mtime strictly greater than
/// the marker's own, sorted by path. The marker itself and subdirectories
/// are skipped. A missing marker is fatal: without the cutoff timestamp the
/// produced set is undefined, and silently returning nothing would report a
/// clean run that never happened.
pub fn modified_since(marker: &Path) -> Result<Vec<PathBuf>> {
    if !marker.is_file() {
        return Err(DiffoutError::MarkerMissing(marker.to_path_buf()).into());
    }
    let cutoff = mtime(marker)?;
    let dir = marker.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));

    let mut produced = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || path.file_name() == marker.file_name() {
            continue;
        }
        if mtime(&path)? > cutoff {
            produced.push(path);
        }
    }
    produced.sort();
    Ok(produced)
}

/// Basenames present in `produced` but not in `baseline`.
pub fn extra(produced: &BTreeSet<String>, baseline: &BTreeSet<String>) -> BTreeSet<String> {
    produced.difference(baseline).cloned().collect()
}

/// Basenames present in `baseline` but not in `produced`.
pub fn missing(produced: &BTreeSet<String>, baseline: &BTreeSet<String>) -> BTreeSet<String> {
    baseline.difference(produced).cloned().collect()
}

fn mtime(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("read mtime of {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let names = list_basenames(&dir.path().join("nope")).expect("list");
        assert!(names.is_empty());
    }

    #[test]
    fn listing_skips_subdirectories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        let names = list_basenames(dir.path()).expect("list");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn missing_marker_fails_loudly() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = modified_since(&dir.path().join("STARTTIME")).expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<DiffoutError>(),
            Some(DiffoutError::MarkerMissing(_))
        ));
    }

    #[test]
    fn files_older_than_marker_are_not_produced() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("old.txt"), "x").expect("write");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let marker = dir.path().join("STARTTIME");
        fs::write(&marker, b"").expect("write marker");
        let produced = modified_since(&marker).expect("scan");
        assert!(produced.is_empty());
    }

    #[test]
    fn files_newer_than_marker_are_produced_and_marker_excluded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let marker = dir.path().join("STARTTIME");
        fs::write(&marker, b"").expect("write marker");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        fs::write(dir.path().join("new.txt"), "x").expect("write");
        let produced = modified_since(&marker).expect("scan");
        let names: Vec<_> = produced
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["new.txt"]);
    }

    #[test]
    fn set_differences_are_by_basename() {
        let produced: BTreeSet<String> = ["a.txt", "b.txt"].iter().map(|s| s.to_string()).collect();
        let baseline: BTreeSet<String> = ["a.txt", "c.txt"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            extra(&produced, &baseline).into_iter().collect::<Vec<_>>(),
            vec!["b.txt"]
        );
        assert_eq!(
            missing(&produced, &baseline).into_iter().collect::<Vec<_>>(),
            vec!["c.txt"]
        );
    }
}
