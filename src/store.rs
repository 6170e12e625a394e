//! Baseline persistence (save mode).
//!
//! The one place that mutates persistent state: the current produced files
//! replace the baseline wholesale. Clearing first guarantees stale
//! expectations cannot survive a save.
use crate::error::DiffoutError;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Clear the baseline directory, then copy every produced file into it.
/// Failure to clear or recreate is fatal; a partially applied save would
/// leave a baseline that matches neither the old nor the new output.
pub fn save(produced: &[PathBuf], baseline_dir: &Path) -> Result<()> {
    if baseline_dir.exists() {
        fs::remove_dir_all(baseline_dir).map_err(|source| DiffoutError::BaselineClear {
            path: baseline_dir.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(baseline_dir).map_err(|source| DiffoutError::BaselineClear {
        path: baseline_dir.to_path_buf(),
        source,
    })?;
    for file in produced {
        let name = file
            .file_name()
            .ok_or_else(|| anyhow!("produced path has no file name: {}", file.display()))?;
        let dest = baseline_dir.join(name);
        fs::copy(file, &dest)
            .with_context(|| format!("copy {} to {}", file.display(), dest.display()))?;
    }
    info!(
        "saved {} file(s) as new baseline in {}",
        produced.len(),
        baseline_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn save_copies_produced_files_into_fresh_baseline() {
        let root = tempfile::tempdir().expect("create temp dir");
        let a = root.path().join("a.txt");
        let b = root.path().join("b.txt");
        fs::write(&a, "alpha\n").expect("write a");
        fs::write(&b, "beta\n").expect("write b");
        let baseline = root.path().join("expected");

        save(&[a, b], &baseline).expect("save");

        assert_eq!(
            fs::read_to_string(baseline.join("a.txt")).expect("read a"),
            "alpha\n"
        );
        assert_eq!(
            fs::read_to_string(baseline.join("b.txt")).expect("read b"),
            "beta\n"
        );
    }

    #[test]
    fn save_removes_stale_baseline_files() {
        let root = tempfile::tempdir().expect("create temp dir");
        let baseline = root.path().join("expected");
        fs::create_dir_all(&baseline).expect("create baseline");
        fs::write(baseline.join("stale.txt"), "old").expect("write stale");
        let a = root.path().join("a.txt");
        fs::write(&a, "new").expect("write a");

        save(&[a], &baseline).expect("save");

        let names: BTreeSet<String> = fs::read_dir(&baseline)
            .expect("list baseline")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[test]
    fn save_of_nothing_leaves_an_empty_baseline() {
        let root = tempfile::tempdir().expect("create temp dir");
        let baseline = root.path().join("expected");
        fs::create_dir_all(&baseline).expect("create baseline");
        fs::write(baseline.join("old.txt"), "x").expect("write old");

        save(&[], &baseline).expect("save");

        assert!(baseline.is_dir());
        assert_eq!(fs::read_dir(&baseline).expect("list").count(), 0);
    }
}
