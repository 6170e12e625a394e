//! Run configuration.
//!
//! Every path the tool reads or writes is derived once from the output
//! directory and passed by reference into each component, so two runs can
//! coexist in one process (tests rely on this) without shared globals.
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Zero-byte sentinel whose mtime is the cutoff for "produced by this run".
pub const MARKER_FILE_NAME: &str = "STARTTIME";
/// Baseline directory name under the output directory.
pub const BASELINE_DIR_NAME: &str = "expected";
/// Report directory name under the output directory.
pub const REPORT_DIR_NAME: &str = "report";
pub const REPORT_FILE_NAME: &str = "results.html";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Unchanged lines kept on each side of a change in a diff table.
pub const DIFF_CONTEXT_LINES: usize = 8;
/// Column at which diff cell text wraps onto a continuation row.
pub const DIFF_WRAP_COLUMN: usize = 80;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the commands under test write into; scanned for output.
    pub output_dir: PathBuf,
    pub baseline_dir: PathBuf,
    pub report_dir: PathBuf,
    pub marker_path: PathBuf,
    /// Wait after writing the marker so filesystems with coarse timestamp
    /// granularity cannot stamp a produced file at or before the marker.
    pub marker_settle: Duration,
    pub context_lines: usize,
    pub wrap_column: usize,
}

impl RunConfig {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            baseline_dir: output_dir.join(BASELINE_DIR_NAME),
            report_dir: output_dir.join(REPORT_DIR_NAME),
            marker_path: output_dir.join(MARKER_FILE_NAME),
            marker_settle: Duration::from_secs(1),
            context_lines: DIFF_CONTEXT_LINES,
            wrap_column: DIFF_WRAP_COLUMN,
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_dir.join(REPORT_FILE_NAME)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.report_dir.join(SUMMARY_FILE_NAME)
    }
}
