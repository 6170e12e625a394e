//! Aggregate run counts.
use crate::classify::{FileVerdict, Verdict};
use serde::Serialize;

/// Counts assembled once at the end of a run, read-only afterwards; feeds
/// the console summary, `summary.json`, and the process exit status.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub commands_run: usize,
    pub commands_failed: usize,
    pub files_produced: usize,
    pub files_expected: usize,
    pub unchanged: usize,
    pub changed: usize,
    pub extra: usize,
    pub missing: usize,
}

impl RunSummary {
    pub fn new(
        verdicts: &[FileVerdict],
        commands_run: usize,
        commands_failed: usize,
        files_produced: usize,
        files_expected: usize,
    ) -> Self {
        let mut summary = Self {
            commands_run,
            commands_failed,
            files_produced,
            files_expected,
            ..Self::default()
        };
        for file in verdicts {
            match file.verdict {
                Verdict::Unchanged => summary.unchanged += 1,
                Verdict::Changed => summary.changed += 1,
                Verdict::Extra => summary.extra += 1,
                Verdict::Missing => summary.missing += 1,
            }
        }
        summary
    }

    /// Files whose verdict differs from the baseline in any way.
    pub fn differing(&self) -> usize {
        self.changed + self.extra + self.missing
    }

    /// True when nothing differs and every command exited zero.
    pub fn is_clean(&self) -> bool {
        self.differing() == 0 && self.commands_failed == 0
    }

    /// Final one-line console verdict.
    pub fn verdict_line(&self) -> String {
        if self.differing() == 0 {
            "No differences found".to_string()
        } else {
            format!("{} file(s) differ", self.differing())
        }
    }
}
