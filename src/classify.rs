//! Snapshot classification.
//!
//! Assigns exactly one verdict to every basename in the union of the
//! produced and baseline sets, in ascending basename order so reports are
//! reproducible run to run.
use crate::decode;
use crate::scan;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Present in both sets with line-for-line identical content.
    Unchanged,
    /// Present in both sets, content differs.
    Changed,
    /// Present only in the produced set.
    Extra,
    /// Present only in the baseline set.
    Missing,
}

impl Verdict {
    /// True for files that exist on both sides and therefore get a diff.
    pub fn is_matched(self) -> bool {
        matches!(self, Verdict::Unchanged | Verdict::Changed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Unchanged => "unchanged",
            Verdict::Changed => "changed",
            Verdict::Extra => "extra",
            Verdict::Missing => "missing",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileVerdict {
    pub name: String,
    pub verdict: Verdict,
}

/// Classify every basename in `produced ∪ baseline`.
///
/// The produced set is passed in rather than derived here because the
/// application discovers it through the marker protocol, not a plain
/// directory listing. Files present on both sides are decoded and compared
/// line for line; a decode failure aborts the run rather than skipping the
/// file, since a miscompared file is worse than a crashed run.
pub fn classify(
    produced_dir: &Path,
    baseline_dir: &Path,
    produced: &BTreeSet<String>,
    baseline: &BTreeSet<String>,
) -> Result<Vec<FileVerdict>> {
    let extra = scan::extra(produced, baseline);
    let missing = scan::missing(produced, baseline);

    let mut verdicts = Vec::new();
    for name in produced.union(baseline) {
        let verdict = if extra.contains(name) {
            Verdict::Extra
        } else if missing.contains(name) {
            Verdict::Missing
        } else {
            let actual = decode::load(&produced_dir.join(name))?;
            let expected = decode::load(&baseline_dir.join(name))?;
            if actual.lines == expected.lines {
                Verdict::Unchanged
            } else {
                Verdict::Changed
            }
        };
        verdicts.push(FileVerdict {
            name: name.clone(),
            verdict,
        });
    }
    Ok(verdicts)
}
