//! Report assembly and run summary output.
//!
//! Builds the single-document HTML report: a color-coded index of every
//! verdict, one diff table per matched file, and a legend footer. Also
//! emits the console summary lines and a machine-readable `summary.json`.
use crate::classify::{FileVerdict, Verdict};
use crate::config::RunConfig;
use crate::decode;
use crate::diff::{escape_html, DiffRenderer};
use crate::summary::RunSummary;
use anyhow::{Context, Result};
use std::fs;
use tracing::{error, info};

const STYLE: &str = "\
    table.diff {font-family:Courier; border:medium;}\n\
    .diff_header {background-color:#e0e0e0}\n\
    td.diff_header {text-align:right}\n\
    .diff_next {background-color:#c0c0c0}\n\
    .diff_add {background-color:#aaffaa}\n\
    .diff_chg {background-color:#ffff77}\n\
    .diff_sub {background-color:#ffaaaa}\n\
    .diff_skip {background-color:#f0f0f0; text-align:center; font-style:italic}\n\
    table.index {font-family:Courier; border-collapse:collapse;}\n\
    table.index td, table.index th {border:1px solid #c0c0c0; padding:2px 8px;}\n\
    .verdict_changed {background-color:#ffaaaa}\n\
    .verdict_unchanged {background-color:#aaffaa}\n\
    .verdict_extra {background-color:#aaaaff}\n\
    .verdict_missing {background-color:#aaffff}\n";

/// One report line: a classified file plus its rendered diff when matched.
#[derive(Debug)]
pub struct ReportEntry {
    pub file: FileVerdict,
    pub diff_html: Option<String>,
}

/// Render a diff table for each matched pair. Extra and missing files get
/// an index entry only; there is nothing on the other side to diff.
pub fn build_entries(
    config: &RunConfig,
    renderer: &DiffRenderer,
    verdicts: &[FileVerdict],
) -> Result<Vec<ReportEntry>> {
    verdicts
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let diff_html = if file.verdict.is_matched() {
                let produced_path = config.output_dir.join(&file.name);
                let baseline_path = config.baseline_dir.join(&file.name);
                let actual = decode::load(&produced_path)?;
                let expected = decode::load(&baseline_path)?;
                Some(renderer.render(
                    &produced_path.display().to_string(),
                    &actual.lines,
                    &baseline_path.display().to_string(),
                    &expected.lines,
                    &anchor_for(index, &file.name),
                ))
            } else {
                None
            };
            Ok(ReportEntry {
                file: file.clone(),
                diff_html,
            })
        })
        .collect()
}

/// Deterministic per-file anchor: list position plus a sanitized basename.
fn anchor_for(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    format!("d{index}_{slug}")
}

/// Assemble the full report document.
pub fn assemble(entries: &[ReportEntry]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n<title>diffout results</title>\n");
    html.push_str("<style type=\"text/css\">\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<a id=\"top\"></a>\n<h1>diffout results</h1>\n");

    push_index(&mut html, entries);

    for (index, entry) in entries.iter().enumerate() {
        if let Some(diff_html) = &entry.diff_html {
            html.push_str(&format!(
                "<h2 id=\"h_{}\">{}</h2>\n",
                anchor_for(index, &entry.file.name),
                escape_html(&entry.file.name)
            ));
            html.push_str(diff_html);
            html.push_str("<br />\n");
        }
    }

    push_legend(&mut html);
    html.push_str("</body>\n</html>\n");
    html
}

fn push_index(html: &mut String, entries: &[ReportEntry]) {
    html.push_str("<table class=\"index\" summary=\"File verdicts\">\n");
    html.push_str("<tr><th>File</th><th>Verdict</th></tr>\n");
    for (index, entry) in entries.iter().enumerate() {
        let name = if entry.diff_html.is_some() {
            format!(
                "<a href=\"#{}\">{}</a>",
                anchor_for(index, &entry.file.name),
                escape_html(&entry.file.name)
            )
        } else {
            escape_html(&entry.file.name)
        };
        html.push_str(&format!(
            "<tr class=\"verdict_{verdict}\"><td>{name}</td><td>{verdict}</td></tr>\n",
            verdict = entry.file.verdict
        ));
    }
    html.push_str("</table>\n<br />\n");
}

fn push_legend(html: &mut String) {
    html.push_str(
        "<table class=\"diff\" summary=\"Legends\">\n\
         <tr> <th colspan=\"2\"> Legends </th> </tr>\n\
         <tr> <td> <table border=\"\" summary=\"Colors\">\n\
         <tr><th> Colors </th> </tr>\n\
         <tr><td class=\"diff_add\">&nbsp;Added&nbsp;</td></tr>\n\
         <tr><td class=\"diff_chg\">Changed</td> </tr>\n\
         <tr><td class=\"diff_sub\">Deleted</td> </tr>\n\
         </table></td>\n\
         <td> <table border=\"\" summary=\"Links\">\n\
         <tr><th colspan=\"2\"> Links </th> </tr>\n\
         <tr><td>(f)irst change</td> </tr>\n\
         <tr><td>(n)ext change</td> </tr>\n\
         <tr><td>(t)op</td> </tr>\n\
         </table>\n\
         </td> </tr>\n\
         </table>\n",
    );
}

/// Write the report document, overwriting last run's report.
pub fn write_report(config: &RunConfig, entries: &[ReportEntry]) -> Result<()> {
    fs::create_dir_all(&config.report_dir)
        .with_context(|| format!("create {}", config.report_dir.display()))?;
    let path = config.report_path();
    fs::write(&path, assemble(entries)).with_context(|| format!("write {}", path.display()))?;
    info!("wrote report to {}", path.display());
    Ok(())
}

/// Write the machine-readable summary next to the report.
pub fn write_summary(config: &RunConfig, summary: &RunSummary) -> Result<()> {
    fs::create_dir_all(&config.report_dir)
        .with_context(|| format!("create {}", config.report_dir.display()))?;
    let json = serde_json::to_string_pretty(summary).context("serialize summary")?;
    let path = config.summary_path();
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Per-file log lines plus the aggregate console summary.
pub fn log_summary(summary: &RunSummary, verdicts: &[FileVerdict]) {
    for file in verdicts {
        match file.verdict {
            Verdict::Unchanged => info!("         {}", file.name),
            Verdict::Changed => info!("[ DIFF ] {}", file.name),
            Verdict::Extra => error!("unexpected output file: {}", file.name),
            Verdict::Missing => error!("missing output file: {}", file.name),
        }
    }
    info!(
        "commands run: {} ({} failed)",
        summary.commands_run, summary.commands_failed
    );
    info!(
        "files produced: {}, files expected: {}",
        summary.files_produced, summary.files_expected
    );
    info!(
        "unchanged: {}, changed: {}, extra: {}, missing: {}",
        summary.unchanged, summary.changed, summary.extra, summary.missing
    );
    if summary.differing() == 0 {
        info!("{}", summary.verdict_line());
    } else {
        error!("{}", summary.verdict_line());
    }
}
