//! Command execution boundary.
//!
//! Thin I/O glue around the comparator: the marker protocol, glob
//! expansion, `%F` substitution, and sequential child processes. Commands
//! run strictly one at a time because they may share the output directory;
//! the write phase fully precedes the read phase.
//!
//! TODO: subprocess timeouts; a hung command currently hangs the run.
use crate::config::RunConfig;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct RunOutcome {
    pub commands_run: usize,
    pub commands_failed: usize,
}

/// Write the zero-byte marker, then wait out filesystem timestamp
/// granularity so every file a command writes sorts strictly after it.
pub fn write_marker(config: &RunConfig) -> Result<()> {
    fs::write(&config.marker_path, b"")
        .with_context(|| format!("write marker {}", config.marker_path.display()))?;
    std::thread::sleep(config.marker_settle);
    Ok(())
}

/// Expand input arguments as glob patterns, preserving argument order.
/// A pattern with no matches is logged, not fatal.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for pattern in patterns {
        let paths =
            glob::glob(pattern).with_context(|| format!("invalid input pattern {pattern}"))?;
        let mut matched = false;
        for path in paths {
            let path = path.with_context(|| format!("read glob match for {pattern}"))?;
            inputs.push(path);
            matched = true;
        }
        if !matched {
            warn!("no files matched input pattern {pattern}");
        }
    }
    Ok(inputs)
}

/// Substitute the input file into the command template.
pub fn substitute(template: &str, input: &Path) -> String {
    template.replace("%F", &input.display().to_string())
}

/// Run the command template once per input, sequentially, each awaited to
/// completion. Non-zero exits and spawn failures are counted but never
/// fatal; whatever the commands did produce still gets compared.
pub fn run_commands(
    config: &RunConfig,
    template: &str,
    inputs: &[PathBuf],
    capture: bool,
) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::default();
    for input in inputs {
        let command_line = substitute(template, input);
        info!("running: {command_line}");
        let argv = shell_words::split(&command_line)
            .with_context(|| format!("parse command line: {command_line}"))?;
        let Some((program, args)) = argv.split_first() else {
            bail!("empty command template");
        };
        let mut command = Command::new(program);
        command.args(args);
        outcome.commands_run += 1;
        let failed = if capture {
            run_captured(&mut command, config, input, &command_line)?
        } else {
            run_inherited(&mut command, &command_line)
        };
        if failed {
            outcome.commands_failed += 1;
        }
    }
    Ok(outcome)
}

fn run_inherited(command: &mut Command, command_line: &str) -> bool {
    match command.status() {
        Ok(status) if status.success() => false,
        Ok(status) => {
            error!("command failed ({}): {command_line}", exit_label(status.code()));
            true
        }
        Err(err) => {
            error!("failed to spawn command: {command_line}: {err}");
            true
        }
    }
}

/// Run with piped output and write stdout+stderr into the output directory
/// so the terminal output is compared like any other produced file.
fn run_captured(
    command: &mut Command,
    config: &RunConfig,
    input: &Path,
    command_line: &str,
) -> Result<bool> {
    match command.output() {
        Ok(output) => {
            let artifact = capture_path(config, input);
            let mut bytes = output.stdout;
            bytes.extend_from_slice(&output.stderr);
            fs::write(&artifact, bytes)
                .with_context(|| format!("write capture {}", artifact.display()))?;
            debug!("captured terminal output to {}", artifact.display());
            if output.status.success() {
                Ok(false)
            } else {
                error!(
                    "command failed ({}): {command_line}",
                    exit_label(output.status.code())
                );
                Ok(true)
            }
        }
        Err(err) => {
            error!("failed to spawn command: {command_line}: {err}");
            Ok(true)
        }
    }
}

fn capture_path(config: &RunConfig, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "command".to_string());
    config.output_dir.join(format!("{stem}.console.txt"))
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitution_replaces_every_placeholder() {
        let input = Path::new("tests/t1.in");
        assert_eq!(
            substitute("tool --in %F --log %F.log", input),
            "tool --in tests/t1.in --log tests/t1.in.log"
        );
    }

    #[test]
    fn template_without_placeholder_is_unchanged() {
        assert_eq!(substitute("tool --all", Path::new("x")), "tool --all");
    }

    #[test]
    fn expand_inputs_matches_files_by_pattern() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("a.in"), "").expect("write");
        fs::write(dir.path().join("b.in"), "").expect("write");
        fs::write(dir.path().join("c.other"), "").expect("write");
        let pattern = dir.path().join("*.in").display().to_string();
        let inputs = expand_inputs(&[pattern]).expect("expand");
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn expand_inputs_with_no_match_is_empty_not_fatal() {
        let inputs = expand_inputs(&["/nonexistent/*.zzz".to_string()]).expect("expand");
        assert!(inputs.is_empty());
    }

    #[test]
    fn capture_artifact_is_named_after_the_input_stem() {
        let config = RunConfig::new(Path::new("out"));
        let path = capture_path(&config, Path::new("inputs/t1.txt"));
        assert_eq!(path, Path::new("out").join("t1.console.txt"));
    }
}
