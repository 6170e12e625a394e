//! CLI argument parsing.
//!
//! The CLI is intentionally thin: every flag maps onto one explicit value
//! in `RunConfig` or one branch in `main`, so the comparison core never
//! reads arguments itself.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "diffout",
    version,
    about = "Run a command per input file and diff the outputs against a saved baseline",
    after_help = "Examples:\n  diffout 'mytool %F' 'tests/*.in'\n  diffout --save 'mytool %F' 'tests/*.in'\n  diffout --capture -o out 'mytool --dest out %F' 'tests/*.in'"
)]
pub struct Args {
    /// Command template; %F is replaced with each input file
    pub command_template: String,

    /// Input files or glob patterns, one command invocation per match
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Save current output as the new baseline instead of comparing
    #[arg(short, long)]
    pub save: bool,

    /// Capture each command's stdout/stderr as a compared output artifact
    #[arg(short, long)]
    pub capture: bool,

    /// Directory scanned for produced files (commands should write here)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Print less (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print more (debug detail)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_template_and_inputs_parse() {
        let args = Args::parse_from(["diffout", "tool %F", "a.in", "b.in"]);
        assert_eq!(args.command_template, "tool %F");
        assert_eq!(args.inputs, vec!["a.in".to_string(), "b.in".to_string()]);
        assert!(!args.save);
    }

    #[test]
    fn flags_parse_in_short_form() {
        let args = Args::parse_from(["diffout", "-s", "-c", "-o", "out", "tool %F", "a.in"]);
        assert!(args.save);
        assert!(args.capture);
        assert_eq!(args.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["diffout", "-q", "-v", "tool %F", "a.in"]);
        assert!(result.is_err());
    }

    #[test]
    fn inputs_are_required() {
        let result = Args::try_parse_from(["diffout", "tool %F"]);
        assert!(result.is_err());
    }
}
