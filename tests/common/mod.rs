//! Shared test infrastructure for integration tests.
//!
//! Each fixture is an isolated temp directory the diffout binary runs
//! inside: inputs under `in/`, produced files in the root, baseline under
//! `expected/`, report under `report/`.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub struct Fixture {
    root: TempDir,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create fixture root");
        fs::create_dir(root.path().join("in")).expect("create input dir");
        Self { root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("read fixture file")
    }

    /// Run the diffout binary with the fixture root as working directory.
    pub fn run_diffout(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_diffout"))
            .args(args)
            .current_dir(self.root.path())
            .output()
            .expect("run diffout binary")
    }

    pub fn report_html(&self) -> String {
        self.read("report/results.html")
    }

    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.read("report/summary.json")).expect("parse summary.json")
    }
}
