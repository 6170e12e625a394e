//! Fatal failure taxonomy.
//!
//! Comparison correctness cannot be partially trusted, so anything that
//! would make a verdict unreliable aborts the whole run. Recoverable
//! conditions (failed commands, missing scan directories) are logged and
//! counted instead and never appear here.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffoutError {
    /// A file that must exist for comparison does not.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No decode strategy accepted the file. Latin-1 accepts any byte
    /// string, so this is unreachable in practice; if it ever fires the
    /// run must abort rather than compare a garbage decode.
    #[error("cannot determine text encoding for {}", .0.display())]
    Undecodable(PathBuf),

    /// The marker file that anchors produced-file discovery is missing.
    #[error("marker file not found: {}", .0.display())]
    MarkerMissing(PathBuf),

    /// The baseline directory could not be cleared or recreated during a
    /// save. Saving is destructive and must not partially apply.
    #[error("failed to reset baseline directory {}", path.display())]
    BaselineClear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
