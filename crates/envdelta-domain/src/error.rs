//! Error types for the diff engine.
//!
//! Each failure code is its own variant carrying only what that code needs.

use camino::Utf8PathBuf;
use envdelta_types::RepoPath;

/// Which tree a file came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Errors that abort a classification run.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A structured file is not valid YAML as read.
    #[error("failed to parse {side} file {file}: {message}")]
    Parse {
        file: RepoPath,
        side: Side,
        message: String,
    },

    /// Content transforms turned a source file into invalid YAML.
    #[error("transforms produced invalid YAML in {file}: {message}")]
    TransformedParse { file: RepoPath, message: String },

    /// Two or more source files (after renames) map to one destination path.
    #[error("destination {target} is claimed by more than one source: {}", join_paths(.sources))]
    RenameConflict {
        target: RepoPath,
        sources: Vec<RepoPath>,
    },
}

fn join_paths(paths: &[RepoPath]) -> String {
    paths
        .iter()
        .map(RepoPath::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while compiling rule sets, before any file is compared.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid glob pattern {pattern:?}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid regex {pattern:?}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read rule file {file}")]
    RuleFileRead {
        file: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file {file}: {message}")]
    RuleFileParse { file: Utf8PathBuf, message: String },

    #[error("rule file {file} must contain {expected}")]
    RuleFileShape {
        file: Utf8PathBuf,
        expected: &'static str,
    },
}
