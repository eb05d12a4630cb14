//! Error types for the stanza splitter.
//!
//! Every variant is fatal for a run. Labels that sanitize to nothing and
//! content before the first stanza are not errors; they are recorded in the
//! [`SplitReport`](crate::types::SplitReport) instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the splitter library.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// The boundary pattern is not a valid regular expression.
    #[error("Invalid stanza start pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The boundary pattern has no group that could capture a label.
    #[error("Stanza start pattern '{0}' needs a 'label' group or at least two capture groups")]
    MissingLabelGroup(String),

    /// Output extension is empty or contains a path separator.
    #[error("Invalid output extension: '{0}'. Expected something like '.stz'")]
    InvalidExtension(String),

    /// Config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected schema.
    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Output directory is missing or not a directory.
    #[error("Output directory is not usable: {}", .0.display())]
    OutputDir(PathBuf),

    /// An input file could not be opened or read.
    #[error("Failed to read input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stanza file could not be created.
    #[error("Failed to create stanza file {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to or closing a stanza file failed.
    #[error("Failed to write stanza file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for splitter operations.
pub type Result<T> = std::result::Result<T, SplitterError>;
