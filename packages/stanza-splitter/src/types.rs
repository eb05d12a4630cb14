//! Core data types for a splitting run.

use std::path::PathBuf;

/// One stanza file written during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanzaFile {
    /// Raw label captured from the stanza start line.
    pub label: String,
    /// Path of the written file.
    pub path: PathBuf,
    /// Number of content lines written after the prefix lines.
    pub lines: usize,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Stanza files in the order they were opened.
    ///
    /// Stanzas whose labels sanitize to the same filename each get an entry,
    /// though only the last one survives on disk.
    pub files: Vec<StanzaFile>,
    /// Labels of stanzas that were skipped because they sanitized to nothing.
    pub dropped_labels: Vec<String>,
    /// Non-empty lines that had no stanza file to go to.
    pub discarded_lines: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SplitReport {
    /// Number of stanza start lines seen, written or dropped.
    pub fn stanza_count(&self) -> usize {
        self.files.len() + self.dropped_labels.len()
    }

    /// Number of stanza files opened for writing.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
