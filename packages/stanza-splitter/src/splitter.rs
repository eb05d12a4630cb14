//! The stanza splitter state machine.
//!
//! Lines are fed one at a time. A line matching the stanza start pattern
//! closes the current stanza file and opens a new one named after the
//! captured label; every other non-empty line goes to the open file, if any.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SplitterConfig;
use crate::error::{Result, SplitterError};
use crate::filename::label_to_filename;
use crate::types::{SplitReport, StanzaFile};

/// The stanza file currently receiving lines.
#[derive(Debug)]
struct Destination {
    label: String,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl Destination {
    /// Create (or truncate) the file at `path` and write the prefix lines.
    fn create(label: &str, path: PathBuf, prefix: &[String]) -> Result<Self> {
        let file = File::create(&path).map_err(|source| SplitterError::CreateFile {
            path: path.clone(),
            source,
        })?;
        let mut dest = Self {
            label: label.to_string(),
            path,
            writer: BufWriter::new(file),
            lines: 0,
        };
        for line in prefix {
            dest.put(line)?;
        }
        Ok(dest)
    }

    fn put(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| SplitterError::WriteFile {
            path: self.path.clone(),
            source,
        })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        self.put(line)?;
        self.lines += 1;
        Ok(())
    }

    /// Flush and close the file.
    fn close(mut self) -> Result<StanzaFile> {
        self.writer
            .flush()
            .map_err(|source| SplitterError::WriteFile {
                path: self.path.clone(),
                source,
            })?;
        Ok(StanzaFile {
            label: self.label,
            path: self.path,
            lines: self.lines,
        })
    }
}

/// Splits a stream of lines into one file per stanza.
///
/// At most one stanza file is open at a time. It is closed before the next
/// one is opened and by [`finish`](Self::finish).
///
/// # Example
///
/// ```no_run
/// use stanza_splitter::{SplitterConfig, StanzaSplitter};
///
/// let mut splitter = StanzaSplitter::new(SplitterConfig::new().with_output_dir("stanzas"))?;
/// splitter.process("DbVar1 JSTOR")?;
/// splitter.process("URL https://www.jstor.org")?;
/// let report = splitter.finish()?;
/// assert_eq!(report.file_count(), 1);
/// # Ok::<(), stanza_splitter::SplitterError>(())
/// ```
#[derive(Debug)]
pub struct StanzaSplitter {
    config: SplitterConfig,
    prefix: [String; 2],
    current: Option<Destination>,
    opened_any: bool,
    warned_leading: bool,
    line_no: usize,
    report: SplitReport,
}

impl StanzaSplitter {
    /// Create a splitter, validating `config` first.
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let prefix = config.prefix_lines();
        Ok(Self {
            config,
            prefix,
            current: None,
            opened_any: false,
            warned_leading: false,
            line_no: 0,
            report: SplitReport::default(),
        })
    }

    /// Path of the stanza file currently receiving lines.
    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_ref().map(|dest| dest.path.as_path())
    }

    /// Report of the run so far. Files still open are not listed yet.
    pub fn report(&self) -> &SplitReport {
        &self.report
    }

    /// Process one input line.
    pub fn process(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;
        let line = line.trim();

        if let Some(label) = self.config.pattern.label(line) {
            return self.start_stanza(label, line);
        }

        if line.is_empty() {
            return Ok(());
        }

        if !self.opened_any && !self.warned_leading {
            self.warn_leading_content();
        }

        match self.current.as_mut() {
            Some(dest) => dest.write_line(line),
            None => {
                self.report.discarded_lines += 1;
                Ok(())
            }
        }
    }

    /// Close the open stanza file, if any, and return the run report.
    pub fn finish(mut self) -> Result<SplitReport> {
        self.close()?;
        tracing::info!(
            files = self.report.file_count(),
            dropped = self.report.dropped_labels.len(),
            discarded_lines = self.report.discarded_lines,
            "Split complete"
        );
        Ok(self.report)
    }

    fn start_stanza(&mut self, label: &str, line: &str) -> Result<()> {
        self.close()?;

        let Some(filename) = label_to_filename(label, &self.config.extension) else {
            tracing::debug!(
                line = self.line_no,
                label,
                "Stanza label has no filename characters, dropping stanza"
            );
            self.report.dropped_labels.push(label.to_string());
            return Ok(());
        };

        let path = self.config.output_dir.join(filename);
        if self.report.files.iter().any(|f| f.path == path) {
            tracing::debug!(path = %path.display(), "Overwriting stanza file from an earlier stanza");
        }

        let mut dest = Destination::create(label, path, &self.prefix)?;
        self.opened_any = true;
        tracing::debug!(line = self.line_no, path = %dest.path.display(), "Opened stanza file");

        if self.config.keep_marker_line {
            dest.write_line(line)?;
        }
        self.current = Some(dest);
        Ok(())
    }

    /// Close the open stanza file. A no-op when none is open.
    ///
    /// The destination is detached before flushing, so a failed close never
    /// leaves a stale file open for later lines.
    fn close(&mut self) -> Result<()> {
        let Some(dest) = self.current.take() else {
            return Ok(());
        };
        let file = dest.close()?;
        self.report.files.push(file);
        Ok(())
    }

    fn warn_leading_content(&mut self) {
        let message = format!(
            "Unexpected content before first {} line",
            self.config.pattern
        );
        tracing::warn!(line = self.line_no, "{message}");
        self.report.warnings.push(message);
        self.warned_leading = true;
    }
}
