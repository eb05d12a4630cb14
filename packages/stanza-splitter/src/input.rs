//! Feeding input files and standard input into a splitter.
//!
//! All inputs form a single logical stream: a stanza that is open at the end
//! of one file keeps receiving lines from the next.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::SplitterConfig;
use crate::error::{Result, SplitterError};
use crate::splitter::StanzaSplitter;
use crate::types::SplitReport;

/// Input path meaning standard input.
pub const STDIN_PATH: &str = "-";

/// Feed every line of `reader` to `splitter`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// stray Latin-1 character does not abort a migration. `name` is only used
/// in error messages.
pub fn split_reader<R: BufRead>(
    splitter: &mut StanzaSplitter,
    mut reader: R,
    name: &Path,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| SplitterError::Input {
                path: name.to_path_buf(),
                source,
            })?;
        if read == 0 {
            return Ok(());
        }
        splitter.process(&String::from_utf8_lossy(&buf))?;
    }
}

/// Split the given inputs, or standard input when `inputs` is empty.
///
/// Inputs are read in order; `-` stands for standard input. Every input file
/// is opened just before it is read, so a missing file is reported only
/// after the inputs ahead of it were processed.
pub fn split_inputs(inputs: &[PathBuf], config: SplitterConfig) -> Result<SplitReport> {
    let mut splitter = StanzaSplitter::new(config)?;

    if inputs.is_empty() {
        split_stdin(&mut splitter)?;
    }

    for path in inputs {
        if path.as_os_str() == STDIN_PATH {
            split_stdin(&mut splitter)?;
            continue;
        }
        tracing::debug!(path = %path.display(), "Reading input file");
        let file = File::open(path).map_err(|source| SplitterError::Input {
            path: path.clone(),
            source,
        })?;
        split_reader(&mut splitter, BufReader::new(file), path)?;
    }

    splitter.finish()
}

fn split_stdin(splitter: &mut StanzaSplitter) -> Result<()> {
    tracing::debug!("Reading standard input");
    split_reader(splitter, io::stdin().lock(), Path::new(STDIN_PATH))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir) -> SplitterConfig {
        SplitterConfig::new()
            .with_output_dir(dir.path().join("out"))
            .with_groups("test")
    }

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        dir
    }

    fn body(dir: &TempDir, name: &str) -> Vec<String> {
        fs::read_to_string(dir.path().join("out").join(name))
            .unwrap()
            .lines()
            .skip(2)
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_split_reader_handles_missing_final_newline() {
        let dir = setup();
        let mut splitter = StanzaSplitter::new(config(&dir)).unwrap();
        split_reader(
            &mut splitter,
            Cursor::new("DbVar1 A\r\nx\r\ny"),
            Path::new("test"),
        )
        .unwrap();
        splitter.finish().unwrap();

        assert_eq!(body(&dir, "A.stz"), vec!["x", "y"]);
    }

    #[test]
    fn test_split_reader_replaces_invalid_utf8() {
        let dir = setup();
        let mut splitter = StanzaSplitter::new(config(&dir)).unwrap();
        split_reader(
            &mut splitter,
            Cursor::new(b"DbVar1 Caf\xe9\nTitle Caf\xe9\n".to_vec()),
            Path::new("test"),
        )
        .unwrap();
        splitter.finish().unwrap();

        assert_eq!(body(&dir, "Caf.stz"), vec!["Title Caf\u{fffd}"]);
    }

    #[test]
    fn test_split_inputs_concatenates_files() {
        let dir = setup();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "DbVar1 A\na1\nDbVar1 B\nb1\n").unwrap();
        fs::write(&second, "b2\nDbVar1 C\nc1\n").unwrap();

        let report = split_inputs(&[first, second], config(&dir)).unwrap();

        assert_eq!(report.file_count(), 3);
        assert_eq!(body(&dir, "A.stz"), vec!["a1"]);
        // Stanza B continues into the second file
        assert_eq!(body(&dir, "B.stz"), vec!["b1", "b2"]);
        assert_eq!(body(&dir, "C.stz"), vec!["c1"]);
    }

    #[test]
    fn test_split_inputs_missing_file() {
        let dir = setup();
        let missing = dir.path().join("missing.txt");

        let err = split_inputs(&[missing.clone()], config(&dir)).unwrap_err();
        match err {
            SplitterError::Input { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
