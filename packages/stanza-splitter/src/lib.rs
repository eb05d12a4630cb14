//! Stanza splitter - split a monolithic EZproxy stanza file into one file per stanza.
//!
//! Each stanza begins at a line matching the stanza start pattern (by default
//! `DbVarN <label>`). The label is filtered down to filename-safe characters
//! and the stanza is written to `<label>.stz`, headed by two comment lines.
//!
//! # Example
//!
//! ```
//! use stanza_splitter::filename::label_to_filename;
//!
//! assert_eq!(
//!     label_to_filename("Sample: Database (A&B)", ".stz").as_deref(),
//!     Some("Sample: Database (A&B).stz")
//! );
//! assert_eq!(label_to_filename("!!!***", ".stz"), None);
//! ```
//!
//! Directives such as `Option HttpsHyphens` stay in effect from one stanza to
//! the next. Split files merged back in a different order can therefore
//! behave differently from the original file.
//!
//! # Architecture
//!
//! - [`config`]: Constants, boundary pattern and run settings
//! - [`error`]: Error types and Result alias
//! - [`filename`]: Label to filename sanitization
//! - [`splitter`]: The line-by-line splitter
//! - [`input`]: Reading input files and standard input
//! - [`types`]: Run report types
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod filename;
pub mod input;
pub mod splitter;
pub mod types;

// Re-export commonly used items
pub use config::{Preset, SplitterConfig, StanzaPattern};
pub use error::{Result, SplitterError};
pub use input::{split_inputs, split_reader};
pub use splitter::StanzaSplitter;
pub use types::{SplitReport, StanzaFile};
