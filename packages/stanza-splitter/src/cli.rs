//! Command-line interface for the splitter.

use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;

use crate::config::{ConfigFile, Preset, SplitterConfig, StanzaPattern};
use crate::error::Result;
use crate::input::split_inputs;
use crate::types::SplitReport;

/// Split a monolithic EZproxy stanza file into one file per stanza.
///
/// Each stanza starts at a line matching the stanza start pattern
/// (`DbVarN <label>` by default) and is written to `<label>.stz`, with
/// characters that are unsafe in filenames removed from the label.
#[derive(Parser, Debug)]
#[command(name = "stanza-splitter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input files, read in order (default: standard input; `-` also means standard input)
    pub inputs: Vec<PathBuf>,

    /// Custom stanza start pattern; the label is the `label` group or the second group
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Built-in stanza start pattern (ignored when --pattern is given)
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Extension of the stanza files (default: .stz)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Value of the `# @groups:` line written at the top of each file
    #[arg(short, long)]
    pub groups: Option<String>,

    /// Also write the stanza start line into each stanza file
    #[arg(long)]
    pub keep_marker_line: bool,

    /// YAML config file; command-line options override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Build the splitter settings: defaults, then the config file, then flags.
    pub fn to_config(&self, program_name: &str) -> Result<SplitterConfig> {
        let mut config = SplitterConfig::new().with_program_name(program_name);

        if let Some(path) = &self.config {
            config = ConfigFile::load(path)?.apply(config)?;
        }

        if let Some(pattern) = &self.pattern {
            config = config.with_pattern(StanzaPattern::new(pattern)?);
        } else if let Some(preset) = self.preset {
            config = config.with_pattern(preset.pattern());
        }
        if let Some(extension) = &self.extension {
            config = config.with_extension(extension);
        }
        if let Some(groups) = &self.groups {
            config = config.with_groups(groups);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if self.keep_marker_line {
            config = config.with_keep_marker_line(true);
        }

        Ok(config)
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config(&program_name())?;

    let report = split_inputs(&cli.inputs, config)?;
    print_summary(&report);
    Ok(())
}

/// File name of the running executable, for the prefix line.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::config::DEFAULT_PROGRAM_NAME.to_string())
}

fn print_summary(report: &SplitReport) {
    println!(
        "{} {} stanza files",
        style("Wrote").green().bold(),
        report.file_count()
    );
    if !report.dropped_labels.is_empty() {
        println!(
            "  Dropped stanzas: {} (label has no usable filename characters)",
            style(report.dropped_labels.len()).yellow()
        );
    }
    if report.discarded_lines > 0 {
        println!("  Discarded lines: {}", report.discarded_lines);
    }
    if !report.warnings.is_empty() {
        println!("  Warnings: {}", style(report.warnings.len()).yellow().bold());
    }
}
