//! Configuration constants, the boundary pattern and splitter settings.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::{Result, SplitterError};

/// Default stanza start pattern: `DbVar0` .. `DbVar9` followed by the label.
pub const DBVAR_PATTERN: &str = r"^(DbVar[0-9])\s+(.*)\s*$";

/// Alternative stanza start pattern for files where every stanza opens with
/// a `Title` (or `T`) line.
pub const TITLE_PATTERN: &str = r"^(Title|T)\s+(.*)\s*$";

/// Extension appended to every derived filename.
pub const DEFAULT_EXTENSION: &str = ".stz";

/// Value written on the `# @groups:` prefix line.
pub const DEFAULT_GROUPS: &str = "flinders";

/// Timestamp format for the `# Auto created on` prefix line.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Program name used in the prefix line when none is supplied.
pub const DEFAULT_PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Name of the capture group holding the stanza label.
const LABEL_GROUP: &str = "label";

#[allow(clippy::expect_used)] // Static pattern that is guaranteed to be valid
static DBVAR: LazyLock<StanzaPattern> =
    LazyLock::new(|| StanzaPattern::new(DBVAR_PATTERN).expect("valid regex"));

#[allow(clippy::expect_used)] // Static pattern that is guaranteed to be valid
static TITLE: LazyLock<StanzaPattern> =
    LazyLock::new(|| StanzaPattern::new(TITLE_PATTERN).expect("valid regex"));

/// Built-in stanza start patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Stanzas start at a `DbVarN <label>` line.
    #[default]
    #[value(name = "dbvar")]
    DbVar,
    /// Stanzas start at a `Title <label>` or `T <label>` line.
    Title,
}

impl Preset {
    /// Compiled pattern for this preset.
    pub fn pattern(self) -> StanzaPattern {
        match self {
            Preset::DbVar => DBVAR.clone(),
            Preset::Title => TITLE.clone(),
        }
    }
}

/// Compiled stanza boundary pattern.
///
/// The pattern is matched case-insensitively against the whole trimmed line.
/// The label comes from a group named `label` when the pattern has one,
/// otherwise from the second capture group (the first one holds the marker
/// keyword, e.g. `DbVar1`).
#[derive(Debug, Clone)]
pub struct StanzaPattern {
    source: String,
    regex: Regex,
    named_label: bool,
}

impl StanzaPattern {
    /// Compile a boundary pattern.
    ///
    /// # Examples
    /// ```
    /// use stanza_splitter::config::StanzaPattern;
    ///
    /// let pattern = StanzaPattern::new(r"^(?<marker>Title)\s+(?<label>.*)$").unwrap();
    /// assert_eq!(pattern.label("title EBSCOhost"), Some("EBSCOhost"));
    /// assert_eq!(pattern.label("URL https://example.org"), None);
    /// assert!(StanzaPattern::new(r"^Title\s+.*$").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()
            .map_err(|source| SplitterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        let named_label = regex.capture_names().any(|name| name == Some(LABEL_GROUP));
        // captures_len counts the implicit whole-match group
        if !named_label && regex.captures_len() < 3 {
            return Err(SplitterError::MissingLabelGroup(pattern.to_string()));
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
            named_label,
        })
    }

    /// The pattern as it was given, without the added anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Return the raw label if `line` is a stanza start line.
    ///
    /// A matching line whose label group did not participate yields `Some("")`.
    pub fn label<'h>(&self, line: &'h str) -> Option<&'h str> {
        let caps = self.regex.captures(line)?;
        let label = if self.named_label {
            caps.name(LABEL_GROUP)
        } else {
            caps.get(2)
        };
        Some(label.map_or("", |m| m.as_str()))
    }
}

impl Default for StanzaPattern {
    fn default() -> Self {
        Preset::default().pattern()
    }
}

impl fmt::Display for StanzaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/i", self.source)
    }
}

/// Validate an output extension.
///
/// # Examples
/// ```
/// use stanza_splitter::config::validate_extension;
///
/// assert!(validate_extension(".stz").is_ok());
/// assert!(validate_extension("").is_err());
/// assert!(validate_extension("/stz").is_err());
/// ```
pub fn validate_extension(extension: &str) -> Result<()> {
    if extension.is_empty() || extension.contains(['/', '\\']) {
        Err(SplitterError::InvalidExtension(extension.to_string()))
    } else {
        Ok(())
    }
}

/// Check that `dir` exists and is a directory.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(SplitterError::OutputDir(dir.to_path_buf()))
    }
}

/// Settings for one splitting run.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Boundary pattern detecting the first line of a stanza.
    pub pattern: StanzaPattern,
    /// Extension appended to sanitized labels.
    pub extension: String,
    /// Value of the `# @groups:` prefix line.
    pub groups: String,
    /// Directory receiving the stanza files.
    pub output_dir: PathBuf,
    /// Program name recorded in the `# Auto created` prefix line.
    pub program_name: String,
    /// Timestamp recorded in the `# Auto created` prefix line.
    pub generated_at: NaiveDateTime,
    /// Also write the stanza start line into the new file, after the prefix.
    pub keep_marker_line: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            pattern: StanzaPattern::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            groups: DEFAULT_GROUPS.to_string(),
            output_dir: PathBuf::from("."),
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            generated_at: chrono::Local::now().naive_local(),
            keep_marker_line: false,
        }
    }
}

impl SplitterConfig {
    /// Create settings with the defaults and the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stanza start pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: StanzaPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the stanza file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the `# @groups:` value.
    #[must_use]
    pub fn with_groups(mut self, groups: impl Into<String>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the program name for the prefix line.
    #[must_use]
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Set the creation timestamp for the prefix line.
    #[must_use]
    pub fn with_generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    /// Set whether the stanza start line is copied into the file.
    #[must_use]
    pub fn with_keep_marker_line(mut self, keep: bool) -> Self {
        self.keep_marker_line = keep;
        self
    }

    /// Validate settings that can't be checked at construction time.
    pub fn validate(&self) -> Result<()> {
        validate_extension(&self.extension)?;
        validate_output_dir(&self.output_dir)
    }

    /// The lines written at the top of every stanza file.
    pub fn prefix_lines(&self) -> [String; 2] {
        [
            format!(
                "# Auto created on {} by program {}",
                self.generated_at.format(TIME_FORMAT),
                self.program_name
            ),
            format!("# @groups: {}", self.groups),
        ]
    }
}

/// Settings read from a YAML config file.
///
/// ```yaml
/// preset: title
/// extension: .stz
/// groups: flinders
/// output_dir: stanzas
/// keep_marker_line: true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Custom boundary pattern; takes precedence over `preset`.
    pub pattern: Option<String>,
    pub preset: Option<Preset>,
    pub extension: Option<String>,
    pub groups: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub keep_marker_line: Option<bool>,
}

impl ConfigFile {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SplitterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&text).map_err(|source| SplitterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay the values present in this file onto `config`.
    pub fn apply(self, mut config: SplitterConfig) -> Result<SplitterConfig> {
        if let Some(pattern) = self.pattern {
            config.pattern = StanzaPattern::new(&pattern)?;
        } else if let Some(preset) = self.preset {
            config.pattern = preset.pattern();
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if let Some(groups) = self.groups {
            config.groups = groups;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(keep) = self.keep_marker_line {
            config.keep_marker_line = keep;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dbvar_pattern_matches() {
        let pattern = Preset::DbVar.pattern();
        assert_eq!(pattern.label("DbVar1 Sample Database"), Some("Sample Database"));
        assert_eq!(pattern.label("dbvar0 lower case"), Some("lower case"));
        assert_eq!(pattern.label("DBVAR9   spaced"), Some("spaced"));
    }

    #[test]
    fn test_dbvar_pattern_rejects() {
        let pattern = Preset::DbVar.pattern();
        assert_eq!(pattern.label("DbVar Sample"), None); // no digit
        assert_eq!(pattern.label("DbVar12 Sample"), None); // two digits
        assert_eq!(pattern.label("DbVar\u{663} Sample"), None); // Arabic-Indic three
        assert_eq!(pattern.label("Title Sample"), None);
        assert_eq!(pattern.label("  DbVar1 Sample"), None); // line is not trimmed here
        assert_eq!(pattern.label(""), None);
    }

    #[test]
    fn test_title_pattern() {
        let pattern = Preset::Title.pattern();
        assert_eq!(pattern.label("Title JSTOR"), Some("JSTOR"));
        assert_eq!(pattern.label("T JSTOR"), Some("JSTOR"));
        assert_eq!(pattern.label("TITLE -hide JSTOR"), Some("-hide JSTOR"));
        assert_eq!(pattern.label("URL https://www.jstor.org"), None);
    }

    #[test]
    fn test_custom_pattern_is_anchored() {
        let pattern = StanzaPattern::new(r"(Name)\s+(\w+)").unwrap();
        assert_eq!(pattern.label("Name foo"), Some("foo"));
        assert_eq!(pattern.label("xName foo"), None);
        assert_eq!(pattern.label("Name foo bar"), None);
    }

    #[test]
    fn test_named_label_group_wins() {
        let pattern = StanzaPattern::new(r"(?<label>\w+)\s+(Stanza)").unwrap();
        assert_eq!(pattern.label("Ovid stanza"), Some("Ovid"));
    }

    #[test]
    fn test_optional_label_group_yields_empty() {
        let pattern = StanzaPattern::new(r"(Title)(\s+.+)?").unwrap();
        assert_eq!(pattern.label("Title"), Some(""));
    }

    #[test]
    fn test_pattern_errors() {
        assert!(matches!(
            StanzaPattern::new(r"(Title\s+"),
            Err(SplitterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            StanzaPattern::new(r"(Title)\s+.*"),
            Err(SplitterError::MissingLabelGroup(_))
        ));
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(
            Preset::DbVar.pattern().to_string(),
            r"/^(DbVar[0-9])\s+(.*)\s*$/i"
        );
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension(".stz").is_ok());
        assert!(validate_extension(".txt").is_ok());
        assert!(validate_extension("").is_err());
        assert!(validate_extension("a/b").is_err());
        assert!(validate_extension("a\\b").is_err());
    }

    #[test]
    fn test_validate_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path()).is_ok());
        assert!(validate_output_dir(&dir.path().join("missing")).is_err());

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(validate_output_dir(&file).is_err());
    }

    #[test]
    fn test_prefix_lines() {
        let at = chrono::NaiveDate::from_ymd_opt(2017, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        let config = SplitterConfig::new()
            .with_generated_at(at)
            .with_program_name("split")
            .with_groups("library");

        assert_eq!(
            config.prefix_lines(),
            [
                "# Auto created on 2017-03-04 05:06:07 by program split".to_string(),
                "# @groups: library".to_string(),
            ]
        );
    }

    #[test]
    fn test_config_file_overrides() {
        let file: ConfigFile = serde_yaml_ng::from_str(
            "preset: title\nextension: .txt\ngroups: staff\nkeep_marker_line: true\n",
        )
        .unwrap();
        let config = file.apply(SplitterConfig::new()).unwrap();

        assert_eq!(config.pattern.as_str(), TITLE_PATTERN);
        assert_eq!(config.extension, ".txt");
        assert_eq!(config.groups, "staff");
        assert!(config.keep_marker_line);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_config_file_pattern_beats_preset() {
        let file: ConfigFile =
            serde_yaml_ng::from_str("preset: title\npattern: '(Name)\\s+(.*)'\n").unwrap();
        let config = file.apply(SplitterConfig::new()).unwrap();
        assert_eq!(config.pattern.as_str(), r"(Name)\s+(.*)");
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splitter.yaml");
        fs::write(&path, "extention: .stz\n").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(SplitterError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ConfigFile::load(&dir.path().join("nope.yaml")),
            Err(SplitterError::ConfigRead { .. })
        ));
    }
}
