/*!
 * Configuration handling for dirdoc
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;

use crate::error::{Result, ResultExt};
use crate::utils::{absolute_path, normalize_extension};
use crate::{bail, ensure};

/// Literal list value that disables a list option entirely
pub const DISABLE_TOKEN: &str = "none";

/// Settings file looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "config.json";

/// Command-line arguments for dirdoc
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "dirdoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Document the structure and contents of a directory tree",
    long_about = "Writes a single text or DOCX artifact containing a tree view of a directory followed by the contents of every included file, in the same order.",
    after_help = "The artifact format is chosen by the output file extension: .docx produces a Word document, anything else plain text."
)]
pub struct Args {
    /// Directory to document
    #[clap(short = 'r', long = "repo-path", alias = "repo_path", default_value = ".")]
    pub repo_path: PathBuf,

    /// Output artifact path (defaults to the configured output file)
    #[clap(short = 'o', long = "output-file", alias = "output_file")]
    pub output_file: Option<PathBuf>,

    /// File names to ignore, or "none"
    #[clap(long, num_args = 0.., value_delimiter = ',')]
    pub ignore_files: Option<Vec<String>>,

    /// File extensions to ignore, or "none" (defaults to the configured buckets)
    #[clap(long, num_args = 0.., value_delimiter = ',')]
    pub ignore_types: Option<Vec<String>>,

    /// Directory names to exclude, or "none"
    #[clap(long, num_args = 0.., value_delimiter = ',')]
    pub exclude_dir: Option<Vec<String>>,

    /// Also ignore common settings files
    #[clap(long)]
    pub ignore_settings: bool,

    /// Only document the contents of this directory
    #[clap(long)]
    pub include_dir: Option<PathBuf>,

    /// Settings document (JSON) with the default extension buckets
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Suppress the progress spinner and summary report
    #[clap(short, long)]
    pub quiet: bool,
}

/// Settings document supplying the default extension buckets
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub audio_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
    pub executable_extensions: Vec<String>,
    pub settings_extensions: Vec<String>,
    pub additional_ignore_types: Vec<String>,
    pub default_output_file: String,
}

impl Settings {
    /// Parse a settings document
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load the settings document at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings at {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings at {}", path.display()))
    }

    /// Find the settings document: the explicit path if given, otherwise
    /// `./config.json`, otherwise `<config dir>/dirdoc/config.json`.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            ensure!(
                path.is_file(),
                PathNotFound,
                "Settings file not found: {}",
                path.display()
            );
            return Ok(path.to_path_buf());
        }

        let local = PathBuf::from(SETTINGS_FILE_NAME);
        if local.is_file() {
            return Ok(local);
        }

        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("dirdoc").join(SETTINGS_FILE_NAME);
            if user.is_file() {
                return Ok(user);
            }
        }

        bail!(
            PathNotFound,
            "No {} found in the working directory or user config directory (use --config)",
            SETTINGS_FILE_NAME
        )
    }

    /// Extensions ignored when `--ignore-types` is omitted
    pub fn default_ignore_types(&self) -> Vec<String> {
        [
            &self.image_extensions,
            &self.video_extensions,
            &self.audio_extensions,
            &self.document_extensions,
            &self.executable_extensions,
            &self.additional_ignore_types,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

/// Artifact format, selected by the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text with literal markers
    Text,
    /// Office Open XML word processing document
    Docx,
}

impl OutputFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => Self::Docx,
            _ => Self::Text,
        }
    }
}

/// Application configuration, built once per run
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to document (absolute)
    pub root: PathBuf,

    /// Output artifact path (absolute)
    pub output_file: PathBuf,

    /// File names to ignore
    pub ignore_files: BTreeSet<String>,

    /// Lower-cased, dot-prefixed extensions to ignore
    pub ignore_types: BTreeSet<String>,

    /// Directory names to exclude
    pub exclude_dirs: BTreeSet<String>,

    /// Only this subtree is documented (absolute)
    pub include_dir: Option<PathBuf>,

    /// Whether settings-file extensions are ignored
    pub ignore_settings: bool,

    /// Settings-file extensions from the settings document
    pub settings_extensions: BTreeSet<String>,
}

impl Config {
    /// Configuration with no exclusions beyond the built-in rules
    pub fn new(root: impl AsRef<Path>, output_file: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            root: absolute_path(root.as_ref())?,
            output_file: absolute_path(output_file.as_ref())?,
            ignore_files: BTreeSet::new(),
            ignore_types: BTreeSet::new(),
            exclude_dirs: BTreeSet::new(),
            include_dir: None,
            ignore_settings: false,
            settings_extensions: BTreeSet::new(),
        })
    }

    /// Create configuration from command-line arguments and settings
    pub fn from_args(args: &Args, settings: &Settings) -> Result<Self> {
        let output_file = args
            .output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.default_output_file));

        let mut config = Self::new(&args.repo_path, output_file)?;
        config.ignore_files = resolve_list(args.ignore_files.as_deref(), Vec::new())
            .into_iter()
            .collect();
        config.ignore_types = extension_set(&resolve_list(
            args.ignore_types.as_deref(),
            settings.default_ignore_types(),
        ));
        config.exclude_dirs = resolve_list(args.exclude_dir.as_deref(), Vec::new())
            .into_iter()
            .collect();
        config.include_dir = args
            .include_dir
            .as_deref()
            .map(absolute_path)
            .transpose()?;
        config.ignore_settings = args.ignore_settings;
        config.settings_extensions = extension_set(&settings.settings_extensions);

        Ok(config)
    }

    /// Selected artifact format
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::for_path(&self.output_file)
    }

    /// Validate the configuration before any output is produced
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.root.is_dir(),
            PathNotFound,
            "The specified directory does not exist, path is wrong or is not a directory: {}",
            self.root.display()
        );

        if let Some(parent) = self.output_file.parent() {
            ensure!(
                parent.is_dir(),
                PathNotFound,
                "Output directory not found: {}",
                parent.display()
            );
        }

        ensure!(
            !self.output_file.is_dir(),
            InvalidArgument,
            "Output file is a directory: {}",
            self.output_file.display()
        );

        Ok(())
    }
}

/// Apply the list-option rules: omitted uses `default`, a lone `none`
/// disables the list, anything else replaces the default.
pub fn resolve_list(values: Option<&[String]>, default: Vec<String>) -> Vec<String> {
    match values {
        None => default,
        Some([only]) if only == DISABLE_TOKEN => Vec::new(),
        Some(values) => values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn extension_set(values: &[String]) -> BTreeSet<String> {
    values.iter().filter_map(|v| normalize_extension(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            image_extensions: vec![".png".into(), ".JPG".into()],
            video_extensions: vec![".mp4".into()],
            audio_extensions: vec![".mp3".into()],
            document_extensions: vec![".pdf".into()],
            executable_extensions: vec![".exe".into()],
            settings_extensions: vec![".json".into(), "toml".into()],
            additional_ignore_types: vec![".lock".into()],
            default_output_file: "output.txt".into(),
        }
    }

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("dirdoc").chain(argv.iter().copied()))
    }

    #[test]
    fn test_resolve_list() {
        let default = vec!["a".to_string()];
        assert_eq!(resolve_list(None, default.clone()), default);
        assert!(resolve_list(Some(&["none".to_string()]), default.clone()).is_empty());
        assert_eq!(
            resolve_list(Some(&["b".to_string(), "c".to_string()]), default),
            vec!["b", "c"]
        );
    }

    #[test]
    fn test_default_ignore_types_include_additional_bucket() {
        let config = Config::from_args(&parse(&[]), &settings()).unwrap();
        for ext in [".png", ".jpg", ".mp4", ".mp3", ".pdf", ".exe", ".lock"] {
            assert!(config.ignore_types.contains(ext), "missing {}", ext);
        }
        assert!(!config.ignore_types.contains(".json"));
    }

    #[test]
    fn test_explicit_ignore_types_replace_defaults() {
        let config = Config::from_args(&parse(&["--ignore-types", "PNG", ".md"]), &settings())
            .unwrap();
        let expected: BTreeSet<String> = [".png", ".md"].iter().map(|s| s.to_string()).collect();
        assert_eq!(config.ignore_types, expected);
    }

    #[test]
    fn test_disable_token_clears_ignore_types() {
        let config =
            Config::from_args(&parse(&["--ignore-types", "none"]), &settings()).unwrap();
        assert!(config.ignore_types.is_empty());
    }

    #[test]
    fn test_comma_separated_lists() {
        let config = Config::from_args(
            &parse(&["--exclude-dir", "target,node_modules", "--ignore-files", "LICENSE"]),
            &settings(),
        )
        .unwrap();
        assert!(config.exclude_dirs.contains("target"));
        assert!(config.exclude_dirs.contains("node_modules"));
        assert!(config.ignore_files.contains("LICENSE"));
    }

    #[test]
    fn test_default_output_file_from_settings() {
        let config = Config::from_args(&parse(&["-r", "/tmp"]), &settings()).unwrap();
        assert!(config.output_file.ends_with("output.txt"));
        assert!(config.output_file.is_absolute());
        assert_eq!(config.root, PathBuf::from("/tmp"));
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_output_format_for_path() {
        assert_eq!(
            OutputFormat::for_path(Path::new("report.DOCX")),
            OutputFormat::Docx
        );
        assert_eq!(
            OutputFormat::for_path(Path::new("report.txt")),
            OutputFormat::Text
        );
        assert_eq!(OutputFormat::for_path(Path::new("docx")), OutputFormat::Text);
    }

    #[test]
    fn test_settings_from_json_rejects_missing_keys() {
        assert!(Settings::from_json(r#"{"image_extensions": []}"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let config = Config::new("/definitely/not/a/dir", "/tmp/out.txt").unwrap();
        assert!(config.validate().is_err());
    }
}
