//! Configuration for building an aligned corpus
//!
//! Holds the tabular input location, the two column names, and where the
//! line-synchronized output files go.

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX, SOURCE_FILE_SUFFIX, TARGET_FILE_SUFFIX};
use std::path::{Path, PathBuf};

/// Where the two corpus files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Destination directory (created when missing)
    pub output_dir: PathBuf,

    /// Filename prefix prepended to `source.txt` / `target.txt`
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl OutputConfig {
    /// `{output_dir}/{prefix}source.txt`
    pub fn source_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}{}", self.prefix, SOURCE_FILE_SUFFIX))
    }

    /// `{output_dir}/{prefix}target.txt`
    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}{}", self.prefix, TARGET_FILE_SUFFIX))
    }
}

/// Configuration parameters for building an aligned corpus
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Delimited tabular file with a header row
    pub table_path: PathBuf,

    /// Header of the source-language column
    pub source_col: String,

    /// Header of the target-language column
    pub target_col: String,

    /// Field delimiter; `None` infers it from the file extension
    pub delimiter: Option<u8>,

    /// Output location
    pub output: OutputConfig,
}

impl CorpusConfig {
    /// Create a configuration with default output settings
    pub fn new(table_path: impl Into<PathBuf>, source_col: &str, target_col: &str) -> Result<Self, String> {
        let config = Self {
            table_path: table_path.into(),
            source_col: source_col.to_string(),
            target_col: target_col.to_string(),
            delimiter: None,
            output: OutputConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.source_col.trim().is_empty() {
            return Err("source column name must not be empty".to_string());
        }
        if self.target_col.trim().is_empty() {
            return Err("target column name must not be empty".to_string());
        }
        if self.source_col.trim() == self.target_col.trim() {
            return Err(format!(
                "source and target columns must differ, both are '{}'",
                self.source_col.trim()
            ));
        }
        Ok(())
    }

    /// Delimiter to use: the explicit one, else tab for `.tsv`/`.tab`, else comma
    pub fn effective_delimiter(&self) -> u8 {
        self.delimiter.unwrap_or_else(|| infer_delimiter(&self.table_path))
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Corpus Configuration:");
        tracing::info!("  table = {}", self.table_path.display());
        tracing::info!("  source_col = {}", self.source_col);
        tracing::info!("  target_col = {}", self.target_col);
        tracing::debug!("  delimiter = {:?}", self.effective_delimiter() as char);
        tracing::info!("  output_dir = {}", self.output.output_dir.display());
        tracing::debug!("  prefix = {:?}", self.output.prefix);
    }
}

fn infer_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}
