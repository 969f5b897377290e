//! Line-synchronized store
//!
//! A corpus is persisted as two newline-delimited files where line `i` of
//! the source file and line `i` of the target file come from the same verse.
//! Tokens are joined with a single space.
//!
//! Writing goes through `.tmp` siblings: both files are fully written and
//! flushed before either is renamed into place. The previous source file is
//! moved to a `.bak` sibling until the target rename succeeds, and is put
//! back if it fails, so a failed write never leaves one new file next to one
//! stale file. No `.tmp` or `.bak` file survives a call.

use crate::builder::config::OutputConfig;
use crate::constants::{BACKUP_FILE_EXTENSION, PARTIAL_FILE_EXTENSION};
use crate::normalizer::TokenSequence;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading or writing line files
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file does not exist
    #[error("could not find file {}", path.display())]
    NotFound {
        /// Missing file
        path: PathBuf,
    },
    /// Any other I/O failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Two token-sequence collections kept in verse lockstep
///
/// Pairs can only be added together, so both sides always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedCorpus {
    source_sequences: Vec<TokenSequence>,
    target_sequences: Vec<TokenSequence>,
}

impl AlignedCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one retained verse
    pub fn push(&mut self, source: TokenSequence, target: TokenSequence) {
        self.source_sequences.push(source);
        self.target_sequences.push(target);
    }

    /// Number of retained verses
    pub fn len(&self) -> usize {
        self.source_sequences.len()
    }

    /// Whether no verse was retained
    pub fn is_empty(&self) -> bool {
        self.source_sequences.is_empty()
    }

    /// Source-side token sequences in retained order
    pub fn source_sequences(&self) -> &[TokenSequence] {
        &self.source_sequences
    }

    /// Target-side token sequences in retained order
    pub fn target_sequences(&self) -> &[TokenSequence] {
        &self.target_sequences
    }

    /// Iterate `(source, target)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&TokenSequence, &TokenSequence)> {
        self.source_sequences.iter().zip(self.target_sequences.iter())
    }
}

/// Final locations of a written corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    /// `{prefix}source.txt`
    pub source: PathBuf,
    /// `{prefix}target.txt`
    pub target: PathBuf,
}

fn sibling_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}

fn partial_path(path: &Path) -> PathBuf {
    sibling_path(path, PARTIAL_FILE_EXTENSION)
}

fn backup_path(path: &Path) -> PathBuf {
    sibling_path(path, BACKUP_FILE_EXTENSION)
}

/// Write both sides of `corpus` in one pass over its pairs
fn write_pairs(corpus: &AlignedCorpus, source_path: &Path, target_path: &Path) -> Result<(), StoreError> {
    let create = |path: &Path| {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| StoreError::from_io(path, e))
    };
    let mut source = create(source_path)?;
    let mut target = create(target_path)?;

    for (source_tokens, target_tokens) in corpus.pairs() {
        writeln!(source, "{}", source_tokens.join(" ")).map_err(|e| StoreError::from_io(source_path, e))?;
        writeln!(target, "{}", target_tokens.join(" ")).map_err(|e| StoreError::from_io(target_path, e))?;
    }

    source.flush().map_err(|e| StoreError::from_io(source_path, e))?;
    target.flush().map_err(|e| StoreError::from_io(target_path, e))?;
    Ok(())
}

fn remove_if_present(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Rename `from` to `to`, mapping failures to `to`
fn rename(from: &Path, to: &Path) -> Result<(), StoreError> {
    fs::rename(from, to).map_err(|e| StoreError::from_io(to, e))
}

/// Swap both staged files into place, restoring the previous source on failure
fn commit_pair(paths: &CorpusPaths, partial_source: &Path, partial_target: &Path) -> Result<(), StoreError> {
    let backup = backup_path(&paths.source);
    let had_source = paths.source.is_file();
    if had_source {
        rename(&paths.source, &backup)?;
    }

    let committed = rename(partial_source, &paths.source).and_then(|()| rename(partial_target, &paths.target));
    if let Err(e) = committed {
        if had_source {
            if let Err(restore) = fs::rename(&backup, &paths.source) {
                warn!("Could not restore {} from {}: {}", paths.source.display(), backup.display(), restore);
            }
        } else {
            remove_if_present(&paths.source);
        }
        return Err(e);
    }

    if had_source {
        remove_if_present(&backup);
    }
    Ok(())
}

/// Write both sides of `corpus` under `output`
///
/// Creates the output directory when missing. Either both final files are
/// in place when this returns `Ok`, or neither was replaced.
pub fn write_corpus(corpus: &AlignedCorpus, output: &OutputConfig) -> Result<CorpusPaths, StoreError> {
    fs::create_dir_all(&output.output_dir).map_err(|e| StoreError::from_io(&output.output_dir, e))?;

    let paths = CorpusPaths {
        source: output.source_path(),
        target: output.target_path(),
    };
    let partial_source = partial_path(&paths.source);
    let partial_target = partial_path(&paths.target);

    let written = write_pairs(corpus, &partial_source, &partial_target).and_then(|()| {
        debug!("Staged {} lines in {:?} and {:?}", corpus.len(), partial_source, partial_target);
        commit_pair(&paths, &partial_source, &partial_target)
    });
    if let Err(e) = written {
        remove_if_present(&partial_source);
        remove_if_present(&partial_target);
        return Err(e);
    }

    info!("Wrote {} aligned lines:", corpus.len());
    info!("  source: {}", paths.source.display());
    info!("  target: {}", paths.target.display());
    Ok(paths)
}

/// Read every line of a file, without line terminators
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StoreError::from_io(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        let mut line = line.map_err(|e| StoreError::from_io(path, e))?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }

    Ok(lines)
}

/// Read a token file, splitting every line on whitespace
pub fn read_token_lines<P: AsRef<Path>>(path: P) -> Result<Vec<TokenSequence>, StoreError> {
    Ok(read_lines(path)?
        .iter()
        .map(|line| line.split_whitespace().map(str::to_owned).collect())
        .collect())
}
