//! Corpus builder orchestration
//!
//! Coordinates the pipeline that turns a parallel table into two
//! line-synchronized token files:
//! 1. Read the table into verses
//! 2. Filter, clean, and tokenize every verse (skips are counted by reason)
//! 3. Collect retained pairs into an [`AlignedCorpus`]
//! 4. Write both files as a pair

use crate::{
    builder::{
        config::CorpusConfig,
        table::{read_verses, Verse},
    },
    constants::is_no_verse,
    normalizer::{Normalizer, TokenSequence, UnicodeWordSegmenter, WordSegmenter},
    store::{write_corpus, AlignedCorpus, CorpusPaths, StoreError},
};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal errors while building a corpus
///
/// Row-level problems never show up here; they are counted in [`BuildStats`].
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The tabular input does not exist
    #[error("could not find table {}", path.display())]
    TableNotFound {
        /// Missing table
        path: PathBuf,
    },
    /// A configured column is not in the header row
    #[error("column '{column}' not found in {}", path.display())]
    MissingColumn {
        /// Requested column
        column: String,
        /// Table that was searched
        path: PathBuf,
    },
    /// The table could not be read
    #[error("failed to read table {}: {source}", path.display())]
    Table {
        /// Table being read
        path: PathBuf,
        /// Reader failure
        #[source]
        source: csv::Error,
    },
    /// The configuration is invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The output files could not be written
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a row was dropped, in the order the checks are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A field is absent
    Missing,
    /// A field is the "no verse" placeholder
    Sentinel,
    /// A field is empty after trimming
    Empty,
    /// A field has no letters left after cleaning
    EmptyAfterCleaning,
    /// A field produced no tokens
    EmptyAfterTokenization,
}

impl SkipReason {
    /// All reasons, in check order
    pub const ALL: [SkipReason; 5] = [
        SkipReason::Missing,
        SkipReason::Sentinel,
        SkipReason::Empty,
        SkipReason::EmptyAfterCleaning,
        SkipReason::EmptyAfterTokenization,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Missing => "missing field",
            SkipReason::Sentinel => "no-verse placeholder",
            SkipReason::Empty => "empty field",
            SkipReason::EmptyAfterCleaning => "empty after cleaning",
            SkipReason::EmptyAfterTokenization => "empty after tokenization",
        })
    }
}

/// Counters for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Rows read from the input
    pub rows_seen: usize,
    /// Pairs kept in the corpus
    pub pairs_retained: usize,
    skipped: [usize; SkipReason::ALL.len()],
}

impl BuildStats {
    /// Total rows dropped
    pub fn rows_skipped(&self) -> usize {
        self.skipped.iter().sum()
    }

    /// Rows dropped for one reason
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped[reason.slot()]
    }

    fn record_skip(&mut self, reason: SkipReason) {
        self.skipped[reason.slot()] += 1;
    }

    /// Log the summary via tracing
    pub fn print_summary(&self) {
        info!("Corpus Summary:");
        info!("  rows seen = {}", self.rows_seen);
        info!("  pairs retained = {}", self.pairs_retained);
        info!("  rows skipped = {}", self.rows_skipped());
        for reason in SkipReason::ALL {
            let count = self.skipped_for(reason);
            if count > 0 {
                info!("    {}: {}", reason, count);
            }
        }
    }
}

/// Result of [`CorpusBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Retained pairs in input order
    pub corpus: AlignedCorpus,
    /// Row accounting
    pub stats: BuildStats,
}

/// Builder for constructing line-synchronized parallel corpora
pub struct CorpusBuilder<S = UnicodeWordSegmenter> {
    normalizer: Normalizer<S>,
}

impl CorpusBuilder {
    /// Create a builder with the default normalizer
    pub fn new() -> Self {
        Self::with_normalizer(Normalizer::new())
    }
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WordSegmenter> CorpusBuilder<S> {
    /// Create a builder around a normalizer
    pub fn with_normalizer(normalizer: Normalizer<S>) -> Self {
        Self { normalizer }
    }

    /// Apply the row policy to one verse
    ///
    /// The first failing check decides the skip reason.
    pub fn prepare_verse(&self, verse: &Verse) -> Result<(TokenSequence, TokenSequence), SkipReason> {
        let (Some(source), Some(target)) = (verse.source_text.as_deref(), verse.target_text.as_deref()) else {
            return Err(SkipReason::Missing);
        };
        if is_no_verse(source) || is_no_verse(target) {
            return Err(SkipReason::Sentinel);
        }
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(SkipReason::Empty);
        }

        let source = self.normalizer.clean(source);
        let target = self.normalizer.clean(target);
        if source.is_empty() || target.is_empty() {
            return Err(SkipReason::EmptyAfterCleaning);
        }

        let source_tokens = self.normalizer.tokenize(&source).into_tokens();
        let target_tokens = self.normalizer.tokenize(&target).into_tokens();
        if source_tokens.is_empty() || target_tokens.is_empty() {
            return Err(SkipReason::EmptyAfterTokenization);
        }

        Ok((source_tokens, target_tokens))
    }

    /// Build an aligned corpus from verses, keeping retained rows in order
    pub fn build<I>(&self, verses: I) -> BuildOutcome
    where
        I: IntoIterator<Item = Verse>,
    {
        let mut outcome = BuildOutcome::default();

        for (row, verse) in verses.into_iter().enumerate() {
            outcome.stats.rows_seen += 1;
            match self.prepare_verse(&verse) {
                Ok((source, target)) => {
                    outcome.corpus.push(source, target);
                    outcome.stats.pairs_retained += 1;
                }
                Err(reason) => {
                    debug!("Skipping row {}: {}", row, reason);
                    outcome.stats.record_skip(reason);
                }
            }
        }

        outcome.stats.print_summary();
        outcome
    }

    /// Read the configured table, build the corpus, and write both files
    pub fn build_from_table(&self, config: &CorpusConfig) -> Result<(BuildOutcome, CorpusPaths), CorpusError> {
        config.validate().map_err(CorpusError::InvalidConfig)?;
        config.print();

        info!("Step 1: Reading table...");
        let verses = read_verses(config)?;
        info!("  Read {} rows", verses.len());

        info!("Step 2: Normalizing verses...");
        let outcome = self.build(verses);

        info!("Step 3: Writing aligned corpus...");
        let paths = write_corpus(&outcome.corpus, &config.output)?;

        Ok((outcome, paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::SegmenterUnavailable;

    struct NoDictionary;

    impl WordSegmenter for NoDictionary {
        fn name(&self) -> &str {
            "dictionary"
        }

        fn segment(&self, _text: &str) -> Result<TokenSequence, SegmenterUnavailable> {
            Err(SegmenterUnavailable {
                name: self.name().to_string(),
                reason: "dictionary not installed".to_string(),
            })
        }
    }

    fn verse(source: Option<&str>, target: Option<&str>) -> Verse {
        Verse {
            source_text: source.map(str::to_string),
            target_text: target.map(str::to_string),
        }
    }

    #[test]
    fn test_policy_order() {
        let builder = CorpusBuilder::new();
        let check = |s, t| builder.prepare_verse(&verse(s, t)).unwrap_err();

        assert_eq!(check(None, Some("<no verse>")), SkipReason::Missing);
        assert_eq!(check(Some("<No Verse>"), Some("")), SkipReason::Sentinel);
        assert_eq!(check(Some("   "), Some("hello")), SkipReason::Empty);
        assert_eq!(check(Some("123!!"), Some("hello")), SkipReason::EmptyAfterCleaning);
        assert_eq!(check(Some("hello"), Some("1:1 —")), SkipReason::EmptyAfterTokenization);
    }

    #[test]
    fn test_prepare_keeps_tokens() {
        let builder = CorpusBuilder::new();
        let (source, target) = builder
            .prepare_verse(&Verse::new("In the beginning, God.", "Au commencement, Dieu."))
            .unwrap();
        assert_eq!(source, vec!["in", "the", "beginning", "god"]);
        assert_eq!(target, vec!["au", "commencement", "dieu"]);
    }

    #[test]
    fn test_build_counts_and_order() {
        let builder = CorpusBuilder::new();
        let rows = vec![
            Verse::new("one", "uno"),
            verse(None, Some("dos")),
            Verse::new("<no verse>", "tres"),
            Verse::new("four", "cuatro"),
            Verse::new("", "cinco"),
            Verse::new("six", "seis"),
        ];
        let total = rows.len();

        let outcome = builder.build(rows);
        let stats = &outcome.stats;
        assert_eq!(stats.rows_seen, total);
        assert_eq!(stats.pairs_retained, 3);
        assert_eq!(stats.rows_skipped(), 3);
        assert_eq!(outcome.corpus.len() + stats.rows_skipped(), total);
        assert_eq!(stats.skipped_for(SkipReason::Missing), 1);
        assert_eq!(stats.skipped_for(SkipReason::Sentinel), 1);
        assert_eq!(stats.skipped_for(SkipReason::Empty), 1);

        let sources: Vec<_> = outcome.corpus.source_sequences().iter().map(|t| t.join(" ")).collect();
        let targets: Vec<_> = outcome.corpus.target_sequences().iter().map(|t| t.join(" ")).collect();
        assert_eq!(sources, vec!["one", "four", "six"]);
        assert_eq!(targets, vec!["uno", "cuatro", "seis"]);
    }

    #[test]
    fn test_build_keeps_rows_when_segmenter_unavailable() {
        let builder = CorpusBuilder::with_normalizer(Normalizer::with_segmenter(NoDictionary));
        let rows = vec![
            Verse::new("In the beginning.", "Au  commencement."),
            Verse::new("<no verse>", "rien"),
            Verse::new("God said", "Dieu dit"),
        ];

        let outcome = builder.build(rows);
        assert_eq!(outcome.stats.pairs_retained, 2);
        assert_eq!(outcome.stats.skipped_for(SkipReason::Sentinel), 1);
        assert_eq!(outcome.stats.skipped_for(SkipReason::EmptyAfterTokenization), 0);

        let pairs: Vec<_> = outcome.corpus.pairs().collect();
        assert_eq!(pairs[0].0, &["in", "the", "beginning"]);
        assert_eq!(pairs[0].1, &["au", "commencement"]);
        assert_eq!(pairs[1].0, &["god", "said"]);
        assert_eq!(pairs[1].1, &["dieu", "dit"]);
    }

    #[test]
    fn test_build_empty_input() {
        let outcome = CorpusBuilder::new().build(Vec::new());
        assert!(outcome.corpus.is_empty());
        assert_eq!(outcome.stats, BuildStats::default());
    }
}
