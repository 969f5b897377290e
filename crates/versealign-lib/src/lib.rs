// versealign: line-synchronized parallel corpora and word-alignment inspection
//
// Builds cleaned, tokenized source/target corpora for an external word
// aligner and inspects the aligner's output verse by verse.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod normalizer;
pub mod store;
pub mod links;
pub mod builder;
pub mod inspect;
pub mod sync_check;

// Re-export common types at crate root
pub use normalizer::{clean, tokenize, Normalizer, TokenSequence, Tokenization, UnicodeWordSegmenter, WordSegmenter};
pub use store::{read_lines, read_token_lines, write_corpus, AlignedCorpus, CorpusPaths, StoreError};
pub use links::{parse_links, AlignmentLinkSet, LinkParseError};
pub use builder::{BuildOutcome, BuildStats, CorpusBuilder, CorpusConfig, CorpusError, OutputConfig, SkipReason, Verse};
pub use inspect::{inspect, inspect_lines, InspectError, Report, WordLink};
pub use sync_check::{check_alignment_files, SyncReport, VerseProblem};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}
