//! Builder module for constructing aligned parallel corpora
//!
//! This module implements the build pipeline:
//! 1. Decode table rows into verses
//! 2. Filter and normalize each verse
//! 3. Collect retained pairs in lockstep
//! 4. Write the two line-synchronized files

pub mod config;
pub mod table;
pub mod corpus_builder;

pub use config::{CorpusConfig, OutputConfig};
pub use table::{read_verses, Verse};
pub use corpus_builder::{BuildOutcome, BuildStats, CorpusBuilder, CorpusError, SkipReason};
