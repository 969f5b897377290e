//! Text normalization: cleaning and tokenization
//!
//! Every verse passes through two stages before it reaches the corpus files:
//! 1. [`clean`] trims, lower-cases, and drops every character that is neither
//!    a Unicode letter nor whitespace.
//! 2. [`Normalizer::tokenize`] splits the cleaned text into words through a
//!    [`WordSegmenter`], falling back to plain whitespace splitting when the
//!    segmenter cannot run.
//!
//! Letter classes are Unicode-wide (`\p{L}`), so precomposed Greek, Cyrillic
//! and other non-Latin letters survive cleaning. Combining marks (`\p{M}`) are
//! not letters and are removed, which strips decomposed accents as well as the
//! vowel signs and viramas of Indic scripts.

use crate::constants::is_no_verse;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use thiserror::Error;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

/// An ordered sequence of normalized word tokens for one verse
pub type TokenSequence = Vec<String>;

static NON_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\s]").unwrap_or_else(|e| unreachable!("invalid letter-class pattern: {e}"))
});

/// Trim, lower-case, and strip everything except letters and whitespace
///
/// Never fails; the result may be empty.
pub fn clean(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_LETTER.replace_all(&lowered, "").into_owned()
}

/// Raised by a segmenter whose resources (models, dictionaries) are missing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("word segmenter '{name}' is unavailable: {reason}")]
pub struct SegmenterUnavailable {
    /// Segmenter name
    pub name: String,
    /// Why it cannot run
    pub reason: String,
}

/// A language-aware word splitter
pub trait WordSegmenter {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Split `text` into words, or report that the segmenter cannot run
    fn segment(&self, text: &str) -> Result<TokenSequence, SegmenterUnavailable>;
}

/// Word splitting on Unicode word boundaries (UAX #29)
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeWordSegmenter;

impl WordSegmenter for UnicodeWordSegmenter {
    fn name(&self) -> &str {
        "unicode-words"
    }

    fn segment(&self, text: &str) -> Result<TokenSequence, SegmenterUnavailable> {
        Ok(text.unicode_words().map(str::to_owned).collect())
    }
}

/// Outcome of tokenization, recording which path produced the tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenization {
    /// Tokens produced by the configured segmenter
    Segmented(TokenSequence),
    /// Tokens produced by whitespace splitting after the segmenter was unavailable
    Fallback(TokenSequence),
}

impl Tokenization {
    /// The tokens, regardless of which path produced them
    pub fn tokens(&self) -> &[String] {
        match self {
            Tokenization::Segmented(tokens) | Tokenization::Fallback(tokens) => tokens,
        }
    }

    /// Consume and return the tokens
    pub fn into_tokens(self) -> TokenSequence {
        match self {
            Tokenization::Segmented(tokens) | Tokenization::Fallback(tokens) => tokens,
        }
    }

    /// Whether the whitespace fallback was used
    pub fn is_fallback(&self) -> bool {
        matches!(self, Tokenization::Fallback(_))
    }

    /// Whether no tokens were produced
    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }
}

/// Cleans and tokenizes verse text with a chosen segmenter
pub struct Normalizer<S = UnicodeWordSegmenter> {
    segmenter: S,
    warned_fallback: Cell<bool>,
}

impl Normalizer {
    /// Create a normalizer using Unicode word boundaries
    pub fn new() -> Self {
        Self::with_segmenter(UnicodeWordSegmenter)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WordSegmenter> Normalizer<S> {
    /// Create a normalizer around `segmenter`
    pub fn with_segmenter(segmenter: S) -> Self {
        Self {
            segmenter,
            warned_fallback: Cell::new(false),
        }
    }

    /// See [`clean`]
    pub fn clean(&self, text: &str) -> String {
        clean(text)
    }

    /// Split text into tokens
    ///
    /// Empty, whitespace-only, and "no verse" inputs yield an empty
    /// [`Tokenization::Segmented`] without touching the segmenter.
    pub fn tokenize(&self, text: &str) -> Tokenization {
        if text.trim().is_empty() || is_no_verse(text) {
            return Tokenization::Segmented(Vec::new());
        }

        match self.segmenter.segment(text) {
            Ok(tokens) => Tokenization::Segmented(tokens),
            Err(e) => {
                if !self.warned_fallback.replace(true) {
                    warn!("{e}; falling back to whitespace tokenization");
                }
                Tokenization::Fallback(text.split_whitespace().map(str::to_owned).collect())
            }
        }
    }
}

/// Tokenize with the default Unicode word segmenter
pub fn tokenize(text: &str) -> TokenSequence {
    Normalizer::new().tokenize(text).into_tokens()
}
