//! Alignment-pair parsing
//!
//! An aligner emits one line per verse in Pharaoh notation:
//!
//! ```text
//! 0-0 1-2 2-1 1-0
//! ```
//!
//! Each `i-j` token links source token `i` to target token `j`. A source
//! index may appear several times (fan-out); every occurrence appends one
//! target index to that key, in the order the pairs appear.

use crate::constants::LINK_SEPARATOR;
use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// A malformed alignment pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkParseError {
    /// The token has no `-` separator
    #[error("alignment pair '{token}' has no '-' separator")]
    MissingSeparator {
        /// Offending token
        token: String,
    },
    /// One half of the token is not a non-negative integer
    #[error("alignment pair '{token}' has a non-integer index: {source}")]
    InvalidIndex {
        /// Offending token
        token: String,
        /// Integer parse failure
        #[source]
        source: ParseIntError,
    },
}

/// Source-token index to ordered target-token indices, for one verse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentLinkSet {
    links: BTreeMap<usize, Vec<usize>>,
}

impl AlignmentLinkSet {
    /// Create an empty link set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one `source -> target` link after any existing links for `source`
    pub fn insert(&mut self, source: usize, target: usize) {
        self.links.entry(source).or_default().push(target);
    }

    /// Target indices linked to `source`, in insertion order
    pub fn targets(&self, source: usize) -> Option<&[usize]> {
        self.links.get(&source).map(Vec::as_slice)
    }

    /// Whether `source` has any link
    pub fn contains(&self, source: usize) -> bool {
        self.links.contains_key(&source)
    }

    /// Number of distinct source indices
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether there are no links at all
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Total number of `i-j` pairs
    pub fn num_links(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    /// Largest linked source index
    pub fn max_source_index(&self) -> Option<usize> {
        self.links.keys().next_back().copied()
    }

    /// Largest linked target index
    pub fn max_target_index(&self) -> Option<usize> {
        self.links.values().flatten().max().copied()
    }

    /// Iterate `(source, targets)` in ascending source order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.links.iter().map(|(&s, t)| (s, t.as_slice()))
    }
}

fn parse_index(half: &str, token: &str) -> Result<usize, LinkParseError> {
    half.parse::<usize>().map_err(|source| LinkParseError::InvalidIndex {
        token: token.to_string(),
        source,
    })
}

/// Parse one verse's alignment string
///
/// An empty or whitespace-only string yields an empty set. A malformed token
/// is an error; nothing is skipped.
pub fn parse_links(align: &str) -> Result<AlignmentLinkSet, LinkParseError> {
    let mut links = AlignmentLinkSet::new();

    for token in align.split_whitespace() {
        let (s, t) = token
            .split_once(LINK_SEPARATOR)
            .ok_or_else(|| LinkParseError::MissingSeparator {
                token: token.to_string(),
            })?;
        links.insert(parse_index(s, token)?, parse_index(t, token)?);
    }

    Ok(links)
}

impl FromStr for AlignmentLinkSet {
    type Err = LinkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_links(s)
    }
}

impl fmt::Display for AlignmentLinkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (source, targets) in self.iter() {
            for target in targets {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{source}{LINK_SEPARATOR}{target}")?;
                first = false;
            }
        }
        Ok(())
    }
}
