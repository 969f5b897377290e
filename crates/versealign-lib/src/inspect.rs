//! Verse-level alignment inspection
//!
//! Rebuilds the word-to-word links of one verse from three line files
//! (source tokens, target tokens, alignment pairs) and renders them:
//!
//! ```text
//! Source : the cat sat
//! Target : le chat assis
//!  src: 'the'  ->  trgt: ['le']
//!  src: 'cat'  ->  trgt: ['chat']
//!  src: 'sat'  ->  trgt: ['assis']
//! ```
//!
//! Line `N` is assumed to be the same verse in all three files; the corpus
//! builder writes them that way. Only the requested index is checked here.

use crate::links::{parse_links, LinkParseError};
use crate::store::{read_lines, StoreError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors raised while inspecting one verse
#[derive(Error, Debug)]
pub enum InspectError {
    /// One of the three files is missing
    #[error("Could not find file {}", path.display())]
    FileNotFound {
        /// Missing file
        path: PathBuf,
    },
    /// The verse index is past the end of the source file
    #[error("Index {index} is out of bounds.")]
    OutOfBounds {
        /// Requested verse
        index: usize,
        /// Number of source lines
        len: usize,
    },
    /// The target or alignment file is shorter than the source file
    #[error("{} has {len} lines, no line for verse {index}", path.display())]
    MissingLine {
        /// Short file
        path: PathBuf,
        /// Requested verse
        index: usize,
        /// Lines in that file
        len: usize,
    },
    /// An alignment pair references a target token that does not exist
    #[error("source token {source_index} links to target token {target_index}, but the target has only {len} tokens")]
    TargetIndexOutOfRange {
        /// Linked source token
        source_index: usize,
        /// Offending target index
        target_index: usize,
        /// Number of target tokens
        len: usize,
    },
    /// The alignment line is malformed
    #[error("malformed alignment line for verse {index}: {source}")]
    Links {
        /// Verse whose line failed to parse
        index: usize,
        /// Parse failure
        #[source]
        source: LinkParseError,
    },
    /// Any other read failure
    #[error(transparent)]
    Io(StoreError),
}

impl InspectError {
    /// Whether this is a user-facing condition (missing file, bad index)
    /// rather than corrupted data
    pub fn is_reportable(&self) -> bool {
        matches!(self, InspectError::FileNotFound { .. } | InspectError::OutOfBounds { .. })
    }
}

impl From<StoreError> for InspectError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => InspectError::FileNotFound { path },
            other => InspectError::Io(other),
        }
    }
}

/// One linked source word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLink {
    /// Position in the source sentence
    pub source_index: usize,
    /// The source word
    pub source_word: String,
    /// Linked target words, in alignment order
    pub target_words: Vec<String>,
}

/// Rendered view of one verse's alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Verse index
    pub verse_index: usize,
    /// Source tokens joined by single spaces
    pub source_line: String,
    /// Target tokens joined by single spaces
    pub target_line: String,
    /// Linked source words in source order; empty when nothing aligned
    pub links: Vec<WordLink>,
}

impl Report {
    /// Whether any source word in the sentence has a link
    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }

    /// Compose the report text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Source : {}", self.source_line)?;
        writeln!(f, "Target : {}", self.target_line)?;

        if self.links.is_empty() {
            return writeln!(f, "No alignments found for this sentence.");
        }
        for link in &self.links {
            let targets: Vec<String> = link.target_words.iter().map(|w| format!("'{w}'")).collect();
            writeln!(f, " src: '{}'  ->  trgt: [{}]", link.source_word, targets.join(", "))?;
        }
        Ok(())
    }
}

fn line_at<'a>(lines: &'a [String], index: usize, path: &Path) -> Result<&'a str, InspectError> {
    lines
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| InspectError::MissingLine {
            path: path.to_path_buf(),
            index,
            len: lines.len(),
        })
}

/// Build the report for `verse_index` from already-loaded lines
///
/// `paths` names the target and alignment files in `MissingLine` errors.
pub fn inspect_lines(
    source_lines: &[String],
    target_lines: &[String],
    align_lines: &[String],
    verse_index: usize,
    paths: (&Path, &Path),
) -> Result<Report, InspectError> {
    if verse_index >= source_lines.len() {
        return Err(InspectError::OutOfBounds {
            index: verse_index,
            len: source_lines.len(),
        });
    }

    let source_words: Vec<&str> = source_lines[verse_index].split_whitespace().collect();
    let target_words: Vec<&str> = line_at(target_lines, verse_index, paths.0)?.split_whitespace().collect();
    let links = parse_links(line_at(align_lines, verse_index, paths.1)?).map_err(|source| InspectError::Links {
        index: verse_index,
        source,
    })?;

    if let Some(max) = links.max_source_index().filter(|&max| max >= source_words.len()) {
        warn!(
            "Verse {}: alignment references source token {} but the source has {} tokens",
            verse_index,
            max,
            source_words.len()
        );
    }

    let mut word_links = Vec::new();
    for (source_index, source_word) in source_words.iter().enumerate() {
        let Some(targets) = links.targets(source_index) else {
            continue;
        };
        let linked_words = targets
            .iter()
            .map(|&target_index| {
                target_words
                    .get(target_index)
                    .map(|w| (*w).to_string())
                    .ok_or_else(|| InspectError::TargetIndexOutOfRange {
                        source_index,
                        target_index,
                        len: target_words.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        word_links.push(WordLink {
            source_index,
            source_word: (*source_word).to_string(),
            target_words: linked_words,
        });
    }

    Ok(Report {
        verse_index,
        source_line: source_words.join(" "),
        target_line: target_words.join(" "),
        links: word_links,
    })
}

/// Read the three files and build the report for `verse_index`
///
/// All three files are read before anything is rendered, so a missing file
/// produces no partial output.
pub fn inspect<P, Q, R>(source_path: P, target_path: Q, align_path: R, verse_index: usize) -> Result<Report, InspectError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let (source_path, target_path, align_path) = (source_path.as_ref(), target_path.as_ref(), align_path.as_ref());

    let source_lines = read_lines(source_path)?;
    let target_lines = read_lines(target_path)?;
    let align_lines = read_lines(align_path)?;

    inspect_lines(&source_lines, &target_lines, &align_lines, verse_index, (target_path, align_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(source: &[&str], target: &[&str], align: &[&str], index: usize) -> Result<Report, InspectError> {
        inspect_lines(
            &lines(source),
            &lines(target),
            &lines(align),
            index,
            (Path::new("target.txt"), Path::new("align.txt")),
        )
    }

    #[test]
    fn test_one_to_one_links() {
        let report = run(&["the cat sat"], &["le chat assis"], &["0-0 1-1 2-2"], 0).unwrap();
        assert_eq!(report.source_line, "the cat sat");
        assert_eq!(report.target_line, "le chat assis");
        assert_eq!(report.links.len(), 3);
        assert_eq!(report.links[0].source_word, "the");
        assert_eq!(report.links[0].target_words, vec!["le"]);
        assert_eq!(report.links[1].target_words, vec!["chat"]);
        assert_eq!(report.links[2].target_words, vec!["assis"]);
    }

    #[test]
    fn test_render_format() {
        let report = run(&["the cat"], &["le chat"], &["0-0 1-1 1-0"], 0).unwrap();
        assert_eq!(
            report.render(),
            "\nSource : the cat\nTarget : le chat\n src: 'the'  ->  trgt: ['le']\n src: 'cat'  ->  trgt: ['chat', 'le']\n"
        );
    }

    #[test]
    fn test_unaligned_words_are_omitted() {
        let report = run(&["a b c"], &["x y"], &["2-1"], 0).unwrap();
        assert_eq!(report.links.len(), 1);
        assert_eq!(report.links[0].source_index, 2);
        assert_eq!(report.links[0].target_words, vec!["y"]);
    }

    #[test]
    fn test_empty_alignment_line() {
        let report = run(&["the cat", "a dog"], &["le chat", "un chien"], &["0-0", ""], 1).unwrap();
        assert!(!report.has_links());
        let text = report.render();
        assert!(text.contains("Source : a dog"));
        assert!(text.contains("Target : un chien"));
        assert!(text.contains("No alignments found for this sentence."));
    }

    #[test]
    fn test_out_of_bounds() {
        let err = run(&["the cat"], &["le chat"], &["0-0"], 1).unwrap_err();
        assert!(matches!(err, InspectError::OutOfBounds { index: 1, len: 1 }));
        assert!(err.is_reportable());
        assert_eq!(err.to_string(), "Index 1 is out of bounds.");
    }

    #[test]
    fn test_target_index_out_of_range_propagates() {
        let err = run(&["the cat"], &["le"], &["0-0 1-3"], 0).unwrap_err();
        assert!(matches!(
            err,
            InspectError::TargetIndexOutOfRange {
                source_index: 1,
                target_index: 3,
                len: 1
            }
        ));
        assert!(!err.is_reportable());
    }

    #[test]
    fn test_malformed_alignment_propagates() {
        let err = run(&["the"], &["le"], &["0:0"], 0).unwrap_err();
        assert!(matches!(err, InspectError::Links { index: 0, .. }));
    }

    #[test]
    fn test_short_alignment_file() {
        let err = run(&["a", "b"], &["x", "y"], &["0-0"], 1).unwrap_err();
        match err {
            InspectError::MissingLine { path, index, len } => {
                assert_eq!(path, PathBuf::from("align.txt"));
                assert_eq!((index, len), (1, 1));
            }
            other => panic!("expected MissingLine, got {other:?}"),
        }
    }

    #[test]
    fn test_source_keys_past_sentence_are_ignored() {
        let report = run(&["a"], &["x y"], &["0-1 5-0"], 0).unwrap();
        assert_eq!(report.links.len(), 1);
        assert_eq!(report.links[0].target_words, vec!["y"]);
    }
}
