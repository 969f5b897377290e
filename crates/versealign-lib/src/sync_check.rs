//! Synchronization check across source, target, and alignment files
//!
//! Validates what the inspector otherwise takes on trust: all three files
//! have the same number of lines, every alignment line parses, and every
//! link stays inside its verse.

use crate::constants::MAX_REPORTED_PROBLEMS;
use crate::inspect::InspectError;
use crate::links::{parse_links, LinkParseError};
use crate::store::read_lines;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// A consistency problem found in one verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseProblem {
    /// The alignment line does not parse
    Malformed {
        /// Verse index
        verse: usize,
        /// Parse failure
        error: LinkParseError,
    },
    /// A link points past the end of the source sentence
    SourceOutOfRange {
        /// Verse index
        verse: usize,
        /// Offending source index
        index: usize,
        /// Source token count
        len: usize,
    },
    /// A link points past the end of the target sentence
    TargetOutOfRange {
        /// Verse index
        verse: usize,
        /// Offending target index
        index: usize,
        /// Target token count
        len: usize,
    },
}

impl fmt::Display for VerseProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseProblem::Malformed { verse, error } => write!(f, "verse {verse}: {error}"),
            VerseProblem::SourceOutOfRange { verse, index, len } => {
                write!(f, "verse {verse}: source index {index} >= {len} source tokens")
            }
            VerseProblem::TargetOutOfRange { verse, index, len } => {
                write!(f, "verse {verse}: target index {index} >= {len} target tokens")
            }
        }
    }
}

/// Result of checking three line files against each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Line counts of the source, target, and alignment files
    pub line_counts: [usize; 3],
    /// Verses checked (the shortest file's length)
    pub verses_checked: usize,
    /// Total alignment pairs seen
    pub total_links: usize,
    /// Number of verses with at least one problem
    pub problem_verses: usize,
    /// First problems found, capped at [`MAX_REPORTED_PROBLEMS`]
    pub problems: Vec<VerseProblem>,
}

impl SyncReport {
    /// Whether all three files have the same number of lines
    pub fn counts_match(&self) -> bool {
        self.line_counts.iter().all(|&n| n == self.line_counts[0])
    }

    /// Whether the files are fully consistent
    pub fn is_consistent(&self) -> bool {
        self.counts_match() && self.problem_verses == 0
    }

    fn record(&mut self, problem: VerseProblem) {
        if self.problems.len() < MAX_REPORTED_PROBLEMS {
            self.problems.push(problem);
        }
    }

    /// Log the summary via tracing
    pub fn print_summary(&self) {
        info!("Synchronization Check:");
        info!(
            "  lines: source = {}, target = {}, alignment = {}",
            self.line_counts[0], self.line_counts[1], self.line_counts[2]
        );
        info!("  verses checked = {}", self.verses_checked);
        info!("  total links = {}", self.total_links);
        info!("  verses with problems = {}", self.problem_verses);
    }
}

/// Check verse-by-verse consistency of already-loaded lines
pub fn check_lines(source_lines: &[String], target_lines: &[String], align_lines: &[String]) -> SyncReport {
    let mut report = SyncReport {
        line_counts: [source_lines.len(), target_lines.len(), align_lines.len()],
        ..SyncReport::default()
    };
    report.verses_checked = report.line_counts.iter().copied().min().unwrap_or(0);

    for verse in 0..report.verses_checked {
        let source_len = source_lines[verse].split_whitespace().count();
        let target_len = target_lines[verse].split_whitespace().count();

        let links = match parse_links(&align_lines[verse]) {
            Ok(links) => links,
            Err(error) => {
                report.problem_verses += 1;
                report.record(VerseProblem::Malformed { verse, error });
                continue;
            }
        };
        report.total_links += links.num_links();

        let mut bad = false;
        if let Some(index) = links.max_source_index().filter(|&i| i >= source_len) {
            report.record(VerseProblem::SourceOutOfRange {
                verse,
                index,
                len: source_len,
            });
            bad = true;
        }
        if let Some(index) = links.max_target_index().filter(|&i| i >= target_len) {
            report.record(VerseProblem::TargetOutOfRange {
                verse,
                index,
                len: target_len,
            });
            bad = true;
        }
        if bad {
            debug!("Verse {} has out-of-range links", verse);
            report.problem_verses += 1;
        }
    }

    report
}

/// Read the three files and check them against each other
pub fn check_alignment_files<P, Q, R>(source_path: P, target_path: Q, align_path: R) -> Result<SyncReport, InspectError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let source_lines = read_lines(source_path)?;
    let target_lines = read_lines(target_path)?;
    let align_lines = read_lines(align_path)?;

    Ok(check_lines(&source_lines, &target_lines, &align_lines))
}
