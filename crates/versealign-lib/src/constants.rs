//! Constants shared by the corpus builder and the alignment inspector
//!
//! File naming, default locations, and the placeholder value that marks
//! an intentionally absent verse.

/// Placeholder marking an intentionally absent verse (compared case-insensitively)
pub const NO_VERSE_SENTINEL: &str = "<no verse>";

/// Default directory for the aligned corpus files
pub const DEFAULT_OUTPUT_DIR: &str = "data/aligned";

/// Default filename prefix for the aligned corpus files
pub const DEFAULT_PREFIX: &str = "";

/// Suffix of the source-side corpus file (`{prefix}source.txt`)
pub const SOURCE_FILE_SUFFIX: &str = "source.txt";

/// Suffix of the target-side corpus file (`{prefix}target.txt`)
pub const TARGET_FILE_SUFFIX: &str = "target.txt";

/// Extension appended to an output file while it is being written
pub const PARTIAL_FILE_EXTENSION: &str = "tmp";

/// Extension of the previous output file kept while the new pair is swapped in
pub const BACKUP_FILE_EXTENSION: &str = "bak";

/// Separator between the two halves of an alignment pair (`3-5`)
pub const LINK_SEPARATOR: char = '-';

/// Maximum number of per-verse problems kept by a synchronization check
pub const MAX_REPORTED_PROBLEMS: usize = 20;

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check whether a raw field is the "no verse" placeholder
#[inline]
pub fn is_no_verse(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(NO_VERSE_SENTINEL)
}
