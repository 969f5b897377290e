//! Tabular input decoding
//!
//! Reads a delimited file with a header row and decodes every data row into
//! a typed [`Verse`]. Blank cells and rows too short to reach a column
//! decode as `None`, the same way spreadsheet readers surface empty cells as
//! null. Cells that are not valid UTF-8 are decoded lossily rather than
//! failing the whole table.

use crate::builder::config::CorpusConfig;
use crate::builder::corpus_builder::CorpusError;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::debug;

/// One row of a parallel corpus, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verse {
    /// Source-language text, `None` when the cell is absent
    pub source_text: Option<String>,
    /// Target-language text, `None` when the cell is absent
    pub target_text: Option<String>,
}

impl Verse {
    /// Build a verse from two present fields
    pub fn new(source_text: &str, target_text: &str) -> Self {
        Self {
            source_text: Some(source_text.to_string()),
            target_text: Some(target_text.to_string()),
        }
    }
}

fn decode_cell(record: &ByteRecord, column: usize) -> Option<String> {
    record
        .get(column)
        .filter(|cell| !cell.is_empty())
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
}

fn find_column(headers: &ByteRecord, name: &str, path: &Path) -> Result<usize, CorpusError> {
    headers
        .iter()
        .position(|header| {
            let header = String::from_utf8_lossy(header);
            header.trim_start_matches('\u{feff}').trim() == name.trim()
        })
        .ok_or_else(|| CorpusError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

/// Read all rows of the configured table as verses, in file order
///
/// # Errors
/// Returns error if:
/// - The table file does not exist (`TableNotFound`)
/// - Either configured column is not in the header row (`MissingColumn`)
/// - The file cannot be read
pub fn read_verses(config: &CorpusConfig) -> Result<Vec<Verse>, CorpusError> {
    let path = config.table_path.as_path();

    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CorpusError::TableNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CorpusError::Table {
                path: path.to_path_buf(),
                source: e.into(),
            }
        }
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.effective_delimiter())
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let table_error = |source: csv::Error| CorpusError::Table {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.byte_headers().map_err(table_error)?.clone();
    let source_column = find_column(&headers, &config.source_col, path)?;
    let target_column = find_column(&headers, &config.target_col, path)?;
    debug!("Columns: source #{}, target #{}", source_column, target_column);

    let mut verses = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(table_error)?;
        verses.push(Verse {
            source_text: decode_cell(&record, source_column),
            target_text: decode_cell(&record, target_column),
        });
    }

    Ok(verses)
}
