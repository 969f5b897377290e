//! Integration tests for the corpus and inspection pipelines
//!
//! These tests run the full path from a tabular file to the two corpus
//! files, then inspect alignments written alongside them.

use anyhow::Result;
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use versealign_lib::{
    check_alignment_files, inspect, read_token_lines, CorpusBuilder, CorpusConfig, CorpusError, InspectError,
    OutputConfig, SkipReason,
};

fn write_table(dir: &TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path)?;
    write!(file, "{contents}")?;
    file.flush()?;
    Ok(path)
}

#[test]
fn test_table_to_corpus_files() -> Result<()> {
    let dir = TempDir::new()?;
    let table = write_table(
        &dir,
        "verses.csv",
        "ref,greek,english\n\
         JHN 1:1,\"Ἐν ἀρχῇ ἦν ὁ λόγος,\",In the beginning was the Word.\n\
         JHN 1:2,<no verse>,He was with God.\n\
         JHN 1:3,,All things were made\n\
         JHN 1:4,ἐν αὐτῷ ζωὴ ἦν,In him was life!\n\
         JHN 1:5,123,456\n",
    )?;

    let mut config = CorpusConfig::new(&table, "greek", "english").map_err(anyhow::Error::msg)?;
    config.output = OutputConfig {
        output_dir: dir.path().join("aligned"),
        prefix: "jhn_".to_string(),
    };

    let (outcome, paths) = CorpusBuilder::new().build_from_table(&config)?;
    let stats = &outcome.stats;
    assert_eq!(stats.rows_seen, 5);
    assert_eq!(stats.pairs_retained, 2);
    assert_eq!(stats.rows_skipped(), 3);
    assert_eq!(stats.skipped_for(SkipReason::Sentinel), 1);
    assert_eq!(stats.skipped_for(SkipReason::Missing), 1);
    assert_eq!(stats.skipped_for(SkipReason::EmptyAfterCleaning), 1);

    assert_eq!(paths.source, dir.path().join("aligned").join("jhn_source.txt"));
    assert_eq!(fs::read_to_string(&paths.source)?, "ἐν ἀρχῇ ἦν ὁ λόγος\nἐν αὐτῷ ζωὴ ἦν\n");
    assert_eq!(fs::read_to_string(&paths.target)?, "in the beginning was the word\nin him was life\n");

    let source = read_token_lines(&paths.source)?;
    let target = read_token_lines(&paths.target)?;
    assert_eq!(source.len(), target.len());
    assert_eq!(source, outcome.corpus.source_sequences());
    assert_eq!(target, outcome.corpus.target_sequences());
    Ok(())
}

#[test]
fn test_missing_table_is_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let config = CorpusConfig::new(dir.path().join("absent.csv"), "a", "b").map_err(anyhow::Error::msg)?;

    let err = CorpusBuilder::new().build_from_table(&config).unwrap_err();
    assert!(matches!(err, CorpusError::TableNotFound { .. }));
    Ok(())
}

#[test]
fn test_build_then_inspect() -> Result<()> {
    let dir = TempDir::new()?;
    let table = write_table(&dir, "pairs.tsv", "en\tfr\nThe cat sat.\tLe chat assis.\nA dog.\tUn chien.\n")?;

    let mut config = CorpusConfig::new(&table, "en", "fr").map_err(anyhow::Error::msg)?;
    config.output.output_dir = dir.path().to_path_buf();
    let (_, paths) = CorpusBuilder::new().build_from_table(&config)?;

    let align = dir.path().join("align.txt");
    fs::write(&align, "0-0 1-1 2-2\n\n")?;

    let report = inspect(&paths.source, &paths.target, &align, 0)?;
    let rendered = report.render();
    assert!(rendered.contains(" src: 'the'  ->  trgt: ['le']"));
    assert!(rendered.contains(" src: 'cat'  ->  trgt: ['chat']"));
    assert!(rendered.contains(" src: 'sat'  ->  trgt: ['assis']"));

    let report = inspect(&paths.source, &paths.target, &align, 1)?;
    assert!(!report.has_links());
    assert!(report.render().contains("Source : a dog"));
    assert!(report.render().contains("Target : un chien"));
    assert!(report.render().contains("No alignments found for this sentence."));

    let err = inspect(&paths.source, &paths.target, &align, 2).unwrap_err();
    assert!(matches!(err, InspectError::OutOfBounds { index: 2, len: 2 }));

    let sync = check_alignment_files(&paths.source, &paths.target, &align)?;
    assert!(sync.is_consistent());
    assert_eq!(sync.total_links, 3);
    Ok(())
}

#[test]
fn test_inspect_missing_file_names_it() -> Result<()> {
    let dir = TempDir::new()?;
    let source = dir.path().join("source.txt");
    let target = dir.path().join("target.txt");
    fs::write(&source, "the cat\n")?;
    fs::write(&target, "le chat\n")?;
    let align = dir.path().join("missing_align.txt");

    let err = inspect(&source, &target, &align, 0).unwrap_err();
    assert!(err.is_reportable());
    match err {
        InspectError::FileNotFound { path } => assert_eq!(path, align),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    Ok(())
}
