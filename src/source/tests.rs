//! Tests for source module

use super::*;
use crate::error::Error;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_gzip(path: &Path, content: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

// ============================================================================
// Reader Tests
// ============================================================================

#[test]
fn test_read_plain_lines_with_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    std::fs::write(&path, "{\"code\": \"1\"}\n\n{\"code\": \"2\"}\n").unwrap();

    let records: Vec<_> = JsonlReader::open(&path)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].0, 1);
    assert_eq!(records[1].0, 3);
    assert_eq!(records[1].1["code"], "2");
}

#[test]
fn test_read_gzip_by_magic_bytes() {
    let dir = tempdir().unwrap();
    // No .gz extension: detection relies on the content
    let path = dir.path().join("products.jsonl");
    write_gzip(&path, "{\"code\": \"1\"}\n{\"code\": \"2\"}\n");

    let reader = JsonlReader::open(&path).unwrap();
    assert_eq!(reader.count(), 2);
}

#[test]
fn test_read_concatenated_gzip_members() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.gz");
    let second = dir.path().join("b.gz");
    write_gzip(&first, "{\"code\": \"1\"}\n");
    write_gzip(&second, "{\"code\": \"2\"}\n");

    let mut joined = std::fs::read(&first).unwrap();
    joined.extend(std::fs::read(&second).unwrap());
    let path = dir.path().join("joined.jsonl.gz");
    std::fs::write(&path, joined).unwrap();

    let codes: Vec<String> = JsonlReader::open(&path)
        .unwrap()
        .map(|r| r.unwrap().1["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["1", "2"]);
}

#[test]
fn test_bad_line_is_decode_error_and_reading_continues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.jsonl");
    std::fs::write(&path, "{\"code\": \"1\"}\n{not json\n[1, 2]\n{\"code\": \"4\"}\n").unwrap();

    let results: Vec<_> = JsonlReader::open(&path).unwrap().collect();
    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::Decode { line: 2, .. })));
    assert!(matches!(results[2], Err(Error::Decode { line: 3, .. })));
    assert_eq!(results[3].as_ref().unwrap().0, 4);
}

#[test]
fn test_invalid_utf8_line_is_decode_error_and_reading_continues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bytes.jsonl");
    let mut content = b"{\"code\": \"1\"}\n{\"code\": \"2\", \"brands\": \"".to_vec();
    content.extend([0xFF, 0xFE]);
    content.extend(b"\"}\r\n{\"code\": \"3\"}");
    std::fs::write(&path, content).unwrap();

    let results: Vec<_> = JsonlReader::open(&path).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(matches!(results[1], Err(Error::Decode { line: 2, .. })));
    let last = results[2].as_ref().unwrap();
    assert_eq!(last.0, 3);
    assert_eq!(last.1["code"], "3");
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let err = JsonlReader::open(dir.path().join("nope.jsonl")).err().unwrap();
    assert!(matches!(err, Error::SourceNotFound { .. }));
}

// ============================================================================
// Compression Detection Tests
// ============================================================================

#[test]
fn test_compression_detect() {
    assert_eq!(
        Compression::detect(Path::new("a.jsonl"), &[0x1f, 0x8b, 0x08]),
        Compression::Gzip
    );
    assert_eq!(
        Compression::detect(Path::new("a.jsonl.gz"), b"{\"code\""),
        Compression::None
    );
    assert_eq!(
        Compression::detect(Path::new("a.jsonl.gz"), b""),
        Compression::Gzip
    );
    assert_eq!(Compression::detect(Path::new("a.jsonl"), b""), Compression::None);
}

// ============================================================================
// Source Paths Tests
// ============================================================================

#[test]
fn test_ensure_exists() {
    let dir = tempdir().unwrap();
    let prices = dir.path().join("prices.jsonl");
    let proofs = dir.path().join("proofs.jsonl");
    let locations = dir.path().join("locations.jsonl");
    std::fs::write(&prices, "").unwrap();
    std::fs::write(&proofs, "").unwrap();

    let sources = SourcePaths::prices(&prices, &proofs, &locations);
    match sources.ensure_exists() {
        Err(Error::SourceNotFound { path }) => assert!(path.ends_with("locations.jsonl")),
        other => panic!("unexpected: {other:?}"),
    }

    std::fs::write(&locations, "").unwrap();
    assert!(sources.ensure_exists().is_ok());
    assert_eq!(sources.files().len(), 3);
}

#[test]
fn test_empty_product_list_rejected() {
    let sources = SourcePaths::Products { paths: vec![] };
    assert!(matches!(
        sources.ensure_exists(),
        Err(Error::Config { .. })
    ));
}

#[test]
fn test_source_paths_serde() {
    let sources = SourcePaths::product("/data/food.jsonl.gz");
    let json = serde_json::to_value(&sources).unwrap();
    assert_eq!(json["kind"], "products");
    let back: SourcePaths = serde_json::from_value(json).unwrap();
    assert_eq!(back, sources);
}
