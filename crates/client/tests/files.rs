//! Tests for loading import files from disk and importing them.

mod common;

use std::fs::File;
use std::io::Write;

use assert_matches::assert_matches;
use catalog_client::cli::CliError;
use catalog_client::files::{import_file, load_candidate};
use catalog_core::bulk_import::{BulkRowError, BulkUploadResponse, FileRejection};
use catalog_core::error::{FailureKind, RemoteFailure};

use common::FakeCollection;

const ONE_GIB: u64 = 1024 * 1024 * 1024;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

/// A sparse file of `len` bytes; reading it would allocate all of them.
fn sparse_file(dir: &tempfile::TempDir, name: &str, len: u64) -> std::path::PathBuf {
    let path = dir.path().join(name);
    File::create(&path).unwrap().set_len(len).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Test: an oversized file is refused from its metadata alone
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_file_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let path = sparse_file(&dir, "huge.xlsx", ONE_GIB);

    let result = load_candidate(&path).await;

    assert_matches!(
        result,
        Err(CliError::Rejected(FileRejection::TooLarge { size_bytes })) if size_bytes == ONE_GIB
    );
}

#[tokio::test]
async fn six_megabyte_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = sparse_file(&dir, "products.csv", 6 * 1024 * 1024);

    assert_matches!(
        load_candidate(&path).await,
        Err(CliError::Rejected(FileRejection::TooLarge { .. }))
    );
}

// ---------------------------------------------------------------------------
// Test: type checks and successful loads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pdf_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "catalog.pdf", b"%PDF-1.4");

    assert_matches!(
        load_candidate(&path).await,
        Err(CliError::Rejected(FileRejection::UnsupportedType { file_name })) if file_name == "catalog.pdf"
    );
}

#[tokio::test]
async fn csv_loaded_with_contents() {
    let dir = tempfile::tempdir().unwrap();
    let contents = b"Name,Price,CategoryId\nLamp,10,1\n";
    let path = write_file(&dir, "products.csv", contents);

    let file = load_candidate(&path).await.unwrap();

    assert_eq!(file.file_name, "products.csv");
    assert_eq!(file.bytes, contents.to_vec());
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    assert_matches!(load_candidate(&path).await, Err(CliError::Io { .. }));
}

// ---------------------------------------------------------------------------
// Test: import_file reports every non-reconciled ending as an error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn import_returns_partial_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "products.csv", b"Name,Price,CategoryId\nLamp,10,1\n");
    let client = FakeCollection::default().with_bulk_results(vec![Ok(BulkUploadResponse {
        message: "Import finished with errors".to_string(),
        inserted: 7,
        errors: Some(vec![
            BulkRowError {
                row: 3,
                reason: "Name is required".to_string(),
            },
            BulkRowError {
                row: 9,
                reason: "Category 12 does not exist".to_string(),
            },
        ]),
    })]);

    let outcome = import_file(&client, &path).await.unwrap();

    assert_eq!(outcome.inserted, 7);
    assert_eq!(outcome.total, 9);
    assert_eq!(client.submitted(), vec!["products.csv"]);
}

#[tokio::test]
async fn import_of_rejected_file_fails_without_submitting() {
    let dir = tempfile::tempdir().unwrap();
    let client = FakeCollection::default();

    let pdf = write_file(&dir, "catalog.pdf", b"%PDF-1.4");
    assert_matches!(import_file(&client, &pdf).await, Err(CliError::Rejected(_)));

    let huge = sparse_file(&dir, "huge.xlsx", ONE_GIB);
    assert_matches!(import_file(&client, &huge).await, Err(CliError::Rejected(_)));

    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn import_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "products.xlsx", b"PK\x03\x04");
    let client = FakeCollection::default()
        .with_bulk_results(vec![Err(RemoteFailure::network("connection reset"))]);

    let result = import_file(&client, &path).await;

    assert_matches!(result, Err(CliError::Remote(f)) if f.kind == FailureKind::Network);
}
