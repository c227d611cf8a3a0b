//! Integration tests for the async entry point.

#![cfg(feature = "async")]

mod common;

use common::quarterly_report;
use pdfoutline::{extract_outline_file_async, Error};

#[tokio::test]
async fn test_extract_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q3.pdf");
    std::fs::write(&path, quarterly_report()).unwrap();

    let outline = extract_outline_file_async(&path).await.unwrap();
    assert_eq!(outline.title, "Quarterly Results Review");
    assert_eq!(outline.total_pages, 2);
}

#[tokio::test]
async fn test_missing_file_async() {
    let result = extract_outline_file_async("/nonexistent/missing.pdf").await;
    assert!(matches!(result, Err(Error::Io(_))));
}
