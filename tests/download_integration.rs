//! Integration tests for the download executor.
//!
//! These tests verify the full download flow with mock HTTP servers.

use std::time::Duration;

use imgur_folder_core::download::{DownloadOutcome, FileDownloader, HttpDownloader};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

fn downloader() -> HttpDownloader {
    HttpDownloader::new()
        .expect("client builds")
        .with_pause(Duration::from_millis(1))
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let content: Vec<u8> = (0..=255u8).cycle().take(256 * 1024).collect();

    Mock::given(method("GET"))
        .and(path("/big.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&mock_server)
        .await;

    let url = format!("{}/big.mp4", mock_server.uri());
    let outcome = downloader()
        .download("Xy7Kq - 1.mp4", &url, temp_dir.path(), false)
        .await
        .expect("download should succeed");

    let DownloadOutcome::Downloaded { path, bytes } = outcome else {
        panic!("expected Downloaded, got {outcome:?}");
    };
    assert_eq!(bytes, content.len() as u64);
    assert_eq!(std::fs::read(&path).expect("should read file"), content);
}

#[tokio::test]
async fn test_existing_file_is_never_refetched() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"first".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let downloader = downloader();
    let url = format!("{}/a.jpg", mock_server.uri());
    for _ in 0..3 {
        downloader
            .download("a.jpg", &url, temp_dir.path(), false)
            .await
            .expect("download should succeed");
    }

    assert_eq!(
        std::fs::read(temp_dir.path().join("a.jpg")).expect("should read file"),
        b"first"
    );
}

#[tokio::test]
async fn test_server_error_produces_no_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/err.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/err.jpg", mock_server.uri());
    let outcome = downloader()
        .download("err.jpg", &url, temp_dir.path(), false)
        .await
        .expect("error status is an outcome, not an error");

    assert!(matches!(outcome, DownloadOutcome::Failed { status: 500, .. }));
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("read dir")
        .collect();
    assert!(entries.is_empty(), "no file expected, found: {entries:?}");
}
