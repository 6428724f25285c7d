use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::NaiveDate;
use futures::TryStreamExt;

use transcript_relay::application::ports::{ExportStore, ExportStoreError};
use transcript_relay::domain::{ExportFileName, ExportPath};
use transcript_relay::infrastructure::export::{LocalExportStore, write_or_discard};

fn create_test_store() -> (tempfile::TempDir, LocalExportStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalExportStore::new(dir.path().join("output")).unwrap();
    (dir, store)
}

fn path(name: &str, millis: i64) -> ExportPath {
    let name = ExportFileName::parse(name).unwrap();
    ExportPath::with_millis(&name, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), millis)
}

#[tokio::test]
async fn given_new_path_when_creating_then_date_directory_and_file_exist() {
    let (_dir, store) = create_test_store();

    let location = store.create(&path("note", 1), "hello world").await.unwrap();

    assert_eq!(location, store.root().join("2024-3-5").join("note-1.txt"));
    assert_eq!(std::fs::read_to_string(location).unwrap(), "hello world");
}

#[tokio::test]
async fn given_existing_file_when_creating_same_path_then_returns_already_exists_and_keeps_content() {
    let (_dir, store) = create_test_store();
    let target = path("note", 2);
    let location = store.create(&target, "original").await.unwrap();

    let result = store.create(&target, "replacement").await;

    assert!(matches!(result, Err(ExportStoreError::AlreadyExists(_))));
    assert_eq!(std::fs::read_to_string(location).unwrap(), "original");
}

#[tokio::test]
async fn given_created_file_when_opening_then_stream_returns_content() {
    let (_dir, store) = create_test_store();
    let target = path("note", 3);
    store.create(&target, "streamed back").await.unwrap();

    let chunks: Vec<bytes::Bytes> = store.open(&target).await.unwrap().try_collect().await.unwrap();

    assert_eq!(chunks.concat(), b"streamed back");
}

#[tokio::test]
async fn given_missing_file_when_opening_then_returns_not_found() {
    let (_dir, store) = create_test_store();

    let result = store.open(&path("ghost", 4)).await;

    assert!(matches!(result, Err(ExportStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_date_directories_when_pruning_then_removes_older_and_ignores_files() {
    let (_dir, store) = create_test_store();
    let root = store.root().clone();
    std::fs::create_dir(root.join("2023-12-31")).unwrap();
    std::fs::write(root.join("2023-12-31").join("old-1.txt"), "old").unwrap();
    std::fs::create_dir(root.join("2024-1-2")).unwrap();
    std::fs::write(root.join("2020-1-1"), "a file, not a directory").unwrap();

    let removed = store
        .prune_before(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(!root.join("2023-12-31").exists());
    assert!(root.join("2024-1-2").exists());
    assert!(root.join("2020-1-1").exists());
}

/// Accepts nothing; every write reports a full disk.
struct FullDisk;

impl tokio::io::AsyncWrite for FullDisk {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::other("no space left on device")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn given_failing_write_when_writing_export_then_partial_file_is_removed() {
    let dir = tempfile::TempDir::new().unwrap();
    let location = dir.path().join("note-1.txt");
    std::fs::write(&location, b"").unwrap();

    let result = write_or_discard(FullDisk, &location, "hello").await;

    assert!(result.is_err());
    assert!(!location.exists());
}

#[tokio::test]
async fn given_working_writer_when_writing_export_then_file_is_kept() {
    let dir = tempfile::TempDir::new().unwrap();
    let location = dir.path().join("note-2.txt");
    let file = tokio::fs::File::create(&location).await.unwrap();

    write_or_discard(file, &location, "hello").await.unwrap();

    assert_eq!(std::fs::read_to_string(&location).unwrap(), "hello");
}
