use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone};
use futures::TryStreamExt;

use transcript_relay::application::ports::ExportStore;
use transcript_relay::application::services::{
    TextExportError, TextExportRequest, TextExportService,
};
use transcript_relay::infrastructure::export::LocalExportStore;

fn service() -> (tempfile::TempDir, TextExportService) {
    let dir = tempfile::TempDir::new().unwrap();
    let store: Arc<dyn ExportStore> =
        Arc::new(LocalExportStore::new(dir.path().to_path_buf()).unwrap());
    (dir, TextExportService::new(store))
}

fn request(text: Option<&str>, file_name: Option<&str>) -> TextExportRequest {
    TextExportRequest {
        text: text.map(String::from),
        file_name: file_name.map(String::from),
    }
}

#[tokio::test]
async fn given_march_fifth_when_exporting_note_then_file_lands_in_date_directory() {
    let (dir, service) = service();
    let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).single().unwrap();

    let export = service
        .export_at(request(Some("hello world"), Some("note")), now)
        .await
        .unwrap();

    let expected_name = format!("note-{}.txt", now.timestamp_millis());
    assert_eq!(export.path.file_name(), expected_name);
    assert_eq!(export.path.directory(), "2024-3-5");
    assert_eq!(export.location, dir.path().join("2024-3-5").join(&expected_name));
    assert_eq!(std::fs::read(&export.location).unwrap(), b"hello world");
}

#[tokio::test]
async fn given_exported_file_when_opening_then_stream_yields_exact_bytes() {
    let (_dir, service) = service();
    let text = "line one\nline two\r\n\u{1F600} emoji";

    let export = service
        .export(request(Some(text), Some("multi")))
        .await
        .unwrap();
    let chunks: Vec<bytes::Bytes> = service.open(&export).await.unwrap().try_collect().await.unwrap();
    let body: Vec<u8> = chunks.concat();

    assert_eq!(body, text.as_bytes());
}

#[tokio::test]
async fn given_same_millisecond_when_exporting_twice_then_second_file_gets_next_millisecond() {
    let (_dir, service) = service();
    let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).single().unwrap();

    let first = service
        .export_at(request(Some("first"), Some("note")), now)
        .await
        .unwrap();
    let second = service
        .export_at(request(Some("second"), Some("note")), now)
        .await
        .unwrap();

    assert_ne!(first.location, second.location);
    assert_eq!(
        second.path.file_name(),
        format!("note-{}.txt", now.timestamp_millis() + 1)
    );
    assert_eq!(std::fs::read(&first.location).unwrap(), b"first");
    assert_eq!(std::fs::read(&second.location).unwrap(), b"second");
}

#[tokio::test]
async fn given_missing_or_empty_text_when_exporting_then_returns_missing_text() {
    let (dir, service) = service();

    let missing = service.export(request(None, Some("note"))).await;
    let empty = service.export(request(Some(""), Some("note"))).await;

    assert!(matches!(missing, Err(TextExportError::MissingText)));
    assert!(matches!(empty, Err(TextExportError::MissingText)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_both_fields_missing_when_exporting_then_text_is_reported_first() {
    let (_dir, service) = service();

    let result = service.export(request(None, None)).await;

    assert!(matches!(result, Err(TextExportError::MissingText)));
}

#[tokio::test]
async fn given_missing_file_name_when_exporting_then_returns_missing_file_name() {
    let (_dir, service) = service();

    let result = service.export(request(Some("hello"), Some(""))).await;

    assert!(matches!(result, Err(TextExportError::MissingFileName)));
}

#[tokio::test]
async fn given_path_like_file_name_when_exporting_then_returns_invalid_file_name() {
    let (dir, service) = service();

    let result = service.export(request(Some("x"), Some("sub/dir"))).await;

    assert!(matches!(result, Err(TextExportError::InvalidFileName(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn given_old_and_recent_directories_when_applying_retention_then_only_old_ones_are_removed() {
    let (dir, service) = service();
    for name in ["2024-1-1", "2024-2-28", "2024-3-1", "2024-3-5", "keep-me"] {
        std::fs::create_dir(dir.path().join(name)).unwrap();
    }
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    let removed = service.apply_retention(5, today).await.unwrap();

    assert_eq!(removed, 2);
    assert!(!dir.path().join("2024-1-1").exists());
    assert!(!dir.path().join("2024-2-28").exists());
    assert!(dir.path().join("2024-3-1").exists());
    assert!(dir.path().join("2024-3-5").exists());
    assert!(dir.path().join("keep-me").exists());
}

#[tokio::test]
async fn given_retention_window_beyond_calendar_range_when_applying_retention_then_nothing_is_removed() {
    let (dir, service) = service();
    std::fs::create_dir(dir.path().join("2024-1-1")).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    let removed = service.apply_retention(u32::MAX, today).await.unwrap();

    assert_eq!(removed, 0);
    assert!(dir.path().join("2024-1-1").exists());
}
