use transcript_relay::domain::{StoragePath, UploadId};

#[test]
fn given_upload_id_when_creating_path_then_format_is_uuid_with_upload_suffix() {
    let upload_id = UploadId::new();
    let path = StoragePath::for_upload(&upload_id);

    let expected = format!("{}.upload", upload_id.as_uuid());
    assert_eq!(path.as_str(), expected);
}

#[test]
fn given_two_different_uploads_when_creating_paths_then_paths_differ() {
    let path_a = StoragePath::for_upload(&UploadId::new());
    let path_b = StoragePath::for_upload(&UploadId::new());

    assert_ne!(path_a, path_b);
}

#[test]
fn given_storage_path_when_displayed_then_matches_as_str() {
    let path = StoragePath::from_raw("abc.upload");

    assert_eq!(format!("{}", path), path.as_str());
}
