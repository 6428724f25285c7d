use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

/// A single audio upload received by the gateway.
///
/// The original filename is only kept for logging; staging paths are derived
/// from the id so that client-supplied names never reach the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub id: UploadId,
    pub filename: String,
    pub content_type: String,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            id: UploadId::new(),
            filename: filename.into(),
            content_type: content_type
                .filter(|c| !c.is_empty())
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }
}
