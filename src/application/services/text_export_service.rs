use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Days, Local, NaiveDate};
use futures::stream::BoxStream;

use crate::application::ports::{ExportStore, ExportStoreError};
use crate::domain::{ExportFileName, ExportFileNameError, ExportPath};

const MAX_NAME_ATTEMPTS: i64 = 8;

#[derive(Debug, Clone, Default)]
pub struct TextExportRequest {
    pub text: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TextExport {
    pub path: ExportPath,
    pub location: PathBuf,
}

pub struct TextExportService {
    store: Arc<dyn ExportStore>,
}

impl TextExportService {
    pub fn new(store: Arc<dyn ExportStore>) -> Self {
        Self { store }
    }

    pub async fn export(&self, request: TextExportRequest) -> Result<TextExport, TextExportError> {
        self.export_at(request, Local::now()).await
    }

    pub async fn export_at(
        &self,
        request: TextExportRequest,
        now: DateTime<Local>,
    ) -> Result<TextExport, TextExportError> {
        let text = request
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TextExportError::MissingText)?;
        let raw_name = request
            .file_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(TextExportError::MissingFileName)?;
        let name = ExportFileName::parse(raw_name)?;

        let date = now.date_naive();
        let mut millis = now.timestamp_millis();

        // Same name within the same millisecond: move to the next free one.
        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = ExportPath::with_millis(&name, date, millis);
            match self.store.create(&path, text).await {
                Ok(location) => {
                    tracing::info!(
                        file = %path.file_name(),
                        directory = %path.directory(),
                        bytes = text.len(),
                        "Text file created"
                    );
                    return Ok(TextExport { path, location });
                }
                Err(ExportStoreError::AlreadyExists(existing)) => {
                    tracing::debug!(existing = %existing, "Export name taken, advancing timestamp");
                    millis += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TextExportError::NameExhausted)
    }

    pub async fn open(
        &self,
        export: &TextExport,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, TextExportError> {
        Ok(self.store.open(&export.path).await?)
    }

    /// Removes date directories that fall outside the retention window
    /// ending at `today`.
    pub async fn apply_retention(
        &self,
        retention_days: u32,
        today: NaiveDate,
    ) -> Result<usize, ExportStoreError> {
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(retention_days))) else {
            tracing::debug!(retention_days, "Retention window reaches past the earliest date");
            return Ok(0);
        };
        let removed = self.store.prune_before(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed = removed, cutoff = %cutoff, "Pruned expired export directories");
        }
        Ok(removed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextExportError {
    #[error("missing text content")]
    MissingText,
    #[error("missing file name")]
    MissingFileName,
    #[error("invalid file name: {0}")]
    InvalidFileName(#[from] ExportFileNameError),
    #[error("no free file name after {MAX_NAME_ATTEMPTS} attempts")]
    NameExhausted,
    #[error("storage: {0}")]
    Store(#[from] ExportStoreError),
}
