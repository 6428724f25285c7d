use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::NaiveDate;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::application::ports::{ExportStore, ExportStoreError};
use crate::domain::ExportPath;

/// Writes exported text files under a root directory, one subdirectory per day.
pub struct LocalExportStore {
    root: PathBuf,
}

impl LocalExportStore {
    pub fn new(root: PathBuf) -> Result<Self, ExportStoreError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn resolve(&self, path: &ExportPath) -> PathBuf {
        self.root.join(path.relative())
    }
}

#[async_trait::async_trait]
impl ExportStore for LocalExportStore {
    async fn create(&self, path: &ExportPath, text: &str) -> Result<PathBuf, ExportStoreError> {
        fs::create_dir_all(self.root.join(path.directory())).await?;

        let location = self.resolve(path);
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&location)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ExportStoreError::AlreadyExists(
                    location.display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        write_or_discard(file, &location, text).await?;
        Ok(location)
    }

    async fn open(
        &self,
        path: &ExportPath,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, ExportStoreError> {
        let location = self.resolve(path);
        let file = match fs::File::open(&location).await {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ExportStoreError::NotFound(location.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ReaderStream::new(file).boxed())
    }

    async fn prune_before(&self, cutoff: NaiveDate) -> Result<usize, ExportStoreError> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(date) = name.to_str().and_then(ExportPath::parse_directory) else {
                continue;
            };
            if date < cutoff {
                fs::remove_dir_all(entry.path()).await?;
                tracing::debug!(directory = %entry.path().display(), "Removed export directory");
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Writes `text` through `writer`. If the write fails, the partially written
/// file at `location` is removed before the error is returned.
pub async fn write_or_discard<W>(mut writer: W, location: &Path, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(location).await {
            tracing::warn!(error = %cleanup, path = %location.display(), "Failed to remove partial export");
        }
        return Err(e);
    }
    Ok(())
}
