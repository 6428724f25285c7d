use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use super::export_file_name::ExportFileName;

/// Location of an exported text file, relative to the export root:
/// `<year>-<month>-<day>/<name>-<epochMillis>.txt`.
///
/// Month and day are not zero padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPath {
    directory: String,
    file_name: String,
}

impl ExportPath {
    pub fn new(name: &ExportFileName, now: DateTime<Local>) -> Self {
        Self::with_millis(name, now.date_naive(), now.timestamp_millis())
    }

    pub fn with_millis(name: &ExportFileName, date: NaiveDate, epoch_millis: i64) -> Self {
        Self {
            directory: Self::directory_for(date),
            file_name: format!("{}-{}.txt", name.as_str(), epoch_millis),
        }
    }

    pub fn directory_for(date: NaiveDate) -> String {
        format!("{}-{}-{}", date.year(), date.month(), date.day())
    }

    /// Inverse of [`ExportPath::directory_for`]. Returns `None` for anything
    /// that is not a date directory.
    pub fn parse_directory(name: &str) -> Option<NaiveDate> {
        let mut parts = name.splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn relative(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.file_name)
    }
}
