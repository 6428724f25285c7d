use std::fmt;

const MAX_FILE_NAME_BYTES: usize = 200;

/// Characters Windows filesystems refuse in a file name.
const RESERVED_CHARS: [char; 7] = [':', '*', '?', '<', '>', '|', '"'];

/// Client-supplied base name for an exported text file.
///
/// Always a single path component: no separators, no traversal, no control
/// characters, nothing a Windows filesystem would reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFileName(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportFileNameError {
    #[error("file name is empty")]
    Empty,
    #[error("file name exceeds {MAX_FILE_NAME_BYTES} bytes")]
    TooLong,
    #[error("file name contains a path separator")]
    PathSeparator,
    #[error("file name contains a traversal sequence")]
    Traversal,
    #[error("file name contains control characters")]
    ControlCharacter,
    #[error("file name contains a reserved character")]
    ReservedCharacter,
}

impl ExportFileName {
    pub fn parse(raw: &str) -> Result<Self, ExportFileNameError> {
        if raw.is_empty() {
            return Err(ExportFileNameError::Empty);
        }
        if raw.len() > MAX_FILE_NAME_BYTES {
            return Err(ExportFileNameError::TooLong);
        }
        if raw.contains(['/', '\\']) {
            return Err(ExportFileNameError::PathSeparator);
        }
        if raw == "." || raw.contains("..") {
            return Err(ExportFileNameError::Traversal);
        }
        if raw.chars().any(char::is_control) {
            return Err(ExportFileNameError::ControlCharacter);
        }
        if raw.contains(RESERVED_CHARS) {
            return Err(ExportFileNameError::ReservedCharacter);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
