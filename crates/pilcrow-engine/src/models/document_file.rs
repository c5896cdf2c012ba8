use relative_path::{RelativePath, RelativePathBuf};

use crate::io::FILE_EXTENSION;

/// A stored document with a path relative to the documents root and a
/// display-friendly name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    relative_path: RelativePathBuf,
    display_name: String,
}

impl DocumentFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = Self::extract_display_name(&relative_path);
        Self {
            relative_path,
            display_name,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the document extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    fn extract_display_name(path: &RelativePath) -> String {
        match path.file_name() {
            Some(name) => name
                .strip_suffix(FILE_EXTENSION)
                .and_then(|stem| stem.strip_suffix('.'))
                .unwrap_or(name)
                .to_string(),
            None => "Untitled".to_string(),
        }
    }
}

impl From<RelativePathBuf> for DocumentFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for DocumentFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}
