use std::collections::BTreeMap;

use relative_path::RelativePathBuf;

use crate::models::DocumentFile;

/// In-memory set of stored documents, kept sorted by path.
#[derive(Debug, Default)]
pub struct DocumentLibrary {
    files: BTreeMap<RelativePathBuf, DocumentFile>,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, relative_path: RelativePathBuf) {
        self.files
            .insert(relative_path.clone(), DocumentFile::new(relative_path));
    }

    /// All documents, sorted by path
    pub fn files(&self) -> impl Iterator<Item = &DocumentFile> {
        self.files.values()
    }

    pub fn get(&self, index: usize) -> Option<&DocumentFile> {
        self.files.values().nth(index)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
