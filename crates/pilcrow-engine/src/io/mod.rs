use crate::models::{Document, DocumentLibrary};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of stored document files
pub const FILE_EXTENSION: &str = "pilcrow";

const UNTITLED: &str = "Untitled";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid documents directory: {0}")]
    InvalidDocumentsDir(String),
    #[error("Path is not inside the documents directory: {0}")]
    OutsideRoot(PathBuf),
}

/// Read and decode a document file
pub fn load_document(relative_path: &RelativePath, root: &Path) -> Result<Document, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let content = fs::read_to_string(&absolute_path)?;
    let document = Document::from_json(&content)?;
    log::debug!(
        "loaded {} ({} blocks)",
        absolute_path.display(),
        document.len()
    );
    Ok(document)
}

/// Encode and write a document file, creating parent directories as needed
pub fn save_document(
    relative_path: &RelativePath,
    root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = document.to_json_pretty()?;
    fs::write(&absolute_path, content)?;
    log::info!("saved {}", absolute_path.display());
    Ok(())
}

pub fn delete_document(relative_path: &RelativePath, root: &Path) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::remove_file(&absolute_path)?;
    log::info!("deleted {}", absolute_path.display());
    Ok(())
}

/// Scan for document files in the documents directory, sorted by path
pub fn scan_documents(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.exists() {
        return Err(IoError::InvalidDocumentsDir(
            "documents directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Build a library of every document under `root`, keyed by relative path
pub fn build_library(root: &Path) -> Result<DocumentLibrary, IoError> {
    let mut library = DocumentLibrary::new();
    for path in scan_documents(root)? {
        library.add(to_relative(&path, root)?);
    }
    Ok(library)
}

/// First free `Untitled[ - n].pilcrow` name in the documents root
pub fn unique_document_path(root: &Path) -> RelativePathBuf {
    let mut candidate = RelativePathBuf::from(format!("{UNTITLED}.{FILE_EXTENSION}"));
    let mut attempt = 0;

    while candidate.to_path(root).exists() {
        attempt += 1;
        candidate = RelativePathBuf::from(format!("{UNTITLED} - {attempt}.{FILE_EXTENSION}"));
    }

    candidate
}

pub fn validate_documents_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocumentsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

fn to_relative(path: &Path, root: &Path) -> Result<RelativePathBuf, IoError> {
    path.strip_prefix(root)
        .ok()
        .and_then(|relative| RelativePathBuf::from_path(relative).ok())
        .ok_or_else(|| IoError::OutsideRoot(path.to_path_buf()))
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == FILE_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}
