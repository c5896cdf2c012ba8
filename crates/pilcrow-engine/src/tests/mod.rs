use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary documents directory
pub fn create_test_documents_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file with raw content inside the documents directory
pub fn create_test_file(documents_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = documents_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

#[test]
fn test_package_metadata_names_no_author_or_repository() {
    assert_eq!(env!("CARGO_PKG_AUTHORS"), "");
    assert_eq!(env!("CARGO_PKG_REPOSITORY"), "");
}
