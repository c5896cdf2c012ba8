pub mod editing;
pub mod io;
pub mod models;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    ChangeStream, Cmd, EditResult, Editor, EditorError, EditorOptions, Snapshot,
};
pub use io::IoError;
pub use models::{
    Block, BlockId, Document, DocumentFile, DocumentLibrary, Kind, KindRegistry, KindSpec,
    ModelError, next_of,
};
