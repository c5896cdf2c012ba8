pub mod block;
pub mod document;
pub mod document_file;
pub mod document_library;
pub mod kind;

pub use block::{Block, BlockId, COMPLETED_KEY, Properties, next_of};
pub use document::Document;
pub use document_file::DocumentFile;
pub use document_library::DocumentLibrary;
pub use kind::{Kind, KindRegistry, KindSpec};

/// Violations of the block model's structural invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("block id must not be empty")]
    EmptyId,
    #[error("block kind must not be empty")]
    EmptyKind,
    #[error("duplicate block id: {0}")]
    DuplicateId(BlockId),
}
