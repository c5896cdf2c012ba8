//! UniFFI bindings for pilcrow host apps
//!
//! Exposes one [`EditorHandle`] per open document. Every call goes through a
//! mutex around the engine's editor, so Swift and Kotlin hosts may call in
//! from any thread while the editor itself stays single-writer.

use pilcrow_engine::{
    Block, BlockId, ChangeStream, Document, EditResult, Editor, EditorError, Kind, ModelError,
    Snapshot,
};
use std::collections::HashMap;
use std::sync::Mutex;

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, PartialEq, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Block not found: {id}")]
    BlockNotFound { id: String },
    #[error("Block already in document: {id}")]
    DuplicateBlock { id: String },
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },
    #[error("Invalid kind: {reason}")]
    InvalidKind { reason: String },
}

impl From<EditorError> for FfiError {
    fn from(error: EditorError) -> Self {
        match error {
            EditorError::BlockNotFound(id) => FfiError::BlockNotFound { id: id.into() },
            EditorError::DuplicateBlock(id) => FfiError::DuplicateBlock { id: id.into() },
        }
    }
}

/// An empty id can never name a block in the document
fn block_id(id: String) -> Result<BlockId, FfiError> {
    BlockId::try_from(id.as_str()).map_err(|_| FfiError::BlockNotFound { id })
}

fn kind(name: String) -> Result<Kind, FfiError> {
    Kind::new(name).map_err(|e: ModelError| FfiError::InvalidKind {
        reason: e.to_string(),
    })
}

// ============ Editor Handle ============

/// A handle to an editable document.
///
/// Mutating methods return the change they produced, or `None` for a no-op.
/// The same changes queue up for [`EditorHandle::poll_changes`], which lets
/// a host refresh its view in batches.
#[derive(uniffi::Object)]
pub struct EditorHandle {
    editor: Mutex<Editor>,
    changes: Mutex<ChangeStream>,
}

impl EditorHandle {
    fn wrap(document: Document) -> Self {
        let editor = Editor::new(document);
        let changes = editor.subscribe();
        Self {
            editor: Mutex::new(editor),
            changes: Mutex::new(changes),
        }
    }

    fn edit<F>(&self, edit: F) -> Result<Option<ChangeDto>, FfiError>
    where
        F: FnOnce(&mut Editor) -> Result<Option<EditResult>, EditorError>,
    {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let mut editor = self.editor.lock().unwrap_or_else(|e| e.into_inner());
        Ok(edit(&mut editor)?.map(ChangeDto::from_engine))
    }
}

#[uniffi::export]
impl EditorHandle {
    /// Open a document from its JSON form.
    #[uniffi::constructor]
    pub fn from_json(json: String) -> Result<Self, FfiError> {
        let document = Document::from_json(&json).map_err(|e| FfiError::InvalidDocument {
            reason: e.to_string(),
        })?;
        Ok(Self::wrap(document))
    }

    #[uniffi::constructor]
    pub fn empty() -> Self {
        Self::wrap(Document::default())
    }

    /// A demo document with one block of every built-in kind.
    #[uniffi::constructor]
    pub fn sample() -> Self {
        Self::wrap(Document::sample())
    }

    pub fn to_json(&self) -> Result<String, FfiError> {
        let editor = self.editor.lock().unwrap_or_else(|e| e.into_inner());
        editor
            .document()
            .to_json()
            .map_err(|e| FfiError::InvalidDocument {
                reason: e.to_string(),
            })
    }

    /// Get a snapshot of the document for UI rendering.
    pub fn snapshot(&self) -> SnapshotDto {
        let editor = self.editor.lock().unwrap_or_else(|e| e.into_inner());
        SnapshotDto::from_engine(editor.snapshot())
    }

    pub fn insert_newline(&self, block: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.insert_newline(&block))
    }

    pub fn delete_at_beginning(&self, block: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.delete_at_beginning(&block))
    }

    pub fn update_content(
        &self,
        block: String,
        text: String,
    ) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.update_content(&block, text))
    }

    pub fn toggle_completion(&self, block: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.toggle_completion(&block))
    }

    pub fn retype(&self, block: String, kind_name: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        let kind = kind(kind_name)?;
        self.edit(|editor| editor.retype(&block, kind))
    }

    /// Insert a fresh block of `kind_name` right after `after`.
    pub fn insert_after(
        &self,
        after: String,
        kind_name: String,
        content: String,
    ) -> Result<Option<ChangeDto>, FfiError> {
        let after = block_id(after)?;
        let block = Block::with_content(kind(kind_name)?, content);
        self.edit(|editor| editor.insert_after(block, &after))
    }

    /// Append a fresh block of `kind_name` at the end.
    pub fn append(&self, kind_name: String, content: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = Block::with_content(kind(kind_name)?, content);
        self.edit(|editor| editor.append(block))
    }

    /// Append a successor of the last block (or a default block when empty).
    pub fn append_new(&self) -> Result<Option<ChangeDto>, FfiError> {
        self.edit(|editor| editor.append_new())
    }

    /// Move a block; out-of-range targets clamp to the end.
    pub fn move_block(&self, block: String, to: u64) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        let to = usize::try_from(to).unwrap_or(usize::MAX);
        self.edit(|editor| editor.move_block(&block, to))
    }

    pub fn delete_block(&self, block: String) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.delete(&block))
    }

    /// Set a property, or clear it when `value` is `None`.
    pub fn set_property(
        &self,
        block: String,
        key: String,
        value: Option<String>,
    ) -> Result<Option<ChangeDto>, FfiError> {
        let block = block_id(block)?;
        self.edit(|editor| editor.set_property(&block, key, value))
    }

    /// Changes since the last poll, oldest first.
    pub fn poll_changes(&self) -> Vec<ChangeDto> {
        let mut changes = self.changes.lock().unwrap_or_else(|e| e.into_inner());
        changes
            .drain()
            .into_iter()
            .map(ChangeDto::from_engine)
            .collect()
    }
}

// ============ DTOs ============

/// UI-ready snapshot of a document.
#[derive(Debug, uniffi::Record)]
pub struct SnapshotDto {
    /// Editor version for change detection
    pub version: u64,
    pub blocks: Vec<BlockDto>,
}

impl SnapshotDto {
    fn from_engine(snapshot: Snapshot) -> Self {
        Self {
            version: snapshot.version,
            blocks: snapshot
                .document
                .iter()
                .map(BlockDto::from_engine)
                .collect(),
        }
    }
}

#[derive(Debug, uniffi::Record)]
pub struct BlockDto {
    /// Stable identifier for this block (persists across edits)
    pub id: String,
    /// Kind name (e.g. "heading", "todo", "listItem")
    pub kind: String,
    pub content: String,
    pub properties: HashMap<String, String>,
}

impl BlockDto {
    fn from_engine(block: &Block) -> Self {
        Self {
            id: block.id().to_string(),
            kind: block.kind.to_string(),
            content: block.content.clone(),
            properties: block
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum ChangeDto {
    Inserted { id: String },
    RetypedKind { id: String },
    ContentUpdated { id: String },
    Deleted { id: String, index: u64 },
    Moved { id: String, from: u64, to: u64 },
}

impl ChangeDto {
    fn from_engine(result: EditResult) -> Self {
        match result {
            EditResult::Inserted(id) => ChangeDto::Inserted { id: id.into() },
            EditResult::RetypedKind(id) => ChangeDto::RetypedKind { id: id.into() },
            EditResult::ContentUpdated(id) => ChangeDto::ContentUpdated { id: id.into() },
            EditResult::Deleted { id, index } => ChangeDto::Deleted {
                id: id.into(),
                index: index as u64,
            },
            EditResult::Moved { id, from, to } => ChangeDto::Moved {
                id: id.into(),
                from: from as u64,
                to: to as u64,
            },
        }
    }
}
