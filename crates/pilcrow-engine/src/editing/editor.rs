use tokio::sync::broadcast;

use crate::editing::{
    ChangeStream, Cmd, EditResult, Snapshot,
    changes::{self, DEFAULT_CHANGE_BUFFER},
};
use crate::models::{Block, BlockId, Document, Kind, KindRegistry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("block not found in document: {0}")]
    BlockNotFound(BlockId),
    #[error("block already in document: {0}")]
    DuplicateBlock(BlockId),
}

/// Tunables for an [`Editor`]
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Notifications buffered per subscriber
    pub change_buffer: usize,
    /// Kind of the block created by [`Cmd::AppendNew`] on an empty document
    pub default_kind: Kind,
    pub registry: KindRegistry,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            change_buffer: DEFAULT_CHANGE_BUFFER,
            default_kind: Kind::HEADING,
            registry: KindRegistry::default(),
        }
    }
}

/// The sole mutator of a [`Document`].
///
/// Edit intents go in through [`Editor::apply`] (or the named shorthands) and
/// come out as one [`EditResult`] per successful mutation, both as the return
/// value and on every [`ChangeStream`] obtained from [`Editor::subscribe`].
/// Intents that change nothing (toggling a non-todo block) return `Ok(None)`
/// and notify no one.
///
/// The editor is single-writer and fully synchronous. To share one across
/// threads, put it behind a mutex and hand readers [`Snapshot`]s.
///
/// ```rust
/// use pilcrow_engine::{Block, Document, EditResult, Editor};
///
/// let hello = Block::paragraph("hello");
/// let id = hello.id().clone();
/// let mut editor = Editor::new(Document::new(vec![hello]).unwrap());
/// let mut changes = editor.subscribe();
///
/// editor.insert_newline(&id).unwrap();
///
/// assert_eq!(editor.document().len(), 2);
/// assert!(matches!(changes.try_next(), Some(EditResult::Inserted(_))));
/// ```
#[derive(Debug)]
pub struct Editor {
    document: Document,
    registry: KindRegistry,
    default_kind: Kind,
    changes: broadcast::Sender<EditResult>,
    version: u64,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self::with_options(document, EditorOptions::default())
    }

    /// Blocks of `document` missing a default declared by the options'
    /// registry get it before editing starts.
    pub fn with_options(mut document: Document, options: EditorOptions) -> Self {
        document.fill_defaults(&options.registry);
        Self {
            document,
            registry: options.registry,
            default_kind: options.default_kind,
            changes: changes::channel(options.change_buffer),
            version: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Number of successful mutations so far
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            document: self.document.clone(),
        }
    }

    /// Subscribe to change notifications emitted from now on
    pub fn subscribe(&self) -> ChangeStream {
        ChangeStream::new(self.changes.subscribe())
    }

    /// Apply one edit intent.
    ///
    /// Returns the emitted notification, or `None` for a no-op. Referencing a
    /// block that is not in the document is reported as
    /// [`EditorError::BlockNotFound`] and leaves the document unchanged.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Option<EditResult>, EditorError> {
        let outcome = match cmd {
            Cmd::InsertNewline { block } => self.do_insert_newline(&block).map(Some),
            Cmd::DeleteAtBeginning { block } => self.do_delete_at_beginning(&block).map(Some),
            Cmd::UpdateContent { block, text } => self.do_update_content(&block, text).map(Some),
            Cmd::ToggleCompletion { block } => self.do_toggle_completion(&block),
            Cmd::Retype { block, kind } => self.do_retype(&block, kind).map(Some),
            Cmd::InsertAfter { block, after } => self.do_insert_after(block, &after).map(Some),
            Cmd::Append { block } => self.do_append(block).map(Some),
            Cmd::AppendNew => Ok(Some(self.do_append_new())),
            Cmd::Move { block, to } => self.do_move(&block, to).map(Some),
            Cmd::Delete { block } => self.do_delete(&block).map(Some),
            Cmd::SetProperty { block, key, value } => self.do_set_property(&block, key, value),
        }?;

        match &outcome {
            Some(result) => self.emit(result.clone()),
            None => log::trace!("edit was a no-op"),
        }
        Ok(outcome)
    }

    pub fn insert_newline(&mut self, block: &BlockId) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::InsertNewline {
            block: block.clone(),
        })
    }

    pub fn delete_at_beginning(
        &mut self,
        block: &BlockId,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::DeleteAtBeginning {
            block: block.clone(),
        })
    }

    pub fn update_content(
        &mut self,
        block: &BlockId,
        text: impl Into<String>,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::UpdateContent {
            block: block.clone(),
            text: text.into(),
        })
    }

    pub fn toggle_completion(
        &mut self,
        block: &BlockId,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::ToggleCompletion {
            block: block.clone(),
        })
    }

    pub fn retype(
        &mut self,
        block: &BlockId,
        kind: Kind,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::Retype {
            block: block.clone(),
            kind,
        })
    }

    pub fn insert_after(
        &mut self,
        block: Block,
        after: &BlockId,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::InsertAfter {
            block,
            after: after.clone(),
        })
    }

    pub fn append(&mut self, block: Block) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::Append { block })
    }

    pub fn append_new(&mut self) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::AppendNew)
    }

    pub fn move_block(
        &mut self,
        block: &BlockId,
        to: usize,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::Move {
            block: block.clone(),
            to,
        })
    }

    pub fn delete(&mut self, block: &BlockId) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::Delete {
            block: block.clone(),
        })
    }

    pub fn set_property(
        &mut self,
        block: &BlockId,
        key: impl Into<String>,
        value: Option<String>,
    ) -> Result<Option<EditResult>, EditorError> {
        self.apply(Cmd::SetProperty {
            block: block.clone(),
            key: key.into(),
            value,
        })
    }

    fn emit(&mut self, result: EditResult) {
        self.version += 1;
        log::debug!("edit v{}: {:?}", self.version, result);
        // no subscribers is fine
        let _ = self.changes.send(result);
    }

    fn position(&self, id: &BlockId) -> Result<usize, EditorError> {
        self.document
            .index_of(id)
            .ok_or_else(|| EditorError::BlockNotFound(id.clone()))
    }

    fn ensure_absent(&self, id: &BlockId) -> Result<(), EditorError> {
        if self.document.contains(id) {
            return Err(EditorError::DuplicateBlock(id.clone()));
        }
        Ok(())
    }

    fn block_at(&self, index: usize) -> &Block {
        &self.document.blocks()[index]
    }

    /// Empty non-paragraph blocks lose their formatting on return/backspace
    fn reverts_to_paragraph(&self, block: &Block) -> bool {
        block.is_empty(&self.registry) && !block.kind.is_paragraph()
    }

    fn revert_to_paragraph(&mut self, index: usize) -> EditResult {
        let mut updated = self.block_at(index).clone();
        updated.kind = Kind::PARAGRAPH;
        updated.properties.clear();
        self.registry.fill_defaults(&mut updated);
        let id = updated.id().clone();
        self.document.replace(index, updated);
        EditResult::RetypedKind(id)
    }

    fn do_insert_newline(&mut self, id: &BlockId) -> Result<EditResult, EditorError> {
        let index = self.position(id)?;
        let block = self.block_at(index);
        if self.reverts_to_paragraph(block) {
            return Ok(self.revert_to_paragraph(index));
        }

        let successor = block.next();
        let new_id = successor.id().clone();
        self.document.insert(index + 1, successor);
        Ok(EditResult::Inserted(new_id))
    }

    fn do_delete_at_beginning(&mut self, id: &BlockId) -> Result<EditResult, EditorError> {
        let index = self.position(id)?;
        if self.reverts_to_paragraph(self.block_at(index)) {
            return Ok(self.revert_to_paragraph(index));
        }

        self.document.remove(index);
        Ok(EditResult::Deleted {
            id: id.clone(),
            index,
        })
    }

    fn do_update_content(&mut self, id: &BlockId, text: String) -> Result<EditResult, EditorError> {
        let index = self.position(id)?;
        let mut updated = self.block_at(index).clone();
        updated.content = text;
        self.document.replace(index, updated);
        Ok(EditResult::ContentUpdated(id.clone()))
    }

    fn do_toggle_completion(&mut self, id: &BlockId) -> Result<Option<EditResult>, EditorError> {
        let index = self.position(id)?;
        let block = self.block_at(index);
        if block.kind != Kind::TODO {
            return Ok(None);
        }

        let mut updated = block.clone();
        updated.toggle_completion();
        self.document.replace(index, updated);
        Ok(Some(EditResult::ContentUpdated(id.clone())))
    }

    fn do_retype(&mut self, id: &BlockId, kind: Kind) -> Result<EditResult, EditorError> {
        let index = self.position(id)?;
        let mut updated = self.block_at(index).clone();
        let previous = std::mem::replace(&mut updated.kind, kind);
        updated
            .properties
            .retain(|key, _| !self.registry.drops_on_retype(key, &previous, &updated.kind));
        self.registry.fill_defaults(&mut updated);
        self.document.replace(index, updated);
        Ok(EditResult::RetypedKind(id.clone()))
    }

    fn do_insert_after(
        &mut self,
        mut block: Block,
        after: &BlockId,
    ) -> Result<EditResult, EditorError> {
        let index = self.position(after)?;
        self.ensure_absent(block.id())?;
        self.registry.fill_defaults(&mut block);

        let id = block.id().clone();
        self.document.insert(index + 1, block);
        Ok(EditResult::Inserted(id))
    }

    fn do_append(&mut self, mut block: Block) -> Result<EditResult, EditorError> {
        self.ensure_absent(block.id())?;
        self.registry.fill_defaults(&mut block);

        let id = block.id().clone();
        self.document.push(block);
        Ok(EditResult::Inserted(id))
    }

    fn do_append_new(&mut self) -> EditResult {
        let mut block = match self.document.last() {
            Some(last) => last.next(),
            None => Block::new(self.default_kind.clone()),
        };
        self.registry.fill_defaults(&mut block);
        let id = block.id().clone();
        self.document.push(block);
        EditResult::Inserted(id)
    }

    fn do_move(&mut self, id: &BlockId, to: usize) -> Result<EditResult, EditorError> {
        let from = self.position(id)?;
        // the document holds at least the moved block, so len - 1 is valid
        let to = to.min(self.document.len() - 1);
        let block = self.document.remove(from);
        self.document.insert(to, block);
        Ok(EditResult::Moved {
            id: id.clone(),
            from,
            to,
        })
    }

    fn do_delete(&mut self, id: &BlockId) -> Result<EditResult, EditorError> {
        let index = self.position(id)?;
        self.document.remove(index);
        Ok(EditResult::Deleted {
            id: id.clone(),
            index,
        })
    }

    fn do_set_property(
        &mut self,
        id: &BlockId,
        key: String,
        value: Option<String>,
    ) -> Result<Option<EditResult>, EditorError> {
        let index = self.position(id)?;
        let block = self.block_at(index);
        if block.get(&key) == value.as_deref() {
            return Ok(None);
        }

        let mut updated = block.clone();
        match value {
            Some(value) => updated.set(key, value),
            None => {
                updated.remove(&key);
            }
        }
        // clearing a defaulted key puts the default back
        self.registry.fill_defaults(&mut updated);
        if &updated == block {
            return Ok(None);
        }
        self.document.replace(index, updated);
        Ok(Some(EditResult::ContentUpdated(id.clone())))
    }
}
