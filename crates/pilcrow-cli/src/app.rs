use anyhow::Result;
use pilcrow_config::EditorConfig;
use pilcrow_engine::{
    BlockId, ChangeStream, Document, DocumentFile, DocumentLibrary, EditResult, Editor,
    EditorError, Kind, io,
};
use ratatui::widgets::ListState;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Files,
    Blocks,
    /// Typing goes into the selected block
    Insert,
}

/// A document being edited, with the subscription used to follow its changes
pub struct OpenDocument {
    pub file: DocumentFile,
    pub editor: Editor,
    changes: ChangeStream,
    pub dirty: bool,
}

impl OpenDocument {
    pub fn new(file: DocumentFile, editor: Editor) -> Self {
        let changes = editor.subscribe();
        Self {
            file,
            editor,
            changes,
            dirty: false,
        }
    }
}

pub struct App {
    pub documents_path: PathBuf,
    pub library: DocumentLibrary,
    pub file_list_state: ListState,
    pub block_list_state: ListState,
    pub editor_config: EditorConfig,
    pub open: Option<OpenDocument>,
    pub focus: Focus,
    pub status: String,
}

impl App {
    pub fn new(documents_path: PathBuf, editor_config: EditorConfig) -> Result<Self> {
        let library = io::build_library(&documents_path)?;

        let mut app = Self {
            documents_path,
            library,
            file_list_state: ListState::default(),
            block_list_state: ListState::default(),
            editor_config,
            open: None,
            focus: Focus::Files,
            status: String::new(),
        };

        if !app.library.is_empty() {
            app.file_list_state.select(Some(0));
        }

        Ok(app)
    }

    // ----- files -----

    pub fn next_file(&mut self) {
        if self.library.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.library.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
    }

    pub fn previous_file(&mut self) {
        if self.library.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.library.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
    }

    pub fn open_selected_file(&mut self) -> Result<()> {
        let Some(file) = self
            .file_list_state
            .selected()
            .and_then(|index| self.library.get(index))
            .cloned()
        else {
            return Ok(());
        };

        let document = io::load_document(file.relative_path(), &self.documents_path)?;
        self.open_document(file, document);
        Ok(())
    }

    /// Create `Untitled[ - n]` with one default block and open it
    pub fn new_document(&mut self) -> Result<()> {
        let path = io::unique_document_path(&self.documents_path);
        let mut editor = self.editor_for(Document::default());
        editor.append_new()?;
        io::save_document(&path, &self.documents_path, editor.document())?;

        self.library.add(path.clone());
        let document = editor.into_document();
        self.open_document(DocumentFile::new(path), document);
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        if let Some(open) = self.open.as_mut() {
            io::save_document(
                open.file.relative_path(),
                &self.documents_path,
                open.editor.document(),
            )?;
            open.dirty = false;
            self.status = format!("Saved {}", open.file.display_name());
        }
        Ok(())
    }

    fn editor_for(&self, document: Document) -> Editor {
        Editor::with_options(document, self.editor_config.editor_options())
    }

    fn open_document(&mut self, file: DocumentFile, document: Document) {
        let has_blocks = !document.is_empty();
        let editor = self.editor_for(document);
        self.status = format!("Opened {}", file.display_name());
        self.open = Some(OpenDocument::new(file, editor));
        self.block_list_state
            .select(if has_blocks { Some(0) } else { None });
        self.focus = Focus::Blocks;
    }

    // ----- blocks -----

    pub fn document(&self) -> Option<&Document> {
        self.open.as_ref().map(|open| open.editor.document())
    }

    pub fn selected_block_id(&self) -> Option<BlockId> {
        let index = self.block_list_state.selected()?;
        self.document()?.block_at(index).map(|block| block.id().clone())
    }

    pub fn next_block(&mut self) {
        let len = self.document().map_or(0, Document::len);
        if let Some(i) = self.block_list_state.selected()
            && i + 1 < len
        {
            self.block_list_state.select(Some(i + 1));
        }
    }

    pub fn previous_block(&mut self) {
        if let Some(i) = self.block_list_state.selected() {
            self.block_list_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn insert_newline(&mut self) {
        self.edit_selected(|editor, id| editor.insert_newline(id));
    }

    /// Backspace in insert mode: trim the last character, or hand an empty
    /// block to the editor's delete-at-beginning rule
    pub fn backspace(&mut self) {
        let Some(content) = self.selected_content() else {
            return;
        };
        if content.is_empty() {
            self.edit_selected(|editor, id| editor.delete_at_beginning(id));
        } else {
            let mut text = content;
            text.pop();
            self.edit_selected(|editor, id| editor.update_content(id, text));
        }
    }

    pub fn type_char(&mut self, c: char) {
        let Some(mut text) = self.selected_content() else {
            return;
        };
        text.push(c);
        self.edit_selected(|editor, id| editor.update_content(id, text));
    }

    pub fn toggle_completion(&mut self) {
        self.edit_selected(|editor, id| editor.toggle_completion(id));
    }

    /// Retype the selected block to the next registered kind
    pub fn cycle_kind(&mut self) {
        self.edit_selected(|editor, id| {
            let current = editor
                .document()
                .block_with(id)
                .map(|block| block.kind.clone());
            let next = {
                let kinds = editor.registry().kinds();
                let next_index = kinds
                    .iter()
                    .position(|kind| Some(*kind) == current.as_ref())
                    .map_or(0, |i| (i + 1) % kinds.len());
                kinds
                    .get(next_index)
                    .map_or(Kind::PARAGRAPH, |kind| (*kind).clone())
            };
            editor.retype(id, next)
        });
    }

    pub fn move_selected_down(&mut self) {
        if let Some(index) = self.block_list_state.selected() {
            self.edit_selected(|editor, id| editor.move_block(id, index + 1));
        }
    }

    pub fn move_selected_up(&mut self) {
        if let Some(index) = self.block_list_state.selected() {
            self.edit_selected(|editor, id| editor.move_block(id, index.saturating_sub(1)));
        }
    }

    pub fn delete_selected(&mut self) {
        self.edit_selected(|editor, id| editor.delete(id));
    }

    pub fn append_new(&mut self) {
        if let Some(open) = self.open.as_mut() {
            if let Err(e) = open.editor.append_new() {
                self.status = format!("Edit failed: {e}");
            }
            self.reconcile();
        }
    }

    fn selected_content(&self) -> Option<String> {
        let id = self.selected_block_id()?;
        self.document()?
            .block_with(&id)
            .map(|block| block.content.clone())
    }

    fn edit_selected<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Editor, &BlockId) -> Result<Option<EditResult>, EditorError>,
    {
        let Some(id) = self.selected_block_id() else {
            return;
        };
        let Some(open) = self.open.as_mut() else {
            return;
        };
        if let Err(e) = edit(&mut open.editor, &id) {
            // a stale selection is not worth aborting the session for
            log::warn!("edit on {id} failed: {e}");
            self.status = format!("Edit failed: {e}");
        }
        self.reconcile();
    }

    /// Follow the editor's change notifications to keep the selection on the
    /// block the user is working with
    fn reconcile(&mut self) {
        let Some(open) = self.open.as_mut() else {
            return;
        };

        for change in open.changes.drain() {
            open.dirty = true;
            let len = open.editor.document().len();
            match change {
                EditResult::Inserted(id) => {
                    self.block_list_state
                        .select(open.editor.document().index_of(&id));
                }
                EditResult::Deleted { index, .. } => {
                    let fallback = if len == 0 {
                        None
                    } else {
                        Some(index.saturating_sub(1).min(len - 1))
                    };
                    self.block_list_state.select(fallback);
                }
                EditResult::Moved { to, .. } => self.block_list_state.select(Some(to)),
                EditResult::RetypedKind(_) | EditResult::ContentUpdated(_) => {}
            }
        }
    }
}
