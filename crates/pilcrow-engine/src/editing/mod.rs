/*!
 * # Editing core
 *
 * The [`Editor`] owns a [`Document`](crate::models::Document) and is the only
 * thing allowed to change it.
 *
 * ## Edit loop
 *
 * 1. The caller (a view layer) turns user input into a [`Cmd`]
 * 2. [`Editor::apply`] validates the target block and applies the change atomically
 * 3. On success the editor bumps its version and broadcasts one [`EditResult`]
 * 4. Subscribers reconcile their view from the event without diffing documents
 *
 * ## Module Structure
 *
 * - **`cmd`**: `Cmd` enum, one variant per edit intent
 * - **`editor`**: `Editor`, its options and `EditorError`
 * - **`edit_result`**: change notifications
 * - **`changes`**: `ChangeStream`, the subscriber side of the broadcast channel
 * - **`snapshot`**: immutable versioned copies for readers
 *
 * ## Usage Pattern
 *
 * ```rust
 * use pilcrow_engine::editing::*;
 * use pilcrow_engine::models::{Block, Document, Kind};
 *
 * let todo = Block::with_content(Kind::TODO, "water plants");
 * let id = todo.id().clone();
 * let mut editor = Editor::new(Document::new(vec![todo]).unwrap());
 * let mut changes = editor.subscribe();
 *
 * editor.apply(Cmd::ToggleCompletion { block: id.clone() }).unwrap();
 *
 * assert!(editor.document().block_with(&id).unwrap().is_completed());
 * assert_eq!(changes.try_next(), Some(EditResult::ContentUpdated(id)));
 * ```
 */

pub mod changes;
pub mod cmd;
pub mod edit_result;
pub mod editor;
pub mod snapshot;

pub use changes::{ChangeStream, DEFAULT_CHANGE_BUFFER};
pub use cmd::Cmd;
pub use edit_result::EditResult;
pub use editor::{Editor, EditorError, EditorOptions};
pub use snapshot::Snapshot;
