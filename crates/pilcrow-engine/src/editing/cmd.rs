use crate::models::{Block, BlockId, Kind};

/// An edit intent submitted to the [`Editor`](crate::editing::Editor).
///
/// Every variant is applied atomically: it either completes fully or fails
/// with an error and leaves the document untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Return pressed at the end of a block
    InsertNewline { block: BlockId },
    /// Backspace pressed at the start of a block
    DeleteAtBeginning { block: BlockId },
    UpdateContent { block: BlockId, text: String },
    /// Flip a todo's completion state; ignored for other kinds
    ToggleCompletion { block: BlockId },
    Retype { block: BlockId, kind: Kind },
    InsertAfter { block: Block, after: BlockId },
    Append { block: Block },
    /// Append a successor of the last block, or a default block when empty
    AppendNew,
    /// Move to `to`, clamped to the last position
    Move { block: BlockId, to: usize },
    Delete { block: BlockId },
    /// Set (`Some`) or clear (`None`) a single property
    SetProperty {
        block: BlockId,
        key: String,
        value: Option<String>,
    },
}

impl Cmd {
    /// The existing block this command targets, if any
    pub fn target(&self) -> Option<&BlockId> {
        match self {
            Cmd::InsertNewline { block }
            | Cmd::DeleteAtBeginning { block }
            | Cmd::UpdateContent { block, .. }
            | Cmd::ToggleCompletion { block }
            | Cmd::Retype { block, .. }
            | Cmd::Move { block, .. }
            | Cmd::Delete { block }
            | Cmd::SetProperty { block, .. } => Some(block),
            Cmd::InsertAfter { after, .. } => Some(after),
            Cmd::Append { .. } | Cmd::AppendNew => None,
        }
    }
}
