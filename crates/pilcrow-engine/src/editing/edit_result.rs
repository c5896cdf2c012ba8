use crate::models::BlockId;

/// Change notification emitted once per successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Inserted(BlockId),
    RetypedKind(BlockId),
    ContentUpdated(BlockId),
    /// `index` is where the block sat before removal, so a view can pick a
    /// neighbour to focus
    Deleted { id: BlockId, index: usize },
    Moved { id: BlockId, from: usize, to: usize },
}

impl EditResult {
    /// The block affected by this change
    pub fn id(&self) -> &BlockId {
        match self {
            EditResult::Inserted(id)
            | EditResult::RetypedKind(id)
            | EditResult::ContentUpdated(id)
            | EditResult::Deleted { id, .. }
            | EditResult::Moved { id, .. } => id,
        }
    }
}
