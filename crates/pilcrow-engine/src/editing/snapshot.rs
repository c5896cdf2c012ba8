use crate::models::Document;

/// Immutable copy of an editor's document for readers.
///
/// Readers on other threads work from a snapshot instead of the live
/// document, so they never observe a half-applied edit. `version` lets a view
/// detect whether it is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Editor version at the time the snapshot was taken
    pub version: u64,
    pub document: Document,
}

impl Snapshot {
    pub fn is_newer_than(&self, version: u64) -> bool {
        self.version > version
    }
}
