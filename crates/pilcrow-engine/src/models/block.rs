use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Kind, KindRegistry, ModelError};

/// Property key holding a todo block's completion state
pub const COMPLETED_KEY: &str = "completed";

/// Stable identifier of a block within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BlockId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for BlockId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

pub type Properties = BTreeMap<String, String>;

/// A single addressable unit of document content.
///
/// Blocks are values: the editor mutates a document by replacing the block at
/// a position, never by sharing references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) id: BlockId,
    pub kind: Kind,
    pub content: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Block {
    /// Create an empty block of `kind` with a fresh id and the built-in
    /// defaults for that kind
    pub fn new(kind: Kind) -> Self {
        let mut block = Self {
            id: BlockId::generate(),
            kind,
            content: String::new(),
            properties: Properties::new(),
        };
        KindRegistry::builtin().fill_defaults(&mut block);
        block
    }

    pub fn with_content(kind: Kind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(kind)
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::with_content(Kind::PARAGRAPH, content)
    }

    /// Replace the generated id, e.g. when rebuilding a block from storage
    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = id;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// Successor block: same kind and properties, empty content, new id.
    ///
    /// Used when splitting on newline or auto-appending so contextual
    /// attributes (list membership, colour) carry over to the next block.
    pub fn next(&self) -> Block {
        Block {
            id: BlockId::generate(),
            kind: self.kind.clone(),
            content: String::new(),
            properties: self.properties.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }

    pub fn is_decorative(&self, registry: &KindRegistry) -> bool {
        registry.is_decorative(&self.kind)
    }

    /// Empty for edit decisions: no text, or a kind that carries none
    pub fn is_empty(&self, registry: &KindRegistry) -> bool {
        self.content.is_empty() || self.is_decorative(registry)
    }

    pub fn is_completed(&self) -> bool {
        self.get(COMPLETED_KEY) == Some("true")
    }

    pub fn mark_completed(&mut self) {
        self.set(COMPLETED_KEY, "true");
    }

    pub fn mark_uncompleted(&mut self) {
        self.set(COMPLETED_KEY, "false");
    }

    pub fn toggle_completion(&mut self) {
        if self.is_completed() {
            self.mark_uncompleted();
        } else {
            self.mark_completed();
        }
    }
}

/// Free-function form of [`Block::next`]
pub fn next_of(block: &Block) -> Block {
    block.next()
}
