use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockId, Kind, KindRegistry, ModelError};

/// An ordered sequence of blocks.
///
/// Ordering is reading order. Lookups go by block identity, never by value:
/// two blocks can share kind, content and properties and still be distinct.
/// Only the editor mutates a document after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRepr")]
pub struct Document {
    blocks: Vec<Block>,
}

/// Unvalidated wire shape of a document
#[derive(Deserialize)]
struct DocumentRepr {
    #[serde(default)]
    blocks: Vec<Block>,
}

impl TryFrom<DocumentRepr> for Document {
    type Error = ModelError;

    fn try_from(repr: DocumentRepr) -> Result<Self, Self::Error> {
        Document::new(repr.blocks)
    }
}

impl Document {
    /// Build a document, rejecting duplicate block ids.
    ///
    /// Blocks missing a built-in default for their kind (a todo without
    /// `completed`) get it filled in.
    pub fn new(blocks: Vec<Block>) -> Result<Self, ModelError> {
        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen.insert(block.id()) {
                return Err(ModelError::DuplicateId(block.id().clone()));
            }
        }
        let mut document = Self { blocks };
        document.fill_defaults(KindRegistry::builtin());
        Ok(document)
    }

    /// Give every block the default properties `registry` declares for its kind
    pub(crate) fn fill_defaults(&mut self, registry: &KindRegistry) {
        for block in &mut self.blocks {
            registry.fill_defaults(block);
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of the block with `id`
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id() == id)
    }

    pub fn block_with(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id() == id)
    }

    pub fn block_at(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.blocks.iter().map(Block::id)
    }

    pub(crate) fn insert(&mut self, position: usize, block: Block) {
        self.blocks.insert(position, block);
    }

    pub(crate) fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn remove(&mut self, position: usize) -> Block {
        self.blocks.remove(position)
    }

    pub(crate) fn replace(&mut self, position: usize, block: Block) {
        self.blocks[position] = block;
    }

    /// Demo document containing one block of every built-in kind
    pub fn sample() -> Self {
        Self {
            blocks: vec![
                Block::with_content(Kind::HEADING, "Heading"),
                Block::paragraph("Paragraph"),
                Block::with_content(Kind::LIST_ITEM, "Bullet list item")
                    .with_property("type", "bullet"),
                Block::with_content(Kind::LIST_ITEM, "Ordered list item")
                    .with_property("type", "numbered")
                    .with_property("index", "1"),
                Block::paragraph("Paragraph that is much longer so it will wrap to multiple lines"),
                Block::with_content(Kind::TODO, "Todo"),
                Block::new(Kind::DIVIDER),
                Block::paragraph("Another paragraph"),
                Block::with_content(
                    Kind::TODO,
                    "Completed todo that is also much longer so we can test how it wraps",
                )
                .with_property("completed", "true"),
                Block::with_content(
                    Kind::QUOTE,
                    "You miss 100% of the shots you don't take - Wayne Gretzky\n- Michael Scott",
                ),
                Block::paragraph("Final paragraph"),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
