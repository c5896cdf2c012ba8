use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::models::{Block, COMPLETED_KEY, ModelError};

static BUILTIN: LazyLock<KindRegistry> = LazyLock::new(KindRegistry::default);

/// Open-ended tag naming a block's semantic type.
///
/// Kinds are plain strings so applications can introduce their own (a "color"
/// swatch, an embed, ...) without touching the model. The well-known kinds are
/// available as associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Kind(Cow<'static, str>);

impl Kind {
    pub const PARAGRAPH: Kind = Kind(Cow::Borrowed("paragraph"));
    pub const HEADING: Kind = Kind(Cow::Borrowed("heading"));
    pub const QUOTE: Kind = Kind(Cow::Borrowed("quote"));
    pub const TODO: Kind = Kind(Cow::Borrowed("todo"));
    pub const LIST_ITEM: Kind = Kind(Cow::Borrowed("listItem"));
    pub const DIVIDER: Kind = Kind(Cow::Borrowed("divider"));

    /// Create a kind from its name. Empty names are rejected.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyKind);
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_paragraph(&self) -> bool {
        *self == Self::PARAGRAPH
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Kind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Kind {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.0.into_owned()
    }
}

/// Behaviour attached to a kind: how it is labelled, whether it carries text,
/// and which properties only make sense for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSpec {
    pub title: Cow<'static, str>,
    /// Decorative kinds carry no text (divider, color swatch)
    pub decorative: bool,
    /// Property keys that belong to this kind and are dropped when a block is
    /// retyped to a kind that does not own them
    pub owned_properties: Vec<Cow<'static, str>>,
    /// Properties every block of this kind carries, with their initial values
    pub default_properties: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl KindSpec {
    pub fn text(title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            decorative: false,
            owned_properties: Vec::new(),
            default_properties: Vec::new(),
        }
    }

    pub fn decorative(title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            decorative: true,
            ..Self::text(title)
        }
    }

    pub fn owning<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.owned_properties.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Own `key` and give it `value` on blocks that lack it
    pub fn with_default(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        let key = key.into();
        if !self.owns(&key) {
            self.owned_properties.push(key.clone());
        }
        self.default_properties.push((key, value.into()));
        self
    }

    pub fn owns(&self, key: &str) -> bool {
        self.owned_properties.iter().any(|owned| owned == key)
    }
}

/// Lookup table from kind to behaviour.
///
/// Kind-specific decisions (is this block decorative, which properties survive
/// a retype) go through the registry instead of matching on kind names.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    specs: HashMap<Kind, KindSpec>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Kind::PARAGRAPH, KindSpec::text("Paragraph"));
        registry.register(Kind::HEADING, KindSpec::text("Heading"));
        registry.register(Kind::QUOTE, KindSpec::text("Quote"));
        registry.register(
            Kind::TODO,
            KindSpec::text("To do").with_default(COMPLETED_KEY, "false"),
        );
        registry.register(
            Kind::LIST_ITEM,
            KindSpec::text("List item").owning(["type", "index"]),
        );
        registry.register(Kind::DIVIDER, KindSpec::decorative("Divider"));
        registry
    }
}

impl KindRegistry {
    /// A registry with no kinds at all; every kind falls back to text-bearing
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Add or replace the behaviour of a kind
    pub fn register(&mut self, kind: Kind, spec: KindSpec) -> &mut Self {
        self.specs.insert(kind, spec);
        self
    }

    /// Shared copy of the default registry
    pub fn builtin() -> &'static KindRegistry {
        &BUILTIN
    }

    pub fn get(&self, kind: &Kind) -> Option<&KindSpec> {
        self.specs.get(kind)
    }

    pub fn is_decorative(&self, kind: &Kind) -> bool {
        self.get(kind).is_some_and(|spec| spec.decorative)
    }

    pub fn is_text(&self, kind: &Kind) -> bool {
        !self.is_decorative(kind)
    }

    /// Human readable label, falling back to the capitalized kind name
    pub fn title(&self, kind: &Kind) -> String {
        match self.get(kind) {
            Some(spec) => spec.title.to_string(),
            None => capitalize(kind.as_str()),
        }
    }

    /// Give `block` every default property of its kind it does not already
    /// have. Existing values are left alone.
    pub fn fill_defaults(&self, block: &mut Block) {
        let Some(spec) = self.get(&block.kind) else {
            return;
        };
        for (key, value) in &spec.default_properties {
            if block.get(key).is_none() {
                block.set(key.clone(), value.clone());
            }
        }
    }

    /// Whether `key` should be dropped when retyping from `from` to `to`
    pub(crate) fn drops_on_retype(&self, key: &str, from: &Kind, to: &Kind) -> bool {
        let owned_by_old = self.get(from).is_some_and(|spec| spec.owns(key));
        let owned_by_new = self.get(to).is_some_and(|spec| spec.owns(key));
        owned_by_old && !owned_by_new
    }

    /// Registered kinds sorted by name
    pub fn kinds(&self) -> Vec<&Kind> {
        let mut kinds: Vec<_> = self.specs.keys().collect();
        kinds.sort();
        kinds
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
