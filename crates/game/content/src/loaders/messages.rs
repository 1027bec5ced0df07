//! Message template table loader.
//!
//! The document may declare the category list it intends to cover; a declared
//! category with zero entries is a warning, not an error.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use coven_core::MessageTemplate;
use coven_schema::{Refinement, Schema, Spec, field, optional};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::source::ContentSource;
use crate::store::DocumentSource;

#[derive(Deserialize)]
struct MessageDocument {
    #[serde(default)]
    #[allow(dead_code)] // coverage is checked by the zero-entry warning refinement
    categories: Vec<String>,
    messages: BTreeMap<String, MessageTemplate>,
}

/// Typed snapshot of the message table.
pub struct MessageCatalog {
    messages: BTreeMap<String, MessageTemplate>,
    by_category: BTreeMap<String, Vec<String>>,
}

fn template_schema() -> Schema {
    Schema::record([
        field("text", Schema::string().non_empty()),
        field("category", Schema::string().non_empty()),
    ])
}

/// Specification for the message document.
pub fn spec() -> Spec {
    let root = Schema::record([
        optional("categories", Schema::seq(Schema::string().non_empty())),
        field("messages", Schema::map(template_schema())),
    ]);
    Spec::new("messages", root).with_refinement(Refinement::warning(
        "declared-categories-nonempty",
        "categories",
        "a declared category has zero entries",
        |v| {
            let Some(declared) = v["categories"].as_array() else {
                return true;
            };
            let Some(messages) = v["messages"].as_object() else {
                return true;
            };
            declared.iter().all(|category| {
                category.as_str().is_some_and(|category| {
                    messages
                        .values()
                        .any(|m| m["category"].as_str() == Some(category))
                })
            })
        },
    ))
}

fn build_catalog(document: &Value) -> Result<MessageCatalog> {
    let doc: MessageDocument = spec().parse(document)?;

    let mut messages = doc.messages;
    for (id, message) in &mut messages {
        message.id = id.clone();
    }

    let mut by_category: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (id, message) in &messages {
        by_category
            .entry(message.category.clone())
            .or_default()
            .push(id.clone());
    }

    Ok(MessageCatalog {
        messages,
        by_category,
    })
}

/// Loader for the message template table.
pub struct MessageLoader {
    inner: ContentSource<MessageCatalog>,
}

impl MessageLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/messages.toml";

    /// Loads the table, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("messages", DocumentSource::new(path), build_catalog)?;
        tracing::info!(
            "Loaded {} message templates from {}",
            inner.peek().messages.len(),
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    pub fn get(&self, id: &str) -> Option<MessageTemplate> {
        self.inner.snapshot().messages.get(id).cloned()
    }

    /// Resolves a batch of ids, silently skipping unresolvable ones.
    pub fn get_many<I, S>(&self, ids: I) -> Vec<MessageTemplate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.inner.snapshot();
        ids.into_iter()
            .filter_map(|id| snapshot.messages.get(id.as_ref()).cloned())
            .collect()
    }

    pub fn get_by_category(&self, category: &str) -> Vec<MessageTemplate> {
        let snapshot = self.inner.snapshot();
        snapshot
            .by_category
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|id| snapshot.messages.get(id).cloned())
            .collect()
    }

    /// Renders the template with the given arguments; `None` for unknown ids.
    pub fn render(&self, id: &str, args: &HashMap<String, String>) -> Option<String> {
        self.inner
            .snapshot()
            .messages
            .get(id)
            .map(|m| m.render(args))
    }

    pub fn all_ids(&self) -> BTreeSet<String> {
        self.inner.snapshot().messages.keys().cloned().collect()
    }

    /// A copy of the full table; callers never observe the live snapshot.
    pub fn all(&self) -> BTreeMap<String, MessageTemplate> {
        self.inner.snapshot().messages.clone()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }
}
