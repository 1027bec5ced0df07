//! Class table loader.
//!
//! The class document is cross-referential in two directions: its own
//! `availableClasses` and category lists must resolve against
//! `classAttributes`, and every ability id in a class's level progression
//! must resolve against the ability table. The ability loader is injected at
//! construction, so rebuilds always check against the ability table's current
//! snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use coven_core::{ClassCategory, ClassDefinition};
use coven_schema::{Issue, Refinement, Schema, SchemaError, Spec, field, optional};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::loaders::abilities::AbilityLoader;
use crate::source::ContentSource;
use crate::store::DocumentSource;

const CATEGORY_NAMES: [&str; 4] = ["melee", "ranged", "magic", "support"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassDocument {
    available_classes: Vec<String>,
    class_attributes: BTreeMap<String, ClassDefinition>,
    #[serde(default)]
    #[allow(dead_code)] // validated by refinements; indices derive from each class's own category
    categories: BTreeMap<String, Vec<String>>,
}

/// Typed snapshot of the class table.
pub struct ClassCatalog {
    available: Vec<String>,
    classes: BTreeMap<String, ClassDefinition>,
    by_category: BTreeMap<ClassCategory, Vec<String>>,
}

fn class_schema() -> Schema {
    Schema::record([
        field("name", Schema::string().non_empty()),
        field("category", Schema::string().one_of(CATEGORY_NAMES)),
        optional("description", Schema::string()),
        field(
            "base",
            Schema::record([
                field("hp", Schema::int().min(1)),
                field("armor", Schema::int()),
                field("damageModifier", Schema::float().min(0.0)),
            ]),
        ),
        optional(
            "progression",
            Schema::seq(Schema::record([
                field("level", Schema::int().min(1)),
                field("abilities", Schema::seq(Schema::string().non_empty())),
            ])),
        ),
    ])
}

fn defined_class_ids(document: &Value) -> BTreeSet<&str> {
    document["classAttributes"]
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Specification for the class document.
pub fn spec() -> Spec {
    let root = Schema::record([
        field("availableClasses", Schema::seq(Schema::string().non_empty())),
        field("classAttributes", Schema::map(class_schema())),
        optional("categories", Schema::map(Schema::seq(Schema::string().non_empty()))),
    ]);
    Spec::new("classes", root)
        .with_refinement(Refinement::new(
            "available-classes-resolve",
            "availableClasses",
            "every id must have a matching entry in classAttributes",
            |v| {
                let defined = defined_class_ids(v);
                v["availableClasses"].as_array().is_some_and(|ids| {
                    ids.iter()
                        .all(|id| id.as_str().is_some_and(|id| defined.contains(id)))
                })
            },
        ))
        .with_refinement(Refinement::new(
            "category-members-resolve",
            "categories",
            "every category member must have a matching entry in classAttributes",
            |v| {
                let defined = defined_class_ids(v);
                v["categories"].as_object().is_none_or(|categories| {
                    categories.values().all(|members| {
                        members.as_array().is_some_and(|ids| {
                            ids.iter()
                                .all(|id| id.as_str().is_some_and(|id| defined.contains(id)))
                        })
                    })
                })
            },
        ))
        .with_refinement(Refinement::new(
            "category-names-known",
            "categories",
            "category keys must be one of: melee, ranged, magic, support",
            |v| {
                v["categories"].as_object().is_none_or(|categories| {
                    categories.keys().all(|k| CATEGORY_NAMES.contains(&k.as_str()))
                })
            },
        ))
}

fn build_catalog(document: &Value, ability_ids: &BTreeSet<String>) -> Result<ClassCatalog> {
    let doc: ClassDocument = spec().parse(document)?;

    let mut classes = doc.class_attributes;
    for (id, class) in &mut classes {
        class.id = id.clone();
    }

    // Cross-document check: progression entries must resolve against the
    // ability table's current snapshot.
    let mut issues = Vec::new();
    for (id, class) in &classes {
        for ability_id in class.referenced_abilities() {
            if !ability_ids.contains(ability_id) {
                issues.push(Issue::new(
                    format!("classAttributes.{id}.progression"),
                    format!("references unknown ability '{ability_id}'"),
                ));
            }
        }
    }
    if !issues.is_empty() {
        return Err(SchemaError {
            spec: "classes".to_string(),
            errors: issues,
            warnings: Vec::new(),
        }
        .into());
    }

    let mut by_category: BTreeMap<ClassCategory, Vec<String>> = BTreeMap::new();
    for (id, class) in &classes {
        by_category
            .entry(class.category)
            .or_default()
            .push(id.clone());
    }

    Ok(ClassCatalog {
        available: doc.available_classes,
        classes,
        by_category,
    })
}

/// Loader for the class table.
pub struct ClassLoader {
    inner: ContentSource<ClassCatalog>,
}

impl ClassLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/classes.toml";

    /// Loads the table, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>, abilities: Arc<AbilityLoader>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("classes", DocumentSource::new(path), move |document| {
            build_catalog(document, &abilities.all_ids())
        })?;
        tracing::info!(
            "Loaded {} classes from {}",
            inner.peek().classes.len(),
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    pub fn get(&self, id: &str) -> Option<ClassDefinition> {
        self.inner.snapshot().classes.get(id).cloned()
    }

    /// Resolves a batch of ids, silently skipping unresolvable ones.
    pub fn get_many<I, S>(&self, ids: I) -> Vec<ClassDefinition>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.inner.snapshot();
        ids.into_iter()
            .filter_map(|id| snapshot.classes.get(id.as_ref()).cloned())
            .collect()
    }

    pub fn get_by_category(&self, category: ClassCategory) -> Vec<ClassDefinition> {
        let snapshot = self.inner.snapshot();
        snapshot
            .by_category
            .get(&category)
            .into_iter()
            .flatten()
            .filter_map(|id| snapshot.classes.get(id).cloned())
            .collect()
    }

    /// Class ids offered to players at game start.
    pub fn available(&self) -> Vec<String> {
        self.inner.snapshot().available.clone()
    }

    pub fn all_ids(&self) -> BTreeSet<String> {
        self.inner.snapshot().classes.keys().cloned().collect()
    }

    /// A copy of the full table; callers never observe the live snapshot.
    pub fn all(&self) -> BTreeMap<String, ClassDefinition> {
        self.inner.snapshot().classes.clone()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }

    /// Ability ids a member of `class_id` has unlocked at `level`.
    pub fn abilities_for(&self, class_id: &str, level: u32) -> Vec<String> {
        self.inner
            .snapshot()
            .classes
            .get(class_id)
            .map(|class| {
                class
                    .abilities_at_level(level)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
