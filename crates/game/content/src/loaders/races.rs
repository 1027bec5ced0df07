//! Race table loader.
//!
//! Cross-document: every entry of a race's `compatibleClasses` must resolve
//! against the class table, injected at construction.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use coven_core::RaceDefinition;
use coven_schema::{Issue, Schema, SchemaError, Spec, field, optional};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::loaders::classes::ClassLoader;
use crate::source::ContentSource;
use crate::store::DocumentSource;

#[derive(Deserialize)]
struct RaceDocument {
    races: BTreeMap<String, RaceDefinition>,
}

/// Typed snapshot of the race table.
pub struct RaceCatalog {
    races: BTreeMap<String, RaceDefinition>,
}

fn race_schema() -> Schema {
    Schema::record([
        field("name", Schema::string().non_empty()),
        optional("description", Schema::string()),
        field("compatibleClasses", Schema::seq(Schema::string().non_empty())),
        optional(
            "modifiers",
            Schema::record([
                optional("hpPercent", Schema::float().min(0.0)),
                optional("damagePercent", Schema::float().min(0.0)),
                optional("armorBonus", Schema::int()),
            ]),
        ),
        optional("special", Schema::string().non_empty()),
    ])
}

/// Specification for the race document.
pub fn spec() -> Spec {
    Spec::new(
        "races",
        Schema::record([field("races", Schema::map(race_schema()))]),
    )
}

fn build_catalog(document: &Value, class_ids: &BTreeSet<String>) -> Result<RaceCatalog> {
    let doc: RaceDocument = spec().parse(document)?;

    let mut races = doc.races;
    for (id, race) in &mut races {
        race.id = id.clone();
    }

    let mut issues = Vec::new();
    for (id, race) in &races {
        for class_id in &race.compatible_classes {
            if !class_ids.contains(class_id) {
                issues.push(Issue::new(
                    format!("races.{id}.compatibleClasses"),
                    format!("references unknown class '{class_id}'"),
                ));
            }
        }
    }
    if !issues.is_empty() {
        return Err(SchemaError {
            spec: "races".to_string(),
            errors: issues,
            warnings: Vec::new(),
        }
        .into());
    }

    Ok(RaceCatalog { races })
}

/// Loader for the race table.
pub struct RaceLoader {
    inner: ContentSource<RaceCatalog>,
}

impl RaceLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/races.toml";

    /// Loads the table, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>, classes: Arc<ClassLoader>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("races", DocumentSource::new(path), move |document| {
            build_catalog(document, &classes.all_ids())
        })?;
        tracing::info!(
            "Loaded {} races from {}",
            inner.peek().races.len(),
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    pub fn get(&self, id: &str) -> Option<RaceDefinition> {
        self.inner.snapshot().races.get(id).cloned()
    }

    /// Resolves a batch of ids, silently skipping unresolvable ones.
    pub fn get_many<I, S>(&self, ids: I) -> Vec<RaceDefinition>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.inner.snapshot();
        ids.into_iter()
            .filter_map(|id| snapshot.races.get(id.as_ref()).cloned())
            .collect()
    }

    /// Races that may play the given class.
    pub fn compatible_with_class(&self, class_id: &str) -> Vec<RaceDefinition> {
        self.inner
            .snapshot()
            .races
            .values()
            .filter(|race| race.supports_class(class_id))
            .cloned()
            .collect()
    }

    pub fn all_ids(&self) -> BTreeSet<String> {
        self.inner.snapshot().races.keys().cloned().collect()
    }

    /// A copy of the full table; callers never observe the live snapshot.
    pub fn all(&self) -> BTreeMap<String, RaceDefinition> {
        self.inner.snapshot().races.clone()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }
}
