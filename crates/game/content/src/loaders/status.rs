//! Status effect table loader.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use coven_core::{StatusEffectDefinition, StatusEffectKind};
use coven_schema::{Schema, Spec, field, optional};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::source::ContentSource;
use crate::store::DocumentSource;

#[derive(Deserialize)]
struct StatusDocument {
    effects: BTreeMap<String, StatusEffectDefinition>,
}

/// Typed snapshot of the status effect table.
pub struct StatusEffectCatalog {
    effects: BTreeMap<String, StatusEffectDefinition>,
    by_kind: BTreeMap<StatusEffectKind, Vec<String>>,
}

fn stacking_schema() -> Schema {
    Schema::union([
        Schema::record([field(
            "mode",
            Schema::string().one_of(["refresh", "ignore"]),
        )]),
        Schema::record([
            field("mode", Schema::string().one_of(["stack"])),
            field("maxStacks", Schema::int().min(1)),
        ]),
    ])
}

fn effect_schema() -> Schema {
    Schema::record([
        field("name", Schema::string().non_empty()),
        field(
            "kind",
            Schema::string().one_of(["buff", "debuff", "damageOverTime", "control"]),
        ),
        field("defaultDuration", Schema::int().min(1)),
        optional("stacking", stacking_schema()),
        optional(
            "tick",
            Schema::record([
                field("amount", Schema::int().min(0)),
                field("kind", Schema::string().one_of(["damage", "healing"])),
            ]),
        ),
        optional(
            "messages",
            Schema::record([
                optional("applied", Schema::string().non_empty()),
                optional("expired", Schema::string().non_empty()),
                optional("tick", Schema::string().non_empty()),
            ]),
        ),
    ])
}

/// Specification for the status effect document.
pub fn spec() -> Spec {
    Spec::new(
        "statusEffects",
        Schema::record([field("effects", Schema::map(effect_schema()))]),
    )
}

fn build_catalog(document: &Value) -> Result<StatusEffectCatalog> {
    let doc: StatusDocument = spec().parse(document)?;

    let mut effects = doc.effects;
    for (id, effect) in &mut effects {
        effect.id = id.clone();
    }

    let mut by_kind: BTreeMap<StatusEffectKind, Vec<String>> = BTreeMap::new();
    for (id, effect) in &effects {
        by_kind.entry(effect.kind).or_default().push(id.clone());
    }

    Ok(StatusEffectCatalog { effects, by_kind })
}

/// Loader for the status effect table.
pub struct StatusEffectLoader {
    inner: ContentSource<StatusEffectCatalog>,
}

impl StatusEffectLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/statusEffects.toml";

    /// Loads the table, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("statusEffects", DocumentSource::new(path), build_catalog)?;
        tracing::info!(
            "Loaded {} status effects from {}",
            inner.peek().effects.len(),
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    pub fn get(&self, id: &str) -> Option<StatusEffectDefinition> {
        self.inner.snapshot().effects.get(id).cloned()
    }

    /// Resolves a batch of ids, silently skipping unresolvable ones.
    pub fn get_many<I, S>(&self, ids: I) -> Vec<StatusEffectDefinition>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.inner.snapshot();
        ids.into_iter()
            .filter_map(|id| snapshot.effects.get(id.as_ref()).cloned())
            .collect()
    }

    pub fn get_by_kind(&self, kind: StatusEffectKind) -> Vec<StatusEffectDefinition> {
        let snapshot = self.inner.snapshot();
        snapshot
            .by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|id| snapshot.effects.get(id).cloned())
            .collect()
    }

    pub fn all_ids(&self) -> BTreeSet<String> {
        self.inner.snapshot().effects.keys().cloned().collect()
    }

    /// A copy of the full table; callers never observe the live snapshot.
    pub fn all(&self) -> BTreeMap<String, StatusEffectDefinition> {
        self.inner.snapshot().effects.clone()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }
}

#[cfg(test)]
mod tests {
    use coven_core::StackingRule;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_stacking_variants() {
        let document = json!({
            "effects": {
                "poison": {
                    "name": "Poison",
                    "kind": "damageOverTime",
                    "defaultDuration": 3,
                    "stacking": {"mode": "stack", "maxStacks": 3},
                    "tick": {"amount": 2, "kind": "damage"},
                },
                "stun": {
                    "name": "Stun",
                    "kind": "control",
                    "defaultDuration": 1,
                }
            }
        });
        let catalog = build_catalog(&document).expect("valid document");
        assert_eq!(
            catalog.effects["poison"].stacking,
            StackingRule::Stack { max_stacks: 3 }
        );
        // Omitted stacking defaults to refresh.
        assert_eq!(catalog.effects["stun"].stacking, StackingRule::Refresh);
        assert_eq!(
            catalog.by_kind[&StatusEffectKind::Control],
            vec!["stun"]
        );
    }

    #[test]
    fn zero_duration_is_rejected() {
        let document = json!({
            "effects": {
                "blink": {"name": "Blink", "kind": "buff", "defaultDuration": 0}
            }
        });
        let result = spec().validate(&document);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].path, "effects.blink.defaultDuration");
    }
}
