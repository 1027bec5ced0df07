//! Ability table loader.
//!
//! Document shape (TOML):
//!
//! ```toml
//! [abilities.fireball]
//! name = "Fireball"
//! buttonText = "Hurl Fireball"
//! category = "attack"
//! damage = 18
//! cooldown = 2
//! tags = ["fire", "ranged"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use coven_core::{Ability, AbilityCategory, DamageContext};
use coven_schema::{Refinement, Schema, Spec, field, optional};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::source::ContentSource;
use crate::store::DocumentSource;

#[derive(Deserialize)]
struct AbilityDocument {
    abilities: BTreeMap<String, Ability>,
}

/// Typed snapshot of the ability table with derived indices.
pub struct AbilityCatalog {
    abilities: BTreeMap<String, Ability>,
    by_tag: BTreeMap<String, Vec<String>>,
    by_category: BTreeMap<AbilityCategory, Vec<String>>,
}

/// Aggregate counts and means, for balance auditing rather than gameplay.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityStats {
    pub total: usize,
    pub per_category: BTreeMap<AbilityCategory, usize>,
    pub per_tag: BTreeMap<String, usize>,
    pub mean_cooldown: f64,
    /// Mean base damage among damage-dealing entries only.
    pub mean_damage: f64,
}

fn param_variant(kind: &str, fields: Vec<coven_schema::FieldSchema>) -> Schema {
    let mut all = vec![field("kind", Schema::string().one_of([kind]))];
    all.extend(fields);
    Schema::record(all)
}

fn param_schema() -> Schema {
    Schema::union([
        param_variant("scalar", vec![field("value", Schema::float())]),
        param_variant(
            "poison",
            vec![
                field("damagePerTurn", Schema::int().min(0)),
                field("duration", Schema::int().min(1)),
            ],
        ),
        param_variant(
            "bleed",
            vec![
                field("damagePerTurn", Schema::int().min(0)),
                field("duration", Schema::int().min(1)),
            ],
        ),
        param_variant(
            "vulnerability",
            vec![
                field("damageTakenPercent", Schema::int().min(0)),
                field("duration", Schema::int().min(1)),
            ],
        ),
        param_variant(
            "healOverTime",
            vec![
                field("healPerTurn", Schema::int().min(0)),
                field("duration", Schema::int().min(1)),
            ],
        ),
    ])
}

fn ability_schema() -> Schema {
    Schema::record([
        field("name", Schema::string().non_empty()),
        field("buttonText", Schema::string().non_empty()),
        optional("buttonTextEnd", Schema::string().non_empty()),
        optional("description", Schema::string()),
        field(
            "category",
            Schema::string().one_of(["attack", "defense", "healing", "special"]),
        ),
        optional("damage", Schema::int().min(0)),
        optional("healing", Schema::int().min(0)),
        field("cooldown", Schema::int().min(0)),
        optional("unlockLevel", Schema::int().min(0)),
        optional("requiredUnlock", Schema::string().non_empty()),
        optional("tags", Schema::seq(Schema::string().non_empty())),
        optional("multiHit", Schema::int().min(1)),
        optional(
            "actionOrder",
            Schema::record([
                field("min", Schema::int().min(0)),
                field("max", Schema::int().min(0)),
            ]),
        ),
        optional(
            "scaling",
            Schema::record([
                optional("perLevelPercent", Schema::float().min(0.0)),
                optional(
                    "rage",
                    Schema::record([field("maxBonusPercent", Schema::float().min(0.0))]),
                ),
            ]),
        ),
        optional("params", Schema::map(param_schema())),
    ])
}

/// Specification for the ability document.
pub fn spec() -> Spec {
    let root = Schema::record([field("abilities", Schema::map(ability_schema()))]);
    Spec::new("abilities", root).with_refinement(Refinement::new(
        "action-order-ranges",
        "abilities",
        "every actionOrder range must satisfy min <= max",
        |v| {
            v["abilities"].as_object().is_some_and(|abilities| {
                abilities.values().all(|ability| {
                    let order = &ability["actionOrder"];
                    order.is_null() || order["min"].as_u64() <= order["max"].as_u64()
                })
            })
        },
    ))
}

fn build_catalog(document: &Value) -> Result<AbilityCatalog> {
    let doc: AbilityDocument = spec().parse(document)?;

    let mut abilities = doc.abilities;
    for (id, ability) in &mut abilities {
        ability.id = id.clone();
    }

    let mut by_tag: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut by_category: BTreeMap<AbilityCategory, Vec<String>> = BTreeMap::new();
    for (id, ability) in &abilities {
        for tag in &ability.tags {
            by_tag.entry(tag.clone()).or_default().push(id.clone());
        }
        by_category
            .entry(ability.category)
            .or_default()
            .push(id.clone());
    }

    Ok(AbilityCatalog {
        abilities,
        by_tag,
        by_category,
    })
}

/// Loader for the ability table.
pub struct AbilityLoader {
    inner: ContentSource<AbilityCatalog>,
}

impl AbilityLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/abilities.toml";

    /// Loads the table, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("abilities", DocumentSource::new(path), build_catalog)?;
        tracing::info!(
            "Loaded {} abilities from {}",
            inner.peek().abilities.len(),
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    /// Exact lookup by id.
    pub fn get(&self, id: &str) -> Option<Ability> {
        self.inner.snapshot().abilities.get(id).cloned()
    }

    /// Resolves a batch of ids, silently skipping unresolvable ones.
    pub fn get_many<I, S>(&self, ids: I) -> Vec<Ability>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.inner.snapshot();
        ids.into_iter()
            .filter_map(|id| snapshot.abilities.get(id.as_ref()).cloned())
            .collect()
    }

    pub fn get_by_tag(&self, tag: &str) -> Vec<Ability> {
        let snapshot = self.inner.snapshot();
        snapshot
            .by_tag
            .get(tag)
            .into_iter()
            .flatten()
            .filter_map(|id| snapshot.abilities.get(id).cloned())
            .collect()
    }

    pub fn get_by_category(&self, category: AbilityCategory) -> Vec<Ability> {
        let snapshot = self.inner.snapshot();
        snapshot
            .by_category
            .get(&category)
            .into_iter()
            .flatten()
            .filter_map(|id| snapshot.abilities.get(id).cloned())
            .collect()
    }

    pub fn all_ids(&self) -> BTreeSet<String> {
        self.inner.snapshot().abilities.keys().cloned().collect()
    }

    /// A copy of the full table; callers never observe the live snapshot.
    pub fn all(&self) -> BTreeMap<String, Ability> {
        self.inner.snapshot().abilities.clone()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }

    /// `(id, buttonText)` pairs for UI wiring.
    pub fn button_labels(&self) -> Vec<(String, String)> {
        self.inner
            .snapshot()
            .abilities
            .values()
            .map(|a| (a.id.clone(), a.button_text.clone()))
            .collect()
    }

    pub fn cooldown(&self, id: &str) -> Option<u32> {
        self.inner.snapshot().abilities.get(id).map(|a| a.cooldown)
    }

    /// Whether the given caller may use the ability. Unknown ids are locked.
    pub fn is_unlocked(&self, id: &str, level: u32, unlocks: &BTreeSet<String>) -> bool {
        self.inner
            .snapshot()
            .abilities
            .get(id)
            .is_some_and(|a| a.is_unlocked(level, unlocks))
    }

    /// Damage the ability deals in the given context; `None` for unknown ids.
    pub fn calculate_damage(&self, id: &str, ctx: &DamageContext) -> Option<u32> {
        self.inner
            .snapshot()
            .abilities
            .get(id)
            .map(|a| a.calculate_damage(ctx))
    }

    /// Aggregate statistics for balance auditing.
    pub fn stats(&self) -> AbilityStats {
        let snapshot = self.inner.snapshot();
        let total = snapshot.abilities.len();

        let mut per_category = BTreeMap::new();
        let mut per_tag = BTreeMap::new();
        let mut cooldown_sum = 0u64;
        let mut damage_sum = 0u64;
        let mut damage_count = 0usize;

        for ability in snapshot.abilities.values() {
            *per_category.entry(ability.category).or_insert(0) += 1;
            for tag in &ability.tags {
                *per_tag.entry(tag.clone()).or_insert(0) += 1;
            }
            cooldown_sum += u64::from(ability.cooldown);
            if let Some(damage) = ability.damage
                && damage > 0
            {
                damage_sum += u64::from(damage);
                damage_count += 1;
            }
        }

        AbilityStats {
            total,
            per_category,
            per_tag,
            mean_cooldown: if total == 0 {
                0.0
            } else {
                cooldown_sum as f64 / total as f64
            },
            mean_damage: if damage_count == 0 {
                0.0
            } else {
                damage_sum as f64 / damage_count as f64
            },
        }
    }
}
