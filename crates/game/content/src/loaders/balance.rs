//! Balance parameters loader.
//!
//! Unlike the table loaders this one produces a single [`BalanceConfig`]
//! value, the input of every function in `coven_core::balance::calc`.

use std::path::PathBuf;
use std::sync::Arc;

use coven_core::BalanceConfig;
use coven_schema::{Refinement, Schema, Spec, field, optional};
use serde_json::Value;

use crate::error::Result;
use crate::source::ContentSource;
use crate::store::DocumentSource;

fn scaling_schema() -> Schema {
    Schema::union([
        Schema::record([
            field("method", Schema::string().one_of(["linear"])),
            field("factor", Schema::float().min(0.0)),
        ]),
        Schema::record([
            field("method", Schema::string().one_of(["exponential"])),
            field("factor", Schema::float().min(0.0)),
            field("exponent", Schema::float().min(0.0)),
        ]),
        Schema::record([
            field("method", Schema::string().one_of(["custom"])),
            field("table", Schema::map(Schema::int().min(0))),
        ]),
    ])
}

fn root_schema() -> Schema {
    Schema::record([
        field(
            "monster",
            Schema::record([
                field(
                    "hp",
                    Schema::record([
                        field("base", Schema::float().min(0.0)),
                        field("perLevel", Schema::float().min(0.0)),
                        optional("curve", Schema::string().one_of(["linear", "exponential"])),
                    ]),
                ),
                field(
                    "damage",
                    Schema::record([
                        field("baseDamage", Schema::float().min(0.0)),
                        field("ageMultiplier", Schema::float().min(0.0)),
                    ]),
                ),
            ]),
        ),
        field(
            "armor",
            Schema::record([
                field("reductionRate", Schema::float().min(0.0)),
                field("maxReduction", Schema::float().min(0.0).max(1.0)),
                field("maxAmplification", Schema::float().min(1.0)),
            ]),
        ),
        field(
            "conversion",
            Schema::record([
                field("baseChance", Schema::float().min(0.0).max(1.0)),
                field("maxChance", Schema::float().min(0.0).max(1.0)),
                field("scalingFactor", Schema::float().min(0.0)),
                field("canConvertWhileDetected", Schema::bool()),
            ]),
        ),
        field(
            "coordination",
            Schema::record([
                field("enabled", Schema::bool()),
                field("appliesToMonsters", Schema::bool()),
                field("maxBonusTargets", Schema::int().min(1)),
                field("damageBonusPercent", Schema::float().min(0.0)),
                field("healingBonusPercent", Schema::float().min(0.0)),
            ]),
        ),
        field(
            "comeback",
            Schema::record([
                field("enabled", Schema::bool()),
                field("thresholdPercent", Schema::float().min(0.0).max(100.0)),
                field("damageBonusPercent", Schema::float().min(0.0)),
                field("healingBonusPercent", Schema::float().min(0.0)),
                field("armorBonus", Schema::int().min(0)),
            ]),
        ),
        field(
            "warlocks",
            Schema::record([
                field("scaling", scaling_schema()),
                field("minWarlocks", Schema::int().min(0)),
                field("maxWarlocks", Schema::int().min(0)),
            ]),
        ),
        field(
            "threat",
            Schema::record([
                field("enabled", Schema::bool()),
                field("armorMultiplier", Schema::float().min(0.0)),
                field("damageMultiplier", Schema::float().min(0.0)),
                field("healingMultiplier", Schema::float().min(0.0)),
            ]),
        ),
    ])
}

fn custom_table(v: &Value) -> Option<Vec<(u32, u64)>> {
    let scaling = &v["warlocks"]["scaling"];
    if scaling["method"].as_str() != Some("custom") {
        return None;
    }
    let table = scaling["table"].as_object()?;
    let mut entries: Vec<(u32, u64)> = table
        .iter()
        .filter_map(|(k, count)| Some((k.parse().ok()?, count.as_u64()?)))
        .collect();
    entries.sort_by_key(|(threshold, _)| *threshold);
    Some(entries)
}

/// Specification for the balance parameters document.
pub fn spec() -> Spec {
    Spec::new("balance", root_schema())
        .with_refinement(Refinement::new(
            "max-chance-covers-base",
            "conversion.maxChance",
            "must be >= baseChance",
            |v| v["conversion"]["maxChance"].as_f64() >= v["conversion"]["baseChance"].as_f64(),
        ))
        .with_refinement(Refinement::new(
            "warlock-bounds-ordered",
            "warlocks.maxWarlocks",
            "must be >= minWarlocks",
            |v| v["warlocks"]["maxWarlocks"].as_u64() >= v["warlocks"]["minWarlocks"].as_u64(),
        ))
        .with_refinement(Refinement::new(
            "custom-table-nonempty",
            "warlocks.scaling.table",
            "custom scaling table must have at least one entry",
            |v| custom_table(v).is_none_or(|entries| !entries.is_empty()),
        ))
        .with_refinement(Refinement::warning(
            "custom-table-monotonic",
            "warlocks.scaling.table",
            "warlock counts do not increase monotonically with player count",
            |v| {
                custom_table(v).is_none_or(|entries| {
                    entries.windows(2).all(|pair| pair[0].1 <= pair[1].1)
                })
            },
        ))
}

fn build_config(document: &Value) -> Result<BalanceConfig> {
    Ok(spec().parse(document)?)
}

/// Loader for the balance parameters document.
pub struct BalanceLoader {
    inner: ContentSource<BalanceConfig>,
}

impl BalanceLoader {
    /// Default location relative to the host's working directory.
    pub const DEFAULT_PATH: &'static str = "data/balance.toml";

    /// Loads the document, failing fast if the source is missing or invalid.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        let inner = ContentSource::new("balance", DocumentSource::new(path), build_config)?;
        tracing::info!(
            "Loaded balance parameters from {}",
            inner.source().path().display()
        );
        Ok(Self { inner })
    }

    /// The current validated configuration, after a reload check.
    ///
    /// The returned `Arc` stays valid across reloads; hold it for the length
    /// of one combat resolution to get a consistent view throughout.
    pub fn config(&self) -> Arc<BalanceConfig> {
        self.inner.snapshot()
    }

    pub fn reload_if_changed(&self) -> bool {
        self.inner.reload_if_changed()
    }
}
