//! Balance parameters and the calculation engine that consumes them.
//!
//! [`BalanceConfig`] is the typed form of the balance document; every knob the
//! engine in [`calc`] reads lives here and nowhere else. The engine functions
//! are pure: identical inputs always produce identical outputs, so they are
//! safe to call concurrently from any number of in-flight combat resolutions.

pub mod calc;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Monster Scaling
// ============================================================================

/// Shape of the monster HP curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveKind {
    /// `base + (level - 1) * perLevel`
    #[default]
    Linear,
    /// `base * level^1.3 + (level - 1) * perLevel`
    Exponential,
}

/// Monster HP as a function of its level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpCurve {
    pub base: f64,
    pub per_level: f64,
    #[serde(default)]
    pub curve: CurveKind,
}

/// Monster damage as a function of its age in rounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDamage {
    pub base_damage: f64,
    pub age_multiplier: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterScaling {
    pub hp: HpCurve,
    pub damage: MonsterDamage,
}

// ============================================================================
// Armor
// ============================================================================

/// Armor-based damage reduction (and amplification for broken armor).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorRules {
    /// Fractional reduction per point of armor (0.05 = 5% per point).
    pub reduction_rate: f64,
    /// Cap on total fractional reduction (0.8 = damage never below 20%).
    pub max_reduction: f64,
    /// Cap on the amplification multiplier for negative armor (3.0 = at most
    /// triple damage taken).
    pub max_amplification: f64,
}

// ============================================================================
// Conversion (Corruption)
// ============================================================================

/// Warlock corruption-chance parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRules {
    pub base_chance: f64,
    /// Upper bound on the computed chance before the modifier is applied.
    pub max_chance: f64,
    /// Weight of the warlock-to-player ratio term.
    pub scaling_factor: f64,
    /// Whether a warlock detected this turn may still corrupt.
    pub can_convert_while_detected: bool,
}

// ============================================================================
// Coordination
// ============================================================================

/// Bonus for multiple actors hitting the same target in one resolution step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationRules {
    pub enabled: bool,
    /// Whether the bonus applies to monster-directed actions.
    pub applies_to_monsters: bool,
    /// Actors beyond `maxBonusTargets - 1` grant no further bonus.
    pub max_bonus_targets: u32,
    pub damage_bonus_percent: f64,
    pub healing_bonus_percent: f64,
}

// ============================================================================
// Comeback Mechanics
// ============================================================================

/// Conditional buffs for the good side once it is sufficiently outnumbered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComebackRules {
    pub enabled: bool,
    /// Activates when good players are at most this percentage of everyone
    /// remaining (inclusive).
    pub threshold_percent: f64,
    pub damage_bonus_percent: f64,
    pub healing_bonus_percent: f64,
    /// Flat armor added while active.
    pub armor_bonus: u32,
}

// ============================================================================
// Warlock Count Scaling
// ============================================================================

/// How the number of starting warlocks is derived from the player count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScalingMethod {
    /// `floor(playerCount * factor)`
    Linear { factor: f64 },
    /// `floor(playerCount^exponent * factor)`
    Exponential { factor: f64, exponent: f64 },
    /// Lookup table keyed by player-count thresholds. All thresholds at or
    /// below the player count are considered and the highest one wins; the
    /// table's declaration order never matters, its threshold values do.
    Custom {
        #[serde(deserialize_with = "threshold_table")]
        table: BTreeMap<u32, u32>,
    },
}

/// Internally tagged enums buffer their content before picking a variant, and
/// buffered map keys stay strings; parse them into thresholds here.
fn threshold_table<'de, D>(deserializer: D) -> Result<BTreeMap<u32, u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(threshold, count)| {
            threshold.parse::<u32>().map(|t| (t, count)).map_err(|_| {
                serde::de::Error::custom(format!(
                    "invalid player-count threshold '{threshold}'"
                ))
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarlockScaling {
    pub scaling: ScalingMethod,
    pub min_warlocks: u32,
    pub max_warlocks: u32,
}

// ============================================================================
// Threat
// ============================================================================

/// Weights for the generated-threat score used by monster targeting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatRules {
    pub enabled: bool,
    pub armor_multiplier: f64,
    pub damage_multiplier: f64,
    pub healing_multiplier: f64,
}

// ============================================================================
// Balance Config
// ============================================================================

/// The validated balance parameters document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceConfig {
    pub monster: MonsterScaling,
    pub armor: ArmorRules,
    pub conversion: ConversionRules,
    pub coordination: CoordinationRules,
    pub comeback: ComebackRules,
    pub warlocks: WarlockScaling,
    pub threat: ThreatRules,
}

// ============================================================================
// Calculation Contexts
// ============================================================================

/// Kind of amount a coordination bonus is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinationKind {
    Damage,
    Healing,
}

/// Kind of amount a comeback bonus is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusKind {
    Damage,
    Healing,
    Armor,
}

/// Runtime inputs to [`calc::conversion_chance`].
///
/// The limit flags are computed by the game loop from its round state; any of
/// them being set short-circuits the chance to exactly `0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConversionContext {
    pub warlock_count: u32,
    pub total_players: u32,
    /// Situational multiplier applied after capping (1.0 = neutral).
    pub modifier: f64,
    /// The per-round corruption limit has been reached.
    pub round_limit_reached: bool,
    /// The per-player corruption limit has been reached.
    pub player_limit_reached: bool,
    /// The acting warlock's corruption is on cooldown.
    pub on_cooldown: bool,
    /// The acting warlock was detected this turn.
    pub detected_this_turn: bool,
}

/// Per-player combat counters feeding [`calc::threat`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThreatContext {
    pub armor: i32,
    pub damage_to_monster: u32,
    pub total_damage_dealt: u32,
    pub healing_done: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_scaling_decodes_string_thresholds() {
        // Documents arrive with string map keys; the tag buffering must not
        // lose the conversion into numeric thresholds.
        let method: ScalingMethod = serde_json::from_value(serde_json::json!({
            "method": "custom",
            "table": {"1": 1, "6": 2, "9": 3},
        }))
        .expect("valid method");
        assert_eq!(
            method,
            ScalingMethod::Custom {
                table: BTreeMap::from([(1, 1), (6, 2), (9, 3)]),
            }
        );
    }

    #[test]
    fn non_numeric_threshold_is_a_decode_error() {
        let err = serde_json::from_value::<ScalingMethod>(serde_json::json!({
            "method": "custom",
            "table": {"six": 2},
        }))
        .unwrap_err();
        assert!(err.to_string().contains("six"));
    }

    #[test]
    fn linear_and_exponential_methods_decode_by_tag() {
        let method: ScalingMethod = serde_json::from_value(serde_json::json!({
            "method": "exponential",
            "factor": 0.5,
            "exponent": 0.8,
        }))
        .expect("valid method");
        assert_eq!(
            method,
            ScalingMethod::Exponential {
                factor: 0.5,
                exponent: 0.8,
            }
        );
    }
}
