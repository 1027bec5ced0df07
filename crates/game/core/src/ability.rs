//! Ability definitions and the pure damage-scaling helper.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Ability Category
// ============================================================================

/// Broad gameplay category of an ability.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AbilityCategory {
    Attack,
    Defense,
    Healing,
    Special,
}

// ============================================================================
// Ability Parameters
// ============================================================================

/// One entry of an ability's `params` map.
///
/// A closed set of known shapes rather than an open dictionary, so every
/// consumer's match is exhaustive. Authored with a `kind` tag:
///
/// ```toml
/// [abilities.poisonStrike.params.poison]
/// kind = "poison"
/// damagePerTurn = 2
/// duration = 3
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AbilityParam {
    /// Free-form numeric tuning knob.
    Scalar { value: f64 },
    /// Poison damage-over-time rider.
    Poison { damage_per_turn: u32, duration: u32 },
    /// Bleed damage-over-time rider.
    Bleed { damage_per_turn: u32, duration: u32 },
    /// Increases damage the target takes while active.
    Vulnerability {
        damage_taken_percent: u32,
        duration: u32,
    },
    /// Healing-over-time rider.
    HealOverTime { heal_per_turn: u32, duration: u32 },
}

// ============================================================================
// Scaling Rules
// ============================================================================

/// Damage scaling attached to an ability.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingRule {
    /// Percent added to base damage per caster level above 1.
    #[serde(default)]
    pub per_level_percent: Option<f64>,
    /// Rage-style scaling: more damage the more HP the caster is missing.
    #[serde(default)]
    pub rage: Option<RageScaling>,
}

/// Rage scaling parameters: bonus grows linearly with missing HP, reaching
/// `max_bonus_percent` at 0 HP.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RageScaling {
    pub max_bonus_percent: f64,
}

/// Inclusive range an ability's action resolves within during a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOrder {
    pub min: u32,
    pub max: u32,
}

// ============================================================================
// Ability
// ============================================================================

/// One entry of the ability table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    /// Stable identifier; the join key for class progressions. Filled from
    /// the table key by the loader.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// UI button label.
    pub button_text: String,
    /// Alternate label while the ability is active (toggled abilities).
    #[serde(default)]
    pub button_text_end: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category: AbilityCategory,
    /// Base damage; absent for non-damaging abilities.
    #[serde(default)]
    pub damage: Option<u32>,
    /// Base healing; absent for non-healing abilities.
    #[serde(default)]
    pub healing: Option<u32>,
    /// Cooldown in rounds; 0 means usable every round.
    pub cooldown: u32,
    /// Minimum caster level; 0 means available from the start.
    #[serde(default)]
    pub unlock_level: u32,
    /// Unlock key the caller must hold, for gated abilities.
    #[serde(default)]
    pub required_unlock: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of hits; total damage is multiplied by this.
    #[serde(default)]
    pub multi_hit: Option<u32>,
    #[serde(default)]
    pub action_order: Option<ActionOrder>,
    #[serde(default)]
    pub scaling: Option<ScalingRule>,
    #[serde(default)]
    pub params: BTreeMap<String, AbilityParam>,
}

/// Caller-supplied context for [`Ability::calculate_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageContext {
    pub caster_level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
}

impl Ability {
    /// Computes the damage this ability deals in the given context.
    ///
    /// Applies, in order: level scaling, rage scaling, multi-hit
    /// multiplication. The result is always floored to an integer. Abilities
    /// without base damage yield 0.
    pub fn calculate_damage(&self, ctx: &DamageContext) -> u32 {
        let Some(base) = self.damage else {
            return 0;
        };
        let mut amount = base as f64;

        if let Some(scaling) = &self.scaling {
            if let Some(per_level) = scaling.per_level_percent {
                let levels = ctx.caster_level.saturating_sub(1) as f64;
                amount *= 1.0 + levels * per_level / 100.0;
            }
            if let Some(rage) = &scaling.rage
                && ctx.max_hp > 0
            {
                let missing = 1.0 - ctx.current_hp.min(ctx.max_hp) as f64 / ctx.max_hp as f64;
                amount *= 1.0 + missing * rage.max_bonus_percent / 100.0;
            }
        }

        if let Some(hits) = self.multi_hit {
            amount *= hits.max(1) as f64;
        }

        amount.floor().max(0.0) as u32
    }

    /// Whether a caller at `level` holding `unlocks` may use this ability.
    pub fn is_unlocked(&self, level: u32, unlocks: &BTreeSet<String>) -> bool {
        if level < self.unlock_level {
            return false;
        }
        match &self.required_unlock {
            Some(key) => unlocks.contains(key),
            None => true,
        }
    }

    /// Whether this ability deals direct damage.
    pub fn deals_damage(&self) -> bool {
        self.damage.is_some_and(|d| d > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(damage: u32) -> Ability {
        Ability {
            id: "strike".into(),
            name: "Strike".into(),
            button_text: "Strike!".into(),
            button_text_end: None,
            description: None,
            category: AbilityCategory::Attack,
            damage: Some(damage),
            healing: None,
            cooldown: 0,
            unlock_level: 0,
            required_unlock: None,
            tags: Vec::new(),
            multi_hit: None,
            action_order: None,
            scaling: None,
            params: BTreeMap::new(),
        }
    }

    fn full_hp(level: u32) -> DamageContext {
        DamageContext {
            caster_level: level,
            current_hp: 100,
            max_hp: 100,
        }
    }

    #[test]
    fn unscaled_ability_deals_base_damage() {
        assert_eq!(strike(12).calculate_damage(&full_hp(1)), 12);
        assert_eq!(strike(12).calculate_damage(&full_hp(5)), 12);
    }

    #[test]
    fn level_scaling_applies_per_level_above_one() {
        let mut ability = strike(10);
        ability.scaling = Some(ScalingRule {
            per_level_percent: Some(10.0),
            rage: None,
        });
        assert_eq!(ability.calculate_damage(&full_hp(1)), 10);
        // Level 3: 10 * (1 + 2 * 0.10) = 12
        assert_eq!(ability.calculate_damage(&full_hp(3)), 12);
    }

    #[test]
    fn rage_scaling_grows_with_missing_hp() {
        let mut ability = strike(100);
        ability.scaling = Some(ScalingRule {
            per_level_percent: None,
            rage: Some(RageScaling {
                max_bonus_percent: 50.0,
            }),
        });
        // Full HP: no bonus.
        assert_eq!(ability.calculate_damage(&full_hp(1)), 100);
        // Half HP: half the max bonus.
        let ctx = DamageContext {
            caster_level: 1,
            current_hp: 50,
            max_hp: 100,
        };
        assert_eq!(ability.calculate_damage(&ctx), 125);
        // Zero max HP never divides by zero.
        let ctx = DamageContext {
            caster_level: 1,
            current_hp: 0,
            max_hp: 0,
        };
        assert_eq!(ability.calculate_damage(&ctx), 100);
    }

    #[test]
    fn multi_hit_multiplies_after_scaling() {
        let mut ability = strike(7);
        ability.multi_hit = Some(3);
        assert_eq!(ability.calculate_damage(&full_hp(1)), 21);
    }

    #[test]
    fn result_is_floored() {
        let mut ability = strike(10);
        ability.scaling = Some(ScalingRule {
            per_level_percent: Some(7.5),
            rage: None,
        });
        // Level 2: 10 * 1.075 = 10.75 -> 10
        assert_eq!(ability.calculate_damage(&full_hp(2)), 10);
    }

    #[test]
    fn gated_ability_requires_level_and_unlock() {
        let mut ability = strike(5);
        ability.unlock_level = 3;
        ability.required_unlock = Some("darkPact".into());

        let mut unlocks = BTreeSet::new();
        assert!(!ability.is_unlocked(5, &unlocks));
        unlocks.insert("darkPact".into());
        assert!(!ability.is_unlocked(2, &unlocks));
        assert!(ability.is_unlocked(3, &unlocks));
    }

    #[test]
    fn params_decode_as_closed_tagged_union() {
        let value = serde_json::json!({
            "kind": "poison",
            "damagePerTurn": 2,
            "duration": 3,
        });
        let param: AbilityParam = serde_json::from_value(value).expect("valid param");
        assert_eq!(
            param,
            AbilityParam::Poison {
                damage_per_turn: 2,
                duration: 3
            }
        );
    }
}
