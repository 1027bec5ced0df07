//! Pure balance calculation functions.
//!
//! Every function here is a closed-form computation over a [`BalanceConfig`]
//! and a caller-supplied context: no I/O, no hidden state, no panics.
//! Degenerate inputs (zero players, zero total HP) return documented
//! sentinels instead of erroring, per the runtime-calculation policy.

use super::{
    BalanceConfig, BonusKind, ConversionContext, CoordinationKind, CurveKind, ScalingMethod,
    ThreatContext,
};

/// Exponent of the exponential monster HP curve.
const HP_CURVE_EXPONENT: f64 = 1.3;

/// Monster HP at `level`, floored to an integer.
///
/// Linear: `base + (level - 1) * perLevel`.
/// Exponential: `base * level^1.3 + (level - 1) * perLevel`.
pub fn monster_hp(cfg: &BalanceConfig, level: u32) -> u32 {
    let hp = &cfg.monster.hp;
    let level = level.max(1) as f64;
    let value = match hp.curve {
        CurveKind::Linear => hp.base + (level - 1.0) * hp.per_level,
        CurveKind::Exponential => hp.base * level.powf(HP_CURVE_EXPONENT) + (level - 1.0) * hp.per_level,
    };
    value.floor().max(0.0) as u32
}

/// Monster damage at `age` rounds: `baseDamage * (age + ageMultiplier)`,
/// floored to an integer.
pub fn monster_damage(cfg: &BalanceConfig, age: u32) -> u32 {
    let damage = &cfg.monster.damage;
    (damage.base_damage * (age as f64 + damage.age_multiplier))
        .floor()
        .max(0.0) as u32
}

/// Damage taken after armor, as an integer.
///
/// Positive armor blocks `floor(damage * armor * reductionRate)`, with the
/// reduction fraction capped at `maxReduction`. The blocked amount is floored
/// (never the remainder), so the cap boundary lands exactly: an 80% cap on
/// 100 damage always leaves 20. Zero or negative armor amplifies damage by
/// the same rate, capped at `maxAmplification` (broken armor never worse than
/// e.g. 3x), floored.
pub fn damage_after_armor(cfg: &BalanceConfig, damage: u32, armor: i32) -> u32 {
    let rules = &cfg.armor;
    if armor > 0 {
        let reduction = (armor as f64 * rules.reduction_rate).min(rules.max_reduction);
        let blocked = (damage as f64 * reduction).floor().max(0.0) as u32;
        damage.saturating_sub(blocked)
    } else {
        let amplification =
            (1.0 + (-armor) as f64 * rules.reduction_rate).min(rules.max_amplification);
        (damage as f64 * amplification).floor().max(0.0) as u32
    }
}

/// Chance that a corruption attempt succeeds, in `[0, 1]` before the modifier.
///
/// The limit short-circuits take precedence over the arithmetic and are
/// checked first: any active corruption limit, or being detected while the
/// configuration forbids corrupting when detected, yields exactly `0.0` no
/// matter how favorable the other inputs are. A zero player count is a
/// defensive sentinel, also `0.0`.
pub fn conversion_chance(cfg: &BalanceConfig, ctx: &ConversionContext) -> f64 {
    if ctx.round_limit_reached || ctx.player_limit_reached || ctx.on_cooldown {
        return 0.0;
    }
    if ctx.detected_this_turn && !cfg.conversion.can_convert_while_detected {
        return 0.0;
    }
    if ctx.total_players == 0 {
        return 0.0;
    }

    let rules = &cfg.conversion;
    let ratio = ctx.warlock_count as f64 / ctx.total_players as f64;
    let chance = (rules.base_chance + ratio * rules.scaling_factor).min(rules.max_chance);
    chance * ctx.modifier
}

/// Bonus-adjusted amount when `other_actors` additional entities act on the
/// same target in the same resolution step, floored to an integer.
///
/// `base * (1 + min(n, maxBonusTargets - 1) * perUnitPercent / 100)`.
/// Returns the base amount unchanged when the feature is disabled, or when the
/// target is a monster and monster-directed coordination is off.
pub fn coordination_bonus(
    cfg: &BalanceConfig,
    base_amount: u32,
    other_actors: u32,
    kind: CoordinationKind,
    target_is_monster: bool,
) -> u32 {
    let rules = &cfg.coordination;
    if !rules.enabled {
        return base_amount;
    }
    if target_is_monster && !rules.applies_to_monsters {
        return base_amount;
    }

    let per_unit = match kind {
        CoordinationKind::Damage => rules.damage_bonus_percent,
        CoordinationKind::Healing => rules.healing_bonus_percent,
    };
    let counted = other_actors.min(rules.max_bonus_targets.saturating_sub(1));
    (base_amount as f64 * (1.0 + counted as f64 * per_unit / 100.0))
        .floor()
        .max(0.0) as u32
}

/// Whether comeback mechanics are active for the good side.
///
/// True when `(goodRemaining / totalRemaining) * 100 <= threshold`; the
/// threshold itself activates. Always false when disabled or when nobody
/// remains.
pub fn comeback_active(cfg: &BalanceConfig, good_remaining: u32, total_remaining: u32) -> bool {
    if !cfg.comeback.enabled || total_remaining == 0 {
        return false;
    }
    let share = good_remaining as f64 / total_remaining as f64 * 100.0;
    share <= cfg.comeback.threshold_percent
}

/// Applies the comeback bonus to a base amount.
///
/// The amount is returned unchanged unless comeback is active **and** the
/// target is good-aligned. Damage and healing are percentage multipliers
/// (floored); armor is a flat additive bonus.
pub fn apply_comeback_bonus(
    cfg: &BalanceConfig,
    base_amount: u32,
    kind: BonusKind,
    is_good_player: bool,
    comeback_active: bool,
) -> u32 {
    if !comeback_active || !is_good_player {
        return base_amount;
    }
    let rules = &cfg.comeback;
    match kind {
        BonusKind::Damage => {
            (base_amount as f64 * (1.0 + rules.damage_bonus_percent / 100.0)).floor() as u32
        }
        BonusKind::Healing => {
            (base_amount as f64 * (1.0 + rules.healing_bonus_percent / 100.0)).floor() as u32
        }
        BonusKind::Armor => base_amount + rules.armor_bonus,
    }
}

/// Number of starting warlocks for `player_count` players, clamped to the
/// configured `[min, max]` after the scaling method is applied.
///
/// The custom table considers every threshold at or below the player count
/// and keeps the last (highest) match. A player count below every threshold
/// falls back to the configured minimum.
pub fn warlock_count(cfg: &BalanceConfig, player_count: u32) -> u32 {
    let scaling = &cfg.warlocks;
    let raw = match &scaling.scaling {
        ScalingMethod::Linear { factor } => (player_count as f64 * factor).floor().max(0.0) as u32,
        ScalingMethod::Exponential { factor, exponent } => {
            ((player_count as f64).powf(*exponent) * factor).floor().max(0.0) as u32
        }
        ScalingMethod::Custom { table } => table
            .range(..=player_count)
            .next_back()
            .map(|(_, count)| *count)
            .unwrap_or(scaling.min_warlocks),
    };
    raw.clamp(scaling.min_warlocks, scaling.max_warlocks)
}

/// Threat generated by one player's combat counters.
///
/// `(armor * damageToMonster * armorMult) + (totalDamage * damageMult) +
/// (healing * healingMult)`. Returns `0.0` outright when the threat system is
/// disabled.
pub fn threat(cfg: &BalanceConfig, ctx: &ThreatContext) -> f64 {
    let rules = &cfg.threat;
    if !rules.enabled {
        return 0.0;
    }
    ctx.armor as f64 * ctx.damage_to_monster as f64 * rules.armor_multiplier
        + ctx.total_damage_dealt as f64 * rules.damage_multiplier
        + ctx.healing_done as f64 * rules.healing_multiplier
}
