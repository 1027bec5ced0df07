//! Deterministic game rules and data types for the Coven party game.
//!
//! `coven-core` defines the typed content records (abilities, classes, races,
//! status effects, message templates, balance parameters) and the pure balance
//! calculation engine consumed by combat resolution. Nothing in this crate
//! performs I/O; loading and validating the documents that produce these types
//! lives in `coven-content`.

pub mod ability;
pub mod balance;
pub mod class;
pub mod message;
pub mod race;
pub mod status;

pub use ability::{
    Ability, AbilityCategory, AbilityParam, ActionOrder, DamageContext, RageScaling, ScalingRule,
};
pub use balance::calc::{
    apply_comeback_bonus, comeback_active, conversion_chance, coordination_bonus,
    damage_after_armor, monster_damage, monster_hp, threat, warlock_count,
};
pub use balance::{
    ArmorRules, BalanceConfig, BonusKind, ComebackRules, ConversionContext, ConversionRules,
    CoordinationKind, CoordinationRules, CurveKind, HpCurve, MonsterDamage, MonsterScaling,
    ScalingMethod, ThreatContext, ThreatRules, WarlockScaling,
};
pub use class::{ClassAttributes, ClassCategory, ClassDefinition, LevelGrant};
pub use message::MessageTemplate;
pub use race::{RaceDefinition, RaceModifiers};
pub use status::{
    StackingRule, StatusEffectDefinition, StatusEffectKind, StatusEffectMessages, TickEffect,
    TickKind,
};
