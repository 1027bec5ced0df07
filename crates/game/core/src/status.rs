//! Status effect definitions.

use serde::{Deserialize, Serialize};

/// Gameplay classification of a status effect.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StatusEffectKind {
    Buff,
    Debuff,
    DamageOverTime,
    Control,
}

/// What happens when an effect is applied to a target that already has it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StackingRule {
    /// Reset the remaining duration; intensity unchanged.
    Refresh,
    /// Add another stack up to `max_stacks`.
    Stack { max_stacks: u32 },
    /// The new application is dropped.
    Ignore,
}

impl Default for StackingRule {
    fn default() -> Self {
        Self::Refresh
    }
}

/// Direction of a per-turn tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickKind {
    Damage,
    Healing,
}

/// Amount applied to the bearer at the start of each of its turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickEffect {
    pub amount: u32,
    pub kind: TickKind,
}

/// Message-template keys announced at effect lifecycle points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffectMessages {
    #[serde(default)]
    pub applied: Option<String>,
    #[serde(default)]
    pub expired: Option<String>,
    #[serde(default)]
    pub tick: Option<String>,
}

/// One entry of the status effect table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffectDefinition {
    /// Stable identifier; filled from the table key by the loader.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub kind: StatusEffectKind,
    /// Duration in rounds when applied without an explicit override.
    pub default_duration: u32,
    #[serde(default)]
    pub stacking: StackingRule,
    #[serde(default)]
    pub tick: Option<TickEffect>,
    #[serde(default)]
    pub messages: StatusEffectMessages,
}
