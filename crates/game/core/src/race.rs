//! Playable race definitions.

use serde::{Deserialize, Serialize};

/// Percentage and flat modifiers a race applies on top of its class base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceModifiers {
    /// HP as a percentage of the class base (100 = unchanged).
    #[serde(default = "default_percent")]
    pub hp_percent: f64,
    /// Damage dealt as a percentage of the class base (100 = unchanged).
    #[serde(default = "default_percent")]
    pub damage_percent: f64,
    /// Flat armor added to (or removed from) the class base.
    #[serde(default)]
    pub armor_bonus: i32,
}

fn default_percent() -> f64 {
    100.0
}

impl Default for RaceModifiers {
    fn default() -> Self {
        Self {
            hp_percent: 100.0,
            damage_percent: 100.0,
            armor_bonus: 0,
        }
    }
}

impl RaceModifiers {
    /// Applies the HP percentage to a class base value, floored.
    pub fn apply_hp(&self, base_hp: u32) -> u32 {
        (base_hp as f64 * self.hp_percent / 100.0).floor().max(0.0) as u32
    }

    /// Applies the damage percentage to a base amount, floored.
    pub fn apply_damage(&self, base_damage: u32) -> u32 {
        (base_damage as f64 * self.damage_percent / 100.0)
            .floor()
            .max(0.0) as u32
    }
}

/// One entry of the race table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDefinition {
    /// Stable identifier; filled from the table key by the loader.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Class ids this race may play; must resolve against the class table.
    pub compatible_classes: Vec<String>,
    #[serde(default)]
    pub modifiers: RaceModifiers,
    /// Key of a special racial ability, if any.
    #[serde(default)]
    pub special: Option<String>,
}

impl RaceDefinition {
    pub fn supports_class(&self, class_id: &str) -> bool {
        self.compatible_classes.iter().any(|c| c == class_id)
    }
}
