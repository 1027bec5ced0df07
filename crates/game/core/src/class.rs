//! Character class definitions.

use serde::{Deserialize, Serialize};

/// Combat role grouping used by the class catalog's category lists.
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
pub enum ClassCategory {
    Melee,
    Ranged,
    Magic,
    Support,
}

/// Starting attributes for a class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAttributes {
    pub hp: u32,
    pub armor: i32,
    /// Multiplier applied to all damage dealt by this class.
    pub damage_modifier: f64,
}

/// Abilities granted when a character reaches `level`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelGrant {
    pub level: u32,
    /// Ability ids; must resolve against the ability table.
    pub abilities: Vec<String>,
}

/// One entry of the class table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    /// Stable identifier; filled from the table key by the loader.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: ClassCategory,
    #[serde(default)]
    pub description: Option<String>,
    pub base: ClassAttributes,
    /// Level progression, ordered by level.
    #[serde(default)]
    pub progression: Vec<LevelGrant>,
}

impl ClassDefinition {
    /// All ability ids unlocked at or below `level`, in grant order.
    pub fn abilities_at_level(&self, level: u32) -> Vec<&str> {
        self.progression
            .iter()
            .filter(|grant| grant.level <= level)
            .flat_map(|grant| grant.abilities.iter().map(String::as_str))
            .collect()
    }

    /// Every ability id referenced anywhere in the progression.
    pub fn referenced_abilities(&self) -> impl Iterator<Item = &str> {
        self.progression
            .iter()
            .flat_map(|grant| grant.abilities.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warrior() -> ClassDefinition {
        ClassDefinition {
            id: "warrior".into(),
            name: "Warrior".into(),
            category: ClassCategory::Melee,
            description: None,
            base: ClassAttributes {
                hp: 120,
                armor: 3,
                damage_modifier: 1.0,
            },
            progression: vec![
                LevelGrant {
                    level: 1,
                    abilities: vec!["slash".into()],
                },
                LevelGrant {
                    level: 3,
                    abilities: vec!["whirlwind".into(), "taunt".into()],
                },
            ],
        }
    }

    #[test]
    fn abilities_accumulate_with_level() {
        let class = warrior();
        assert_eq!(class.abilities_at_level(1), vec!["slash"]);
        assert_eq!(class.abilities_at_level(2), vec!["slash"]);
        assert_eq!(
            class.abilities_at_level(3),
            vec!["slash", "whirlwind", "taunt"]
        );
    }

    #[test]
    fn referenced_abilities_covers_all_grants() {
        let class = warrior();
        let ids: Vec<&str> = class.referenced_abilities().collect();
        assert_eq!(ids, vec!["slash", "whirlwind", "taunt"]);
    }
}
