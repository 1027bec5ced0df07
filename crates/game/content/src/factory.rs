//! One-stop construction of every loader from a single data directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::loaders::{
    AbilityLoader, BalanceLoader, ClassLoader, MessageLoader, RaceLoader, StatusEffectLoader,
};

/// Every loader, fully constructed and cross-checked.
///
/// Loaders are wrapped in `Arc` so hosts can hand them to whatever subsystem
/// needs them; the class and race loaders additionally hold references to
/// their upstream tables for cross-document validation on reload.
pub struct GameContent {
    pub abilities: Arc<AbilityLoader>,
    pub classes: Arc<ClassLoader>,
    pub races: Arc<RaceLoader>,
    pub status_effects: Arc<StatusEffectLoader>,
    pub messages: Arc<MessageLoader>,
    pub balance: Arc<BalanceLoader>,
}

impl GameContent {
    /// Runs a reload check on every table. Returns `true` if any swapped.
    pub fn reload_all(&self) -> bool {
        // Upstream tables first so cross-document checks see fresh ids.
        let mut changed = self.abilities.reload_if_changed();
        changed |= self.classes.reload_if_changed();
        changed |= self.races.reload_if_changed();
        changed |= self.status_effects.reload_if_changed();
        changed |= self.messages.reload_if_changed();
        changed |= self.balance.reload_if_changed();
        changed
    }
}

/// Builds the full loader set from a data directory.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Loads every table, in dependency order. Any failure aborts the whole
    /// load; partially constructed content is never handed out.
    pub fn load_all(&self) -> anyhow::Result<GameContent> {
        let dir = self.data_dir.display().to_string();

        let abilities = Arc::new(
            AbilityLoader::new(Some(self.file("abilities.toml")))
                .with_context(|| format!("loading ability table from {dir}"))?,
        );
        let classes = Arc::new(
            ClassLoader::new(Some(self.file("classes.toml")), Arc::clone(&abilities))
                .with_context(|| format!("loading class table from {dir}"))?,
        );
        let races = Arc::new(
            RaceLoader::new(Some(self.file("races.toml")), Arc::clone(&classes))
                .with_context(|| format!("loading race table from {dir}"))?,
        );
        let status_effects = Arc::new(
            StatusEffectLoader::new(Some(self.file("statusEffects.toml")))
                .with_context(|| format!("loading status effect table from {dir}"))?,
        );
        let messages = Arc::new(
            MessageLoader::new(Some(self.file("messages.toml")))
                .with_context(|| format!("loading message table from {dir}"))?,
        );
        let balance = Arc::new(
            BalanceLoader::new(Some(self.file("balance.toml")))
                .with_context(|| format!("loading balance parameters from {dir}"))?,
        );

        tracing::info!("Loaded all content tables from {}", dir);

        Ok(GameContent {
            abilities,
            classes,
            races,
            status_effects,
            messages,
            balance,
        })
    }
}

/// Convenience for hosts using the conventional `data/` layout.
pub fn load_default() -> anyhow::Result<GameContent> {
    ContentFactory::new("data").load_all()
}
