//! Data-driven game content: validated, hot-reloadable rule tables.
//!
//! Each table lives in a TOML (or JSON) document on disk, is validated
//! against a [`coven_schema::Spec`] on load, and is served through a
//! snapshot that can be refreshed between game phases without restarting
//! the host. Construction is fail-fast; reloads are fail-safe and keep the
//! previous snapshot on any error.
//!
//! [`ContentFactory`] wires all six tables together in dependency order.

pub mod error;
pub mod factory;
pub mod loaders;
pub mod source;
pub mod store;

pub use error::{ContentError, Result};
pub use factory::{ContentFactory, GameContent, load_default};
pub use loaders::{
    AbilityLoader, AbilityStats, BalanceLoader, ClassLoader, MessageLoader, RaceLoader,
    StatusEffectLoader,
};
pub use source::{ContentSource, LoadedSnapshot};
pub use store::{DocumentSource, Marker};
