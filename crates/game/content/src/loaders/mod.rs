//! Domain loaders: one per configuration document.
//!
//! Every loader follows the same shape: a `spec()` describing the document, a
//! catalog type holding the typed entries plus derived indices, and a thin
//! wrapper over [`crate::source::ContentSource`] exposing lookup accessors.
//! Lookups run a reload check first, so edits to the backing file are picked
//! up on the next access.

pub mod abilities;
pub mod balance;
pub mod classes;
pub mod messages;
pub mod races;
pub mod status;

pub use abilities::{AbilityLoader, AbilityStats};
pub use balance::BalanceLoader;
pub use classes::ClassLoader;
pub use messages::MessageLoader;
pub use races::RaceLoader;
pub use status::StatusEffectLoader;
