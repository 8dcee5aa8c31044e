//! Data-driven battle content and persistence.
//!
//! This crate turns files into the plain values `atb-core` consumes:
//! - Item, skill and status catalogs (RON)
//! - Battle rosters (RON)
//! - Battle configuration (TOML)
//! - Combatant snapshots (bincode)
//!
//! Sessions never touch the filesystem; everything loaded here is handed to
//! them as a `ContentRegistry`, a `BattleRoster` or a `BattleConfig`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "persistence")]
pub mod snapshots;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ItemLoader, LoadResult, RosterLoader, SkillLoader,
    StatusLoader, check_references,
};

#[cfg(feature = "persistence")]
pub use snapshots::{SnapshotStore, StoreError};
