//! Content loaders for reading battle data from files.
//!
//! Catalogs and rosters are RON, configuration is TOML. Every loader returns
//! plain `atb-core` types; [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod factory;
pub mod item;
pub mod references;
pub mod roster;
pub mod skill;
pub mod status;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use references::check_references;
pub use roster::RosterLoader;
pub use skill::SkillLoader;
pub use status::StatusLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses one RON document. `what` names it in error messages.
pub(crate) fn parse_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e))
}
