//! Battle roster loader.

use std::path::Path;

use atb_core::{BattleConfig, BattleRoster};

use crate::loaders::{LoadResult, parse_ron};

pub struct RosterLoader;

impl RosterLoader {
    /// Load a [`BattleRoster`] and check it fits the formation.
    pub fn load(path: &Path) -> LoadResult<BattleRoster> {
        let roster: BattleRoster = parse_ron(path, "roster")?;

        for (side, members) in [("allies", &roster.allies), ("enemies", &roster.enemies)] {
            if members.is_empty() {
                anyhow::bail!("roster at {} has no {}", path.display(), side);
            }
            if members.len() > BattleConfig::FORMATION_SLOTS {
                anyhow::bail!(
                    "roster at {} lists {} {}, the formation holds {}",
                    path.display(),
                    members.len(),
                    side,
                    BattleConfig::FORMATION_SLOTS
                );
            }
        }

        Ok(roster)
    }
}
