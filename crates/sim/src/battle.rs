//! One headless battle from a data directory.

use anyhow::{Context, Result};
use atb_content::{ContentFactory, SnapshotStore, check_references};
use atb_core::{BattleSession, CombatantId, Controller};

use crate::config::SimConfig;
use crate::report::{self, Summary};

/// Ticks simulated between event flushes.
const LOG_CHUNK: u64 = 200;

/// Loads content, runs the roster's battle to an outcome with AI on both
/// sides, and optionally stores the survivors' snapshots.
pub fn run(config: &SimConfig) -> Result<Summary> {
    let factory = ContentFactory::new(&config.data_dir);
    let registry = factory.load_registry()?;
    let roster = factory.load_roster()?;
    let battle_config = factory.load_config()?;
    for problem in check_references(&registry, Some(&roster)) {
        tracing::warn!(problem = %problem, "roster references missing content");
    }

    let mut session = BattleSession::from_roster(&registry, battle_config, config.seed, &roster)
        .context("failed to place roster")?;
    let ids: Vec<CombatantId> = session.combatants().map(|c| c.id()).collect();
    for id in ids {
        if let Some(combatant) = session.combatant_mut(id) {
            combatant.set_controller(Controller::Ai);
        }
    }
    session.start().context("failed to start battle")?;

    let mut elapsed = 0;
    while !session.state().is_finished() && elapsed < config.max_ticks {
        let step = LOG_CHUNK.min(config.max_ticks - elapsed);
        let before = session.current_tick();
        session.run(step);
        elapsed += step;
        for event in session.drain_events() {
            report::log_event(&session, &event);
        }
        if session.current_tick() == before && !session.state().is_finished() {
            tracing::warn!(state = ?session.state(), "battle stalled");
            break;
        }
    }

    if !session.state().is_finished() {
        tracing::warn!(max_ticks = config.max_ticks, "tick limit reached without an outcome");
    }

    if let Some(dir) = &config.snapshot_dir {
        let store = SnapshotStore::new(dir)
            .with_context(|| format!("failed to open snapshot store at {}", dir.display()))?;
        for combatant in session.combatants() {
            store.save(&combatant.snapshot())?;
        }
        tracing::info!(dir = %dir.display(), "snapshots written");
    }

    Ok(Summary::of(&session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atb_core::BattleState;
    use tempfile::TempDir;

    #[test]
    fn bundled_battle_reaches_an_outcome() {
        let summary = run(&SimConfig::default()).unwrap();
        assert!(matches!(
            summary.outcome,
            BattleState::Victory | BattleState::Defeat | BattleState::Escaped
        ));
        assert!(summary.ticks > 0);
    }

    #[test]
    fn same_seed_same_result() {
        let config = SimConfig {
            seed: 99,
            ..SimConfig::default()
        };
        assert_eq!(run(&config).unwrap(), run(&config).unwrap());
    }

    #[test]
    fn snapshots_are_written_when_asked() {
        let dir = TempDir::new().unwrap();
        let config = SimConfig {
            snapshot_dir: Some(dir.path().to_path_buf()),
            ..SimConfig::default()
        };
        let summary = run(&config).unwrap();

        let store = SnapshotStore::new(dir.path()).unwrap();
        assert_eq!(store.list_ids().unwrap().len(), summary.combatants.len());
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = SimConfig {
            data_dir: dir.path().join("nowhere"),
            ..SimConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
