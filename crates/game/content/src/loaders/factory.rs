//! Content factory for building a registry from data files.

use std::path::{Path, PathBuf};

use atb_core::{BattleConfig, BattleRoster, ContentRegistry, ItemDef, SkillDef, StatusEffectDef};

use crate::loaders::{
    ConfigLoader, ItemLoader, LoadResult, RosterLoader, SkillLoader, StatusLoader,
    check_references,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── items.ron
/// ├── skills.ron
/// ├── statuses.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`, or the defaults when
    /// the file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDef>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDef>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load status catalog from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<StatusEffectDef>> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load the battle roster from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<BattleRoster> {
        RosterLoader::load(&self.data_dir.join("roster.ron"))
    }

    /// Loads every catalog into one [`ContentRegistry`].
    ///
    /// Duplicate ids within a catalog are an error. Dangling references are
    /// logged; the engine skips them at runtime.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let mut registry = ContentRegistry::new();

        for item in self.load_items()? {
            let id = item.id();
            if registry.insert_item(item).is_some() {
                anyhow::bail!("duplicate {} in items.ron", id);
            }
        }
        for skill in self.load_skills()? {
            let id = skill.id;
            if registry.insert_skill(skill).is_some() {
                anyhow::bail!("duplicate {} in skills.ron", id);
            }
        }
        for status in self.load_statuses()? {
            let id = status.id;
            if registry.insert_status(status).is_some() {
                anyhow::bail!("duplicate {} in statuses.ron", id);
            }
        }

        for problem in check_references(&registry, None) {
            tracing::warn!(problem = %problem, "dangling content reference");
        }
        tracing::info!(
            items = registry.items().count(),
            skills = registry.skills().count(),
            statuses = registry.statuses().count(),
            dir = %self.data_dir.display(),
            "content registry loaded"
        );
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atb_core::env::StatusFlags;
    use atb_core::{
        BattleSession, BattleState, ItemId, SkillId, StatKind, StatusId, TargetType,
    };
    use std::fs;
    use tempfile::TempDir;

    const ITEMS: &str = r#"(
        items: [
            Weapon((
                id: 1,
                name: "Iron Sword",
                category: Sword,
                base_damage: 12.0,
                crit_chance: 0.05,
            )),
            Armor((
                id: 2,
                name: "Chain Mail",
                slot: Body,
                modifiers: [(stat: Constitution, op: Flat, value: 4.0)],
                resistances: [(Physical, 0.1)],
            )),
            Consumable((
                id: 3,
                name: "Potion",
                effect: Heal(amount: 50),
            )),
        ],
    )"#;

    const SKILLS: &str = r#"(
        skills: [
            (
                id: 1,
                name: "Cleave",
                category: Attack((multiplier: 1.5)),
                cost: Some((resource: PhysicalSp, amount: 2)),
                target: AllEnemies,
                range: FrontLine,
                weapon_requirement: Some((categories: [Sword, Axe])),
            ),
            (
                id: 2,
                name: "Venom Strike",
                category: Debuff(Some((multiplier: 0.5))),
                secondary: [ApplyStatus(status: 1, chance: 0.75)],
            ),
        ],
    )"#;

    const STATUSES: &str = r#"(
        statuses: [
            (
                id: 1,
                name: "Poison",
                category: Debuff,
                duration_ms: 6000,
                tick_interval_ms: 1000,
                max_stacks: 3,
                stackable: true,
                periodic: Some((value_per_tick: 5.0, damage_category: True)),
            ),
            (
                id: 2,
                name: "Stun",
                category: Debuff,
                duration_ms: 2000,
                flags: "PREVENTS_ACTION",
            ),
        ],
    )"#;

    const ROSTER: &str = r#"(
        allies: [
            (
                name: "Knight",
                level: 3,
                base: (constitution: 12.0, strength: 14.0),
                weapon: Some(1),
                armor: [2],
                skills: [1],
                proficiencies: [(Sword, 2)],
                items: [(3, 2)],
            ),
        ],
        enemies: [
            (name: "Goblin"),
            (name: "Goblin Archer", slot: Some(2)),
        ],
    )"#;

    fn write_all(dir: &Path) {
        fs::write(dir.join("items.ron"), ITEMS).unwrap();
        fs::write(dir.join("skills.ron"), SKILLS).unwrap();
        fs::write(dir.join("statuses.ron"), STATUSES).unwrap();
        fs::write(dir.join("roster.ron"), ROSTER).unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_complete_directory() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());
        let factory = ContentFactory::new(dir.path());

        let registry = factory.load_registry().unwrap();
        assert_eq!(registry.item(ItemId(1)).unwrap().name(), "Iron Sword");
        assert!(matches!(
            registry.item(ItemId(3)),
            Some(ItemDef::Consumable(def)) if def.target == TargetType::SingleAlly
        ));
        let cleave = registry.skill(SkillId(1)).unwrap();
        assert_eq!(cleave.target, TargetType::AllEnemies);
        assert_eq!(cleave.weapon_requirement.as_ref().unwrap().min_proficiency, 0);
        let poison = registry.status(StatusId(1)).unwrap();
        assert_eq!(poison.stack_cap(), 3);
        assert!(poison.refresh_on_reapply);
        let stun = registry.status(StatusId(2)).unwrap();
        assert!(stun.flags.contains(StatusFlags::PREVENTS_ACTION));

        let roster = factory.load_roster().unwrap();
        assert_eq!(roster.allies[0].level, 3);
        assert_eq!(roster.enemies[1].slot, Some(2));
        assert_eq!(roster.enemies[0].level, 1);
        assert!(check_references(&registry, Some(&roster)).is_empty());

        let config = factory.load_config().unwrap();
        assert_eq!(config, BattleConfig::default());

        let mut session =
            BattleSession::from_roster(&registry, config, 9, &roster).unwrap();
        session.start().unwrap();
        assert_eq!(session.state(), BattleState::Running);
        let knight = session.members(atb_core::Side::Ally).next().unwrap();
        // CON 12 + 4 from mail, level 3
        assert_eq!(knight.stat(StatKind::MaxHealth), 100.0 + 16.0 * 15.0 + 20.0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path());
        fs::write(
            dir.path().join("statuses.ron"),
            r#"(statuses: [
                (id: 1, name: "Poison", category: Debuff, duration_ms: 1000),
                (id: 1, name: "Venom", category: Debuff, duration_ms: 1000),
            ])"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_registry().unwrap_err();
        assert!(err.to_string().contains("duplicate status:1"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let err = ContentFactory::new(dir.path()).load_items().unwrap_err();
        assert!(err.to_string().contains("items.ron"));
    }

    #[test]
    fn malformed_ron_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("skills.ron"), "(skills: [(id: 1,)])").unwrap();
        let err = ContentFactory::new(dir.path()).load_skills().unwrap_err();
        assert!(err.to_string().contains("skill catalog"));
    }

    #[test]
    fn empty_roster_side_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("roster.ron"), r#"(allies: [(name: "Solo")])"#).unwrap();
        let err = ContentFactory::new(dir.path()).load_roster().unwrap_err();
        assert!(err.to_string().contains("no enemies"));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "tick_ms = 20\n").unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config.tick_ms, 20);
    }

    #[test]
    fn bundled_sample_data_loads() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sim/data");
        let factory = ContentFactory::new(data);
        let registry = factory.load_registry().unwrap();
        let roster = factory.load_roster().unwrap();
        factory.load_config().unwrap();
        assert!(check_references(&registry, Some(&roster)).is_empty());
    }
}
