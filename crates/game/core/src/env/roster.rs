//! Roster data: who fights, with what.

use crate::combat::WeaponCategory;
use crate::common::{Controller, ItemId, SkillId};
use crate::stats::BaseStats;

/// One combatant as authored in roster data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: Controller,
    /// Formation slot; `None` takes the first free one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: Vec<ItemId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub accessories: Vec<ItemId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub proficiencies: Vec<(WeaponCategory, u32)>,
    /// Consumables carried into battle, with counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<(ItemId, u32)>,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

impl CombatantTemplate {
    /// A level-1 AI combatant with average attributes and nothing equipped.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            base: BaseStats::default(),
            controller: Controller::Ai,
            slot: None,
            weapon: None,
            armor: Vec::new(),
            accessories: Vec::new(),
            skills: Vec::new(),
            proficiencies: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_base(mut self, base: BaseStats) -> Self {
        self.base = base;
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_weapon(mut self, weapon: ItemId) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_armor(mut self, armor: ItemId) -> Self {
        self.armor.push(armor);
        self
    }

    pub fn with_accessory(mut self, accessory: ItemId) -> Self {
        self.accessories.push(accessory);
        self
    }

    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_proficiency(mut self, category: WeaponCategory, level: u32) -> Self {
        self.proficiencies.push((category, level));
        self
    }

    pub fn with_item(mut self, item: ItemId, count: u32) -> Self {
        self.items.push((item, count));
        self
    }
}

/// Both parties of one battle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRoster {
    #[cfg_attr(feature = "serde", serde(default))]
    pub allies: Vec<CombatantTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemies: Vec<CombatantTemplate>,
}

impl BattleRoster {
    pub fn new(allies: Vec<CombatantTemplate>, enemies: Vec<CombatantTemplate>) -> Self {
        Self { allies, enemies }
    }
}
