//! Persisted form of a combatant.
//!
//! The snapshot stores ids and current values only. Definitions are looked
//! up again on restore, so stat maxima and modifiers are always re-derived
//! from content rather than trusted from storage.

use strum::IntoEnumIterator;

use crate::combat::WeaponCategory;
use crate::common::{CombatantId, Controller, ItemId, ResourceKind, Side, SkillId, StatusId};
use crate::config::BattleConfig;
use crate::env::ContentRegistry;
use crate::stats::{AttributeStore, BaseStats};

use super::{Combatant, Resources};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    pub status: StatusId,
    pub remaining_ms: u64,
    pub stacks: u32,
    pub tick_elapsed_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub controller: Controller,
    pub level: u32,
    pub base: BaseStats,
    pub equipment: Vec<ItemId>,
    pub skills: Vec<SkillId>,
    pub proficiencies: Vec<(WeaponCategory, u32)>,
    pub cooldowns: Vec<(SkillId, u32)>,
    pub items: Vec<(ItemId, u32)>,
    pub resources: Resources,
    pub statuses: Vec<StatusSnapshot>,
}

impl Combatant {
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id,
            name: self.name.clone(),
            side: self.side,
            controller: self.controller,
            level: self.level(),
            base: *self.attributes.base(),
            equipment: self.loadout.item_ids(),
            skills: self.skills.clone(),
            proficiencies: WeaponCategory::iter()
                .map(|c| (c, self.proficiency(c)))
                .filter(|&(_, level)| level > 0)
                .collect(),
            cooldowns: self.cooldowns.iter().map(|(&s, &t)| (s, t)).collect(),
            items: self.items.iter().map(|(&i, &n)| (i, n)).collect(),
            resources: self.resources,
            statuses: self
                .statuses
                .iter()
                .map(|i| StatusSnapshot {
                    status: i.status,
                    remaining_ms: i.remaining_ms,
                    stacks: i.stacks,
                    tick_elapsed_ms: i.tick_elapsed_ms,
                })
                .collect(),
        }
    }

    /// Rebuilds a combatant from a snapshot.
    ///
    /// Equipment and statuses are re-installed from `registry`; ids it does
    /// not know are skipped with a warning. Stored pool values are clamped
    /// against the re-derived maxima.
    pub fn from_snapshot(
        snapshot: &CombatantSnapshot,
        registry: &ContentRegistry,
        config: &BattleConfig,
    ) -> Self {
        let attributes = AttributeStore::new(snapshot.base, snapshot.level);
        let mut combatant = Self::new(
            snapshot.id,
            snapshot.name.clone(),
            snapshot.side,
            attributes,
            config,
        );
        combatant.controller = snapshot.controller;

        for item_id in &snapshot.equipment {
            match registry.item(*item_id) {
                Some(item) => {
                    combatant.equip(item);
                }
                None => tracing::warn!(
                    combatant = %snapshot.id,
                    item = %item_id,
                    "unknown item in snapshot"
                ),
            }
        }

        for saved in &snapshot.statuses {
            let Some(def) = registry.status(saved.status) else {
                tracing::warn!(
                    combatant = %snapshot.id,
                    status = %saved.status,
                    "unknown status in snapshot"
                );
                continue;
            };
            combatant.statuses.restore(
                def,
                saved.remaining_ms,
                saved.stacks,
                saved.tick_elapsed_ms,
                &mut combatant.attributes,
            );
        }
        combatant.cache.mark_dirty();

        for skill in &snapshot.skills {
            combatant.learn_skill(*skill);
        }
        for &(category, level) in &snapshot.proficiencies {
            combatant.set_proficiency(category, level);
        }
        for &(skill, turns) in &snapshot.cooldowns {
            combatant.set_cooldown(skill, turns);
        }
        for &(item, count) in &snapshot.items {
            combatant.add_item(item, count);
        }

        let saved = snapshot.resources;
        combatant.resources = Resources {
            health: 0,
            physical_sp: 0,
            magic_sp: 0,
            stress: Resources::clamp_stress(saved.stress),
            fatigue: Resources::clamp_fatigue(saved.fatigue),
            timer: Resources::clamp_timer(saved.timer, combatant.timer_max),
        };
        combatant.set_health(saved.health);
        combatant.set_resource(ResourceKind::PhysicalSp, saved.physical_sp);
        combatant.set_resource(ResourceKind::MagicSp, saved.magic_sp);
        combatant
    }
}
