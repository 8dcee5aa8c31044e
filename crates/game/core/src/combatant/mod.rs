//! The one canonical combatant type.
//!
//! A combatant owns its attribute store, its combat cache, its equipment,
//! its statuses and its runtime scalars. Every mutator keeps the scalars
//! inside `[0, max]` and marks the cache dirty when a modifier set changes.

mod loadout;
mod resources;
mod snapshot;

pub use loadout::Loadout;
pub use resources::Resources;
pub use snapshot::{CombatantSnapshot, StatusSnapshot};

use std::collections::BTreeMap;

use strum::EnumCount;

use crate::combat::{CombatAttributeCache, TemporaryBuff, WeaponCategory};
use crate::common::{CombatantId, Controller, ItemId, ResourceKind, Side, SkillId, StatusId, Tick};
use crate::config::BattleConfig;
use crate::env::{CombatantTemplate, ContentRegistry, StatusCategory, StatusEffectDef};
use crate::stats::{AttributeModifier, AttributeStore, ModifierOp, ModifierSource, StatKind};
use crate::status::{StatusAdvance, StatusApplication, StatusEffects};

use resources::pool_max;

#[derive(Clone, Debug)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    side: Side,
    controller: Controller,

    attributes: AttributeStore,
    cache: CombatAttributeCache,
    loadout: Loadout,
    statuses: StatusEffects,

    skills: Vec<SkillId>,
    proficiencies: [u32; WeaponCategory::COUNT],
    cooldowns: BTreeMap<SkillId, u32>,
    items: BTreeMap<ItemId, u32>,

    resources: Resources,
    timer_max: f64,
}

impl Combatant {
    /// Builds a combatant at full health and SP with nothing equipped.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        attributes: AttributeStore,
        config: &BattleConfig,
    ) -> Self {
        let mut combatant = Self {
            id,
            name: name.into(),
            side,
            controller: Controller::Ai,
            attributes,
            cache: CombatAttributeCache::new(),
            loadout: Loadout::default(),
            statuses: StatusEffects::new(),
            skills: Vec::new(),
            proficiencies: [0; WeaponCategory::COUNT],
            cooldowns: BTreeMap::new(),
            items: BTreeMap::new(),
            resources: Resources::full(0, 0, 0),
            timer_max: config.timer_threshold,
        };
        combatant.fill_pools();
        combatant
    }

    /// Builds a combatant from roster data, equipping every listed item the
    /// registry knows. Unknown ids are logged and skipped.
    pub fn from_template(
        id: CombatantId,
        side: Side,
        template: &CombatantTemplate,
        registry: &ContentRegistry,
        config: &BattleConfig,
    ) -> Self {
        let attributes = AttributeStore::new(template.base, template.level);
        let mut combatant = Self::new(id, template.name.clone(), side, attributes, config);
        combatant.controller = template.controller;

        let equipment = template
            .weapon
            .iter()
            .chain(&template.armor)
            .chain(&template.accessories);
        for item_id in equipment {
            match registry.item(*item_id) {
                Some(item) if item.is_equippable() => {
                    if !combatant.equip(item) {
                        tracing::warn!(combatant = %id, item = %item_id, "could not equip");
                    }
                }
                Some(_) => tracing::warn!(combatant = %id, item = %item_id, "item is not equippable"),
                None => tracing::warn!(combatant = %id, item = %item_id, "unknown item id"),
            }
        }

        for skill in &template.skills {
            if registry.skill(*skill).is_none() {
                tracing::warn!(combatant = %id, skill = %skill, "unknown skill id");
            }
            combatant.learn_skill(*skill);
        }
        for &(category, level) in &template.proficiencies {
            combatant.set_proficiency(category, level);
        }
        for &(item, count) in &template.items {
            combatant.add_item(item, count);
        }

        combatant.fill_pools();
        combatant
    }

    // ===== identity =====

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn set_controller(&mut self, controller: Controller) {
        self.controller = controller;
    }

    pub fn level(&self) -> u32 {
        self.attributes.level()
    }

    // ===== attributes =====

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn stat(&self, stat: StatKind) -> f64 {
        self.attributes.get(stat)
    }

    pub fn add_modifier(&mut self, modifier: AttributeModifier) {
        self.attributes.add_modifier(modifier);
        self.cache.mark_dirty();
        self.clamp_resources();
    }

    pub fn remove_modifier(&mut self, modifier: &AttributeModifier) -> bool {
        let removed = self.attributes.remove_modifier(modifier);
        if removed {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        removed
    }

    pub fn remove_modifiers_from_source(&mut self, source: ModifierSource) -> usize {
        let removed = self.attributes.remove_modifiers_from_source(source);
        if removed > 0 {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        removed
    }

    pub fn set_level(&mut self, level: u32) {
        self.attributes.set_level(level);
        self.cache.mark_dirty();
        self.clamp_resources();
    }

    // ===== combat cache =====

    pub fn cache(&self) -> &CombatAttributeCache {
        &self.cache
    }

    /// Brings the cache up to date for `tick`. Returns true if it recomputed.
    pub fn refresh_cache(&mut self, tick: Tick) -> bool {
        self.cache
            .refresh(tick, &self.attributes, self.loadout.weapon())
    }

    /// Cached speed, as of the last refresh.
    pub fn speed(&self) -> f64 {
        self.cache.speed()
    }

    /// Installs the Defend guard: a percent bonus to both defenses.
    pub fn begin_defend(&mut self, bonus: f64) {
        self.cache.remove_temporary_buff(ModifierSource::Defend);
        for stat in [StatKind::PhysicalDefense, StatKind::MagicDefense] {
            self.cache.add_temporary_buff(TemporaryBuff {
                source: ModifierSource::Defend,
                stat,
                op: ModifierOp::PercentAdd,
                value: bonus,
            });
        }
    }

    /// Drops the Defend guard. Returns true if one was active.
    pub fn end_defend(&mut self) -> bool {
        self.cache.remove_temporary_buff(ModifierSource::Defend) > 0
    }

    pub fn is_defending(&self) -> bool {
        self.cache.has_buff_from(ModifierSource::Defend)
    }

    // ===== equipment =====

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    /// Category of the equipped weapon; bare hands count as Blunt.
    pub fn weapon_category(&self) -> WeaponCategory {
        self.loadout
            .weapon()
            .map_or(WeaponCategory::Blunt, |w| w.category)
    }

    // ===== pools =====

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn max_health(&self) -> u32 {
        pool_max(self.attributes.get(StatKind::MaxHealth))
    }

    pub fn max_physical_sp(&self) -> u32 {
        pool_max(self.attributes.get(StatKind::MaxPhysicalSp))
    }

    pub fn max_magic_sp(&self) -> u32 {
        pool_max(self.attributes.get(StatKind::MaxMagicSp))
    }

    pub fn max_resource(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Health => self.max_health(),
            ResourceKind::PhysicalSp => self.max_physical_sp(),
            ResourceKind::MagicSp => self.max_magic_sp(),
        }
    }

    pub fn health(&self) -> u32 {
        self.resources.health
    }

    pub fn is_downed(&self) -> bool {
        self.resources.health == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_downed()
    }

    pub fn resource(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Health => self.resources.health,
            ResourceKind::PhysicalSp => self.resources.physical_sp,
            ResourceKind::MagicSp => self.resources.magic_sp,
        }
    }

    /// Sets a pool, clamped to `[0, max]`.
    pub fn set_resource(&mut self, kind: ResourceKind, value: u32) {
        let value = value.min(self.max_resource(kind));
        match kind {
            ResourceKind::Health => self.resources.health = value,
            ResourceKind::PhysicalSp => self.resources.physical_sp = value,
            ResourceKind::MagicSp => self.resources.magic_sp = value,
        }
        debug_assert!(self.resource(kind) <= self.max_resource(kind));
    }

    pub fn set_health(&mut self, value: u32) {
        self.set_resource(ResourceKind::Health, value);
    }

    /// Spends `amount` if affordable. Returns false (and spends nothing) otherwise.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> bool {
        let current = self.resource(kind);
        if current < amount {
            return false;
        }
        self.set_resource(kind, current - amount);
        true
    }

    /// Adds to a pool up to its max. Returns the amount actually restored.
    pub fn restore(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let before = self.resource(kind);
        self.set_resource(kind, before.saturating_add(amount));
        self.resource(kind) - before
    }

    /// Subtracts health. Returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.resources.health;
        self.set_health(before.saturating_sub(amount));
        before - self.resources.health
    }

    /// Heals a live combatant. Downed combatants are not healed; see [`Self::revive`].
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_downed() {
            return 0;
        }
        self.restore(ResourceKind::Health, amount)
    }

    /// Brings a downed combatant back with `health` (at least 1).
    pub fn revive(&mut self, health: u32) -> bool {
        if !self.is_downed() {
            return false;
        }
        self.set_health(health.max(1));
        self.resources.timer = 0.0;
        self.is_alive()
    }

    pub fn stress(&self) -> u32 {
        self.resources.stress
    }

    pub fn add_stress(&mut self, amount: u32) {
        self.resources.stress = Resources::clamp_stress(self.resources.stress.saturating_add(amount));
    }

    pub fn relieve_stress(&mut self, amount: u32) -> u32 {
        let before = self.resources.stress;
        self.resources.stress = before.saturating_sub(amount);
        before - self.resources.stress
    }

    pub fn fatigue(&self) -> u32 {
        self.resources.fatigue
    }

    pub fn add_fatigue(&mut self, amount: u32) {
        self.resources.fatigue =
            Resources::clamp_fatigue(self.resources.fatigue.saturating_add(amount));
    }

    pub fn timer(&self) -> f64 {
        self.resources.timer
    }

    pub fn timer_max(&self) -> f64 {
        self.timer_max
    }

    pub fn set_timer(&mut self, value: f64) {
        self.resources.timer = Resources::clamp_timer(value, self.timer_max);
        debug_assert!((0.0..=self.timer_max.max(0.0)).contains(&self.resources.timer));
    }

    pub fn is_ready(&self) -> bool {
        self.resources.timer >= self.timer_max
    }

    fn fill_pools(&mut self) {
        self.resources.health = self.max_health();
        self.resources.physical_sp = self.max_physical_sp();
        self.resources.magic_sp = self.max_magic_sp();
    }

    /// Re-clamps every pool after a max may have dropped.
    fn clamp_resources(&mut self) {
        for kind in [ResourceKind::Health, ResourceKind::PhysicalSp, ResourceKind::MagicSp] {
            let current = self.resource(kind);
            self.set_resource(kind, current);
        }
    }

    // ===== statuses =====

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub fn has_status(&self, status: StatusId) -> bool {
        self.statuses.contains(status)
    }

    /// True if a status blocks this combatant's turns.
    pub fn is_action_prevented(&self) -> bool {
        self.statuses.prevents_action()
    }

    pub fn apply_status(
        &mut self,
        def: &StatusEffectDef,
        source: Option<CombatantId>,
    ) -> StatusApplication {
        let outcome = self.statuses.apply(def, source, &mut self.attributes);
        if outcome.changed() {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        outcome
    }

    pub fn remove_status(&mut self, status: StatusId) -> bool {
        let removed = self.statuses.remove(status, &mut self.attributes);
        if removed {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        removed
    }

    /// Removes every status of `category`.
    pub fn cleanse(&mut self, category: StatusCategory) -> Vec<StatusId> {
        let removed = self.statuses.remove_category(category, &mut self.attributes);
        if !removed.is_empty() {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        removed
    }

    pub fn clear_statuses(&mut self) -> Vec<StatusId> {
        let removed = self.statuses.clear(&mut self.attributes);
        if !removed.is_empty() {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        removed
    }

    /// Advances statuses by `dt_ms` of simulated time.
    pub fn advance_statuses(&mut self, dt_ms: u64) -> StatusAdvance {
        let advance = self.statuses.advance(dt_ms, &mut self.attributes);
        if !advance.expired.is_empty() {
            self.cache.mark_dirty();
            self.clamp_resources();
        }
        advance
    }

    // ===== skills =====

    pub fn skills(&self) -> &[SkillId] {
        &self.skills
    }

    pub fn knows_skill(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    pub fn learn_skill(&mut self, skill: SkillId) {
        if !self.knows_skill(skill) {
            self.skills.push(skill);
        }
    }

    pub fn proficiency(&self, category: WeaponCategory) -> u32 {
        self.proficiencies[category.index()]
    }

    pub fn set_proficiency(&mut self, category: WeaponCategory, level: u32) {
        self.proficiencies[category.index()] = level;
    }

    /// Remaining own turns before `skill` is usable again.
    pub fn cooldown(&self, skill: SkillId) -> u32 {
        self.cooldowns.get(&skill).copied().unwrap_or(0)
    }

    pub fn set_cooldown(&mut self, skill: SkillId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(&skill);
        } else {
            self.cooldowns.insert(skill, turns);
        }
    }

    /// Counts every cooldown down by one completed turn.
    pub fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    // ===== consumables =====

    pub fn item_count(&self, item: ItemId) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item: ItemId, count: u32) {
        if count > 0 {
            *self.items.entry(item).or_insert(0) += count;
        }
    }

    /// Uses up one `item`. Returns false if none is carried.
    pub fn consume_item(&mut self, item: ItemId) -> bool {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.items.remove(&item);
                }
                true
            }
            _ => false,
        }
    }
}
