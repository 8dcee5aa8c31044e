//! Per-tick combat view of a combatant.
//!
//! The cache folds the attribute store, the equipped weapon, the
//! per-category and per-element tables and the temporary buff list into the
//! flat numbers the damage pipeline reads. It is never authoritative: it can
//! be thrown away and rebuilt from the combatant at any time.

use strum::{EnumCount, IntoEnumIterator};

use crate::common::Tick;
use crate::env::WeaponDef;
use crate::stats::{AttributeStore, ModifierOp, ModifierSource, StatKind};

use super::types::{CategoryTable, DamageCategory, Element, ElementTable, WeaponCategory};

/// Lowest resistance (weakness doubles damage).
pub const MIN_RESISTANCE: f64 = -1.0;
/// Highest resistance (90% reduction).
pub const MAX_RESISTANCE: f64 = 0.9;

/// Weapon values the pipeline reads.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub category: WeaponCategory,
    pub element: Element,
    pub damage_category: DamageCategory,
    /// Final damage after prefix bonuses.
    pub base_damage: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub armed: bool,
}

impl WeaponProfile {
    /// Bare hands.
    pub const UNARMED: Self = Self {
        category: WeaponCategory::Blunt,
        element: Element::None,
        damage_category: DamageCategory::Physical,
        base_damage: 1.0,
        crit_chance: 0.05,
        crit_multiplier: 1.5,
        armed: false,
    };

    pub fn from_def(def: &WeaponDef) -> Self {
        Self {
            category: def.category,
            element: def.element,
            damage_category: def.damage_category,
            base_damage: def.final_damage(),
            crit_chance: def.crit_chance,
            crit_multiplier: def.crit_multiplier,
            armed: true,
        }
    }
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::UNARMED
    }
}

/// One table entry, tagged with the source that installed it.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Contribution {
    DamageMultiplier(DamageCategory, f64),
    DamageResistance(DamageCategory, f64),
    ElementalBonus(Element, f64),
    ElementalResistance(Element, f64),
}

/// Short-lived stat adjustment layered over the attribute store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemporaryBuff {
    pub source: ModifierSource,
    pub stat: StatKind,
    pub op: ModifierOp,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub struct CombatAttributeCache {
    contributions: Vec<(ModifierSource, Contribution)>,
    buffs: Vec<TemporaryBuff>,

    dirty: bool,
    refreshed_at: Option<Tick>,

    stats: [f64; StatKind::COUNT],
    weapon: WeaponProfile,
    damage_multiplier: CategoryTable,
    damage_resistance: CategoryTable,
    elemental_bonus: ElementTable,
    elemental_resistance: ElementTable,
}

impl Default for CombatAttributeCache {
    fn default() -> Self {
        Self {
            contributions: Vec::new(),
            buffs: Vec::new(),
            dirty: true,
            refreshed_at: None,
            stats: [0.0; StatKind::COUNT],
            weapon: WeaponProfile::UNARMED,
            damage_multiplier: [1.0; DamageCategory::COUNT],
            damage_resistance: [0.0; DamageCategory::COUNT],
            elemental_bonus: [0.0; Element::COUNT],
            elemental_resistance: [0.0; Element::COUNT],
        }
    }
}

impl CombatAttributeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces recomputation on the next refresh.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True if a refresh at `tick` would recompute.
    pub fn is_stale(&self, tick: Tick) -> bool {
        self.dirty || self.refreshed_at != Some(tick)
    }

    /// Recomputes if dirty or if `tick` differs from the last refresh.
    ///
    /// Returns true if values were recomputed.
    pub fn refresh(
        &mut self,
        tick: Tick,
        store: &AttributeStore,
        weapon: Option<&WeaponDef>,
    ) -> bool {
        if !self.is_stale(tick) {
            return false;
        }

        for stat in StatKind::iter() {
            self.stats[stat.index()] = self.buffed(stat, store.get(stat));
        }
        self.weapon = weapon.map_or(WeaponProfile::UNARMED, WeaponProfile::from_def);

        self.damage_multiplier = [1.0; DamageCategory::COUNT];
        self.damage_resistance = [0.0; DamageCategory::COUNT];
        self.elemental_bonus = [0.0; Element::COUNT];
        self.elemental_resistance = [0.0; Element::COUNT];
        for (_, contribution) in &self.contributions {
            match *contribution {
                Contribution::DamageMultiplier(c, v) => self.damage_multiplier[c.index()] += v,
                Contribution::DamageResistance(c, v) => self.damage_resistance[c.index()] += v,
                Contribution::ElementalBonus(e, v) => self.elemental_bonus[e.index()] += v,
                Contribution::ElementalResistance(e, v) => {
                    self.elemental_resistance[e.index()] += v
                }
            }
        }

        self.dirty = false;
        self.refreshed_at = Some(tick);
        tracing::trace!(tick = %tick, "combat cache refreshed");
        true
    }

    fn buffed(&self, stat: StatKind, value: f64) -> f64 {
        let (mut flat, mut add, mut mult) = (0.0, 0.0, 1.0);
        for buff in self.buffs.iter().filter(|b| b.stat == stat) {
            match buff.op {
                ModifierOp::Flat => flat += buff.value,
                ModifierOp::PercentAdd => add += buff.value,
                ModifierOp::PercentMult => mult *= 1.0 + buff.value,
            }
        }
        let result = (value + flat) * (1.0 + add) * mult;
        if result.is_finite() { result.max(0.0) } else { 0.0 }
    }

    // ===== mutators =====

    pub fn add_damage_multiplier(
        &mut self,
        source: ModifierSource,
        category: DamageCategory,
        value: f64,
    ) {
        self.push(source, Contribution::DamageMultiplier(category, value));
    }

    pub fn add_damage_resistance(
        &mut self,
        source: ModifierSource,
        category: DamageCategory,
        value: f64,
    ) {
        self.push(source, Contribution::DamageResistance(category, value));
    }

    pub fn add_elemental_damage_bonus(
        &mut self,
        source: ModifierSource,
        element: Element,
        value: f64,
    ) {
        self.push(source, Contribution::ElementalBonus(element, value));
    }

    pub fn add_elemental_resistance(
        &mut self,
        source: ModifierSource,
        element: Element,
        value: f64,
    ) {
        self.push(source, Contribution::ElementalResistance(element, value));
    }

    pub fn add_temporary_buff(&mut self, buff: TemporaryBuff) {
        self.buffs.push(buff);
        self.dirty = true;
    }

    /// Removes every temporary buff from `source`. Returns how many were removed.
    pub fn remove_temporary_buff(&mut self, source: ModifierSource) -> usize {
        let before = self.buffs.len();
        self.buffs.retain(|b| b.source != source);
        let removed = before - self.buffs.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Drops every table entry and buff installed by `source`.
    pub fn remove_contributions_from(&mut self, source: ModifierSource) -> usize {
        let before = self.contributions.len() + self.buffs.len();
        self.contributions.retain(|(s, _)| *s != source);
        self.buffs.retain(|b| b.source != source);
        let removed = before - self.contributions.len() - self.buffs.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    pub fn has_buff_from(&self, source: ModifierSource) -> bool {
        self.buffs.iter().any(|b| b.source == source)
    }

    fn push(&mut self, source: ModifierSource, contribution: Contribution) {
        self.contributions.push((source, contribution));
        self.dirty = true;
    }

    // ===== accessors =====

    /// Stat value with temporary buffs, as of the last refresh.
    pub fn stat(&self, stat: StatKind) -> f64 {
        self.stats[stat.index()]
    }

    pub fn weapon(&self) -> &WeaponProfile {
        &self.weapon
    }

    /// Zero for True damage.
    pub fn attack_for(&self, category: DamageCategory) -> f64 {
        match category {
            DamageCategory::Physical => self.stat(StatKind::PhysicalAttack),
            DamageCategory::Magic => self.stat(StatKind::MagicAttack),
            DamageCategory::True => 0.0,
        }
    }

    /// Zero for True damage.
    pub fn defense_for(&self, category: DamageCategory) -> f64 {
        match category {
            DamageCategory::Physical => self.stat(StatKind::PhysicalDefense),
            DamageCategory::Magic => self.stat(StatKind::MagicDefense),
            DamageCategory::True => 0.0,
        }
    }

    /// Zero for True damage.
    pub fn block_rate_for(&self, category: DamageCategory) -> f64 {
        match category {
            DamageCategory::Physical => self.stat(StatKind::PhysicalBlockRate),
            DamageCategory::Magic => self.stat(StatKind::MagicBlockRate),
            DamageCategory::True => 0.0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.stat(StatKind::Accuracy)
    }

    pub fn evasion(&self) -> f64 {
        self.stat(StatKind::Evasion)
    }

    pub fn crit_rate(&self) -> f64 {
        self.stat(StatKind::CriticalRate)
    }

    pub fn crit_damage(&self) -> f64 {
        self.stat(StatKind::CriticalDamage)
    }

    pub fn speed(&self) -> f64 {
        self.stat(StatKind::Speed)
    }

    /// Outgoing multiplier for a category, `1 + Σ`, never negative.
    pub fn damage_multiplier(&self, category: DamageCategory) -> f64 {
        self.damage_multiplier[category.index()].max(0.0)
    }

    /// Incoming category resistance, clamped. True damage has none.
    pub fn damage_resistance(&self, category: DamageCategory) -> f64 {
        match category {
            DamageCategory::True => 0.0,
            other => clamp_resistance(self.damage_resistance[other.index()]),
        }
    }

    pub fn elemental_bonus(&self, element: Element) -> f64 {
        self.elemental_bonus[element.index()]
    }

    /// Incoming elemental resistance, clamped.
    pub fn elemental_resistance(&self, element: Element) -> f64 {
        clamp_resistance(self.elemental_resistance[element.index()])
    }
}

fn clamp_resistance(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_RESISTANCE, MAX_RESISTANCE)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ItemId;
    use crate::stats::AttributeModifier;

    const RING: ModifierSource = ModifierSource::Equipment(ItemId(3));

    #[test]
    fn refresh_is_gated_by_tick_and_dirty_flag() {
        let store = AttributeStore::default();
        let mut cache = CombatAttributeCache::new();

        assert!(cache.refresh(Tick(1), &store, None));
        assert!(!cache.refresh(Tick(1), &store, None));
        assert!(cache.refresh(Tick(2), &store, None));

        cache.mark_dirty();
        assert!(cache.refresh(Tick(2), &store, None));
    }

    #[test]
    fn refresh_picks_up_store_changes_on_next_tick() {
        let mut store = AttributeStore::default();
        let mut cache = CombatAttributeCache::new();
        cache.refresh(Tick(1), &store, None);
        assert_eq!(cache.speed(), 70.0);

        store.add_modifier(AttributeModifier::flat(StatKind::Speed, 10.0, RING));
        assert_eq!(cache.speed(), 70.0);
        cache.refresh(Tick(2), &store, None);
        assert_eq!(cache.speed(), 80.0);
    }

    #[test]
    fn unarmed_defaults() {
        let mut cache = CombatAttributeCache::new();
        cache.refresh(Tick(0), &AttributeStore::default(), None);
        assert_eq!(*cache.weapon(), WeaponProfile::UNARMED);
        assert_eq!(cache.weapon().category, WeaponCategory::Blunt);
        assert_eq!(cache.weapon().crit_multiplier, 1.5);
    }

    #[test]
    fn true_damage_has_no_attack_defense_or_resistance() {
        let mut cache = CombatAttributeCache::new();
        cache.add_damage_resistance(RING, DamageCategory::True, 0.5);
        cache.refresh(Tick(0), &AttributeStore::default(), None);

        assert_eq!(cache.attack_for(DamageCategory::True), 0.0);
        assert_eq!(cache.defense_for(DamageCategory::True), 0.0);
        assert_eq!(cache.damage_resistance(DamageCategory::True), 0.0);
    }

    #[test]
    fn resistance_is_clamped() {
        let mut cache = CombatAttributeCache::new();
        cache.add_elemental_resistance(RING, Element::Fire, 0.7);
        cache.add_elemental_resistance(RING, Element::Fire, 0.7);
        cache.add_elemental_resistance(RING, Element::Ice, -3.0);
        cache.refresh(Tick(0), &AttributeStore::default(), None);

        assert_eq!(cache.elemental_resistance(Element::Fire), MAX_RESISTANCE);
        assert_eq!(cache.elemental_resistance(Element::Ice), MIN_RESISTANCE);
    }

    #[test]
    fn temporary_buffs_layer_over_store_values() {
        let store = AttributeStore::default();
        let mut cache = CombatAttributeCache::new();
        cache.add_temporary_buff(TemporaryBuff {
            source: ModifierSource::Defend,
            stat: StatKind::PhysicalDefense,
            op: ModifierOp::PercentAdd,
            value: 0.5,
        });
        cache.refresh(Tick(0), &store, None);
        assert_eq!(cache.defense_for(DamageCategory::Physical), 7.5);

        assert_eq!(cache.remove_temporary_buff(ModifierSource::Defend), 1);
        assert!(cache.is_dirty());
        cache.refresh(Tick(0), &store, None);
        assert_eq!(cache.defense_for(DamageCategory::Physical), 5.0);
    }

    #[test]
    fn removing_a_source_clears_its_tables() {
        let mut cache = CombatAttributeCache::new();
        cache.add_damage_multiplier(RING, DamageCategory::Magic, 0.25);
        cache.add_elemental_damage_bonus(RING, Element::Holy, 0.1);
        cache.refresh(Tick(0), &AttributeStore::default(), None);
        assert_eq!(cache.damage_multiplier(DamageCategory::Magic), 1.25);

        assert_eq!(cache.remove_contributions_from(RING), 2);
        cache.refresh(Tick(0), &AttributeStore::default(), None);
        assert_eq!(cache.damage_multiplier(DamageCategory::Magic), 1.0);
        assert_eq!(cache.elemental_bonus(Element::Holy), 0.0);
    }
}
