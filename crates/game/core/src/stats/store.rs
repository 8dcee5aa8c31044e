//! Attribute store with dependency-aware memoization.

use std::cell::Cell;

use strum::{EnumCount, IntoEnumIterator};

use super::base::BaseStats;
use super::formulas::derived_base;
use super::kind::{StatKind, StatMask};
use super::modifier::{AttributeModifier, ModifierLedger, ModifierSource};

/// Per-combatant attribute model.
///
/// Holds base attribute values, the level, and one [`ModifierLedger`] per
/// stat. Reads are memoized: a stat is recomputed only when it, or a base
/// attribute its formula reads, changed since the last read.
#[derive(Clone, Debug)]
pub struct AttributeStore {
    level: u32,
    base: BaseStats,
    ledgers: [ModifierLedger; StatKind::COUNT],
    values: [Cell<f64>; StatKind::COUNT],
    dirty: Cell<StatMask>,
}

impl AttributeStore {
    pub fn new(base: BaseStats, level: u32) -> Self {
        Self {
            level: level.max(1),
            base,
            ledgers: Default::default(),
            values: Default::default(),
            dirty: Cell::new(StatMask::all()),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    /// Final value of `stat` after all modifiers.
    pub fn get(&self, stat: StatKind) -> f64 {
        let slot = &self.values[stat.index()];
        let dirty = self.dirty.get();
        if !dirty.contains(stat.mask()) {
            return slot.get();
        }

        let raw = if stat.is_base() {
            self.base.get(stat)
        } else {
            derived_base(stat, self.level, |attr| self.get(attr))
        };
        let value = sanitize(stat, self.ledgers[stat.index()].apply(raw));

        slot.set(value);
        // Re-read: computing a derived stat may have cleaned base bits.
        self.dirty.set(self.dirty.get().difference(stat.mask()));
        value
    }

    /// Looks a stat up by its content name (`"physical_attack"`).
    ///
    /// Unknown names resolve to 0 and are logged.
    pub fn get_named(&self, name: &str) -> f64 {
        match name.parse::<StatKind>() {
            Ok(stat) => self.get(stat),
            Err(_) => {
                tracing::warn!(stat = name, "unknown stat tag, using 0");
                0.0
            }
        }
    }

    pub fn add_modifier(&mut self, modifier: AttributeModifier) {
        self.ledgers[modifier.stat.index()].push(modifier);
        self.invalidate(modifier.stat);
    }

    /// Removes one modifier equal to `modifier`. Returns true if one existed.
    pub fn remove_modifier(&mut self, modifier: &AttributeModifier) -> bool {
        let removed = self.ledgers[modifier.stat.index()].remove(modifier);
        if removed {
            self.invalidate(modifier.stat);
        }
        removed
    }

    /// Removes every modifier tagged with `source`. Returns how many were removed.
    pub fn remove_modifiers_from_source(&mut self, source: ModifierSource) -> usize {
        let mut total = 0;
        for stat in StatKind::iter() {
            let removed = self.ledgers[stat.index()].remove_source(source);
            if removed > 0 {
                self.invalidate(stat);
                total += removed;
            }
        }
        total
    }

    /// Overwrites one base attribute.
    pub fn set_base(&mut self, stat: StatKind, value: f64) {
        let target = match stat {
            StatKind::Constitution => &mut self.base.constitution,
            StatKind::Strength => &mut self.base.strength,
            StatKind::Perception => &mut self.base.perception,
            StatKind::Reaction => &mut self.base.reaction,
            StatKind::Wisdom => &mut self.base.wisdom,
            StatKind::Luck => &mut self.base.luck,
            other => {
                tracing::warn!(stat = %other, "set_base called with a derived stat");
                return;
            }
        };
        *target = value;
        self.invalidate(stat);
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.invalidate(StatKind::MaxHealth);
    }

    /// Modifiers currently attached to `stat`.
    pub fn modifiers(&self, stat: StatKind) -> impl Iterator<Item = &AttributeModifier> {
        self.ledgers[stat.index()].iter()
    }

    /// Stats that will be recomputed on their next read.
    pub fn dirty_mask(&self) -> StatMask {
        self.dirty.get()
    }

    fn invalidate(&mut self, stat: StatKind) {
        let mask = self.dirty.get() | stat.invalidation_mask();
        self.dirty.set(mask);
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new(BaseStats::default(), 1)
    }
}

/// Non-finite values collapse to zero, as do negative values of floored stats.
fn sanitize(stat: StatKind, value: f64) -> f64 {
    if !value.is_finite() {
        0.0
    } else if stat.is_non_negative() {
        value.max(0.0)
    } else {
        value
    }
}
