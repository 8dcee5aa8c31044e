//! Modifier ledger.
//!
//! Every stat (base or derived) owns one ledger. A ledger combines its
//! entries with a single, order-independent formula:
//!
//! ```text
//! final = (base + Σflat) × (1 + Σpercent_add) × Π(1 + percent_mult)
//! ```

use crate::common::{ItemId, StatusId};

use super::kind::StatKind;

/// How a modifier combines with the base value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierOp {
    /// Added to the base before any percentage (e.g. +5 Strength).
    Flat,
    /// Summed with other percent-additive modifiers (0.2 = +20%).
    PercentAdd,
    /// Applied as its own factor `(1 + value)` (0.5 = ×1.5, -0.1 = ×0.9).
    PercentMult,
}

/// Where a modifier came from.
///
/// Only used for bulk removal; a source does not own its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierSource {
    /// An equipped item (weapon, armor piece, accessory).
    Equipment(ItemId),
    /// An active status effect instance.
    Status(StatusId),
    /// A talent node, fed in by the progression layer.
    Talent(u32),
    /// The Defend action's temporary guard.
    Defend,
    /// Anything else the host wants to tag.
    External(u64),
}

/// A single contribution to one stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub stat: StatKind,
    pub op: ModifierOp,
    pub value: f64,
    pub source: ModifierSource,
}

impl AttributeModifier {
    pub fn new(stat: StatKind, op: ModifierOp, value: f64, source: ModifierSource) -> Self {
        Self {
            stat,
            op,
            value,
            source,
        }
    }

    /// Flat modifier.
    pub fn flat(stat: StatKind, value: f64, source: ModifierSource) -> Self {
        Self::new(stat, ModifierOp::Flat, value, source)
    }

    /// Percent-additive modifier (0.2 = +20%).
    pub fn percent_add(stat: StatKind, value: f64, source: ModifierSource) -> Self {
        Self::new(stat, ModifierOp::PercentAdd, value, source)
    }

    /// Percent-multiplicative modifier (0.5 = ×1.5).
    pub fn percent_mult(stat: StatKind, value: f64, source: ModifierSource) -> Self {
        Self::new(stat, ModifierOp::PercentMult, value, source)
    }
}

/// Modifier as written in content data: no source, scaled on install.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifierTemplate {
    pub stat: StatKind,
    pub op: ModifierOp,
    pub value: f64,
}

impl StatModifierTemplate {
    pub const fn new(stat: StatKind, op: ModifierOp, value: f64) -> Self {
        Self { stat, op, value }
    }

    /// Binds the template to a source, multiplying its value by `scale`
    /// (stack count for status effects, 1 for equipment).
    pub fn instantiate(&self, source: ModifierSource, scale: f64) -> AttributeModifier {
        AttributeModifier::new(self.stat, self.op, self.value * scale, source)
    }
}

/// The modifiers attached to one stat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierLedger {
    entries: Vec<AttributeModifier>,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modifier: AttributeModifier) {
        self.entries.push(modifier);
    }

    /// Removes one entry equal to `modifier`. Returns true if one was found.
    pub fn remove(&mut self, modifier: &AttributeModifier) -> bool {
        match self.entries.iter().position(|m| m == modifier) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes every entry from `source`. Returns how many were removed.
    pub fn remove_source(&mut self, source: ModifierSource) -> usize {
        let before = self.entries.len();
        self.entries.retain(|m| m.source != source);
        before - self.entries.len()
    }

    /// Combines all entries with `base`.
    pub fn apply(&self, base: f64) -> f64 {
        let mut flat = 0.0;
        let mut percent_add = 0.0;
        let mut percent_mult = 1.0;

        for modifier in &self.entries {
            match modifier.op {
                ModifierOp::Flat => flat += modifier.value,
                ModifierOp::PercentAdd => percent_add += modifier.value,
                ModifierOp::PercentMult => percent_mult *= 1.0 + modifier.value,
            }
        }

        (base + flat) * (1.0 + percent_add) * percent_mult
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeModifier> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
