//! Base attributes as authored in roster data.

use super::kind::StatKind;

/// The six base attributes that define a combatant.
///
/// - **CON** (Constitution): health, physical defense, physical block
/// - **STR** (Strength): physical attack, physical SP
/// - **PER** (Perception): accuracy, critical rate and damage
/// - **REA** (Reaction): speed, evasion
/// - **WIS** (Wisdom): magic attack/defense, magic SP, magic block
/// - **LUK** (Luck): critical rate, evasion
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub constitution: f64,
    pub strength: f64,
    pub perception: f64,
    pub reaction: f64,
    pub wisdom: f64,
    pub luck: f64,
}

impl BaseStats {
    pub fn new(
        constitution: f64,
        strength: f64,
        perception: f64,
        reaction: f64,
        wisdom: f64,
        luck: f64,
    ) -> Self {
        Self {
            constitution,
            strength,
            perception,
            reaction,
            wisdom,
            luck,
        }
    }

    /// Value of one base attribute. Derived stats return their default.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Constitution => self.constitution,
            StatKind::Strength => self.strength,
            StatKind::Perception => self.perception,
            StatKind::Reaction => self.reaction,
            StatKind::Wisdom => self.wisdom,
            StatKind::Luck => self.luck,
            other => other.default_value(),
        }
    }
}

impl Default for BaseStats {
    /// All attributes at 10 (average combatant).
    fn default() -> Self {
        let v = StatKind::DEFAULT_BASE_VALUE;
        Self::new(v, v, v, v, v, v)
    }
}
