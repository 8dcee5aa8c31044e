//! Resolved damage outcome.

/// Everything [`resolve`](super::resolve) decided, stage by stage.
///
/// Multipliers that a stage skipped are reported as their neutral value
/// (1 for factors, 0 for ratios and bonuses).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub is_miss: bool,
    pub is_blocked: bool,
    pub is_crit: bool,

    pub hit_chance: f64,
    pub block_chance: f64,
    pub crit_chance: f64,

    pub base_damage: f64,
    pub attack_bonus: f64,
    pub type_multiplier: f64,
    pub elemental_bonus: f64,
    pub crit_multiplier: f64,
    pub defense_ratio: f64,
    pub category_resistance: f64,
    pub elemental_resistance: f64,
    pub block_multiplier: f64,
    pub skill_multiplier: f64,
    pub variance: f64,

    /// Value before rounding and the floor of one.
    pub raw_damage: f64,
    /// Zero on a miss, at least one otherwise.
    pub final_damage: u32,
}

impl DamageResult {
    pub(crate) fn miss(hit_chance: f64) -> Self {
        Self {
            is_miss: true,
            hit_chance,
            ..Self::neutral()
        }
    }

    pub(crate) fn neutral() -> Self {
        Self {
            is_miss: false,
            is_blocked: false,
            is_crit: false,
            hit_chance: 1.0,
            block_chance: 0.0,
            crit_chance: 0.0,
            base_damage: 0.0,
            attack_bonus: 0.0,
            type_multiplier: 1.0,
            elemental_bonus: 0.0,
            crit_multiplier: 1.0,
            defense_ratio: 0.0,
            category_resistance: 0.0,
            elemental_resistance: 0.0,
            block_multiplier: 1.0,
            skill_multiplier: 1.0,
            variance: 1.0,
            raw_damage: 0.0,
            final_damage: 0,
        }
    }

    pub fn is_hit(&self) -> bool {
        !self.is_miss
    }
}
