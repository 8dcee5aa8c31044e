//! Runtime scalars of a combatant.
//!
//! Maximums are NOT stored: health and SP caps come from the attribute
//! store, stress and fatigue caps from [`BattleConfig`], the timer cap from
//! the session's threshold. Current values are state and are always kept
//! inside `[0, max]` by the owning [`Combatant`](super::Combatant).

use crate::config::BattleConfig;

/// Current values of every mutable pool.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    pub health: u32,
    pub physical_sp: u32,
    pub magic_sp: u32,
    pub stress: u32,
    pub fatigue: u32,
    /// Action timer, `[0, threshold]`.
    pub timer: f64,
}

impl Resources {
    pub const fn full(health: u32, physical_sp: u32, magic_sp: u32) -> Self {
        Self {
            health,
            physical_sp,
            magic_sp,
            stress: 0,
            fatigue: 0,
            timer: 0.0,
        }
    }

    pub(crate) fn clamp_stress(value: u32) -> u32 {
        value.min(BattleConfig::MAX_STRESS)
    }

    pub(crate) fn clamp_fatigue(value: u32) -> u32 {
        value.min(BattleConfig::MAX_FATIGUE)
    }

    pub(crate) fn clamp_timer(value: f64, max: f64) -> f64 {
        if value.is_finite() {
            value.clamp(0.0, max.max(0.0))
        } else {
            0.0
        }
    }
}

/// Converts a stat value to an integer pool cap.
pub(crate) fn pool_max(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64).floor() as u32
    } else {
        0
    }
}
