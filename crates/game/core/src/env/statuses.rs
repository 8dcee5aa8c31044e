//! Status effect definitions.

use bitflags::bitflags;

use crate::combat::{DamageCategory, Element};
use crate::common::StatusId;
use crate::stats::StatModifierTemplate;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusCategory {
    /// Periodic ticks heal.
    Buff,
    /// Periodic ticks damage.
    Debuff,
}

bitflags! {
    /// Behaviour switches of a status definition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        /// The holder's turns are skipped.
        const PREVENTS_ACTION = 1 << 0;
        /// Periodic damage skips defense.
        const IGNORES_DEFENSE = 1 << 1;
    }
}

/// Damage or healing applied every tick interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicEffect {
    /// Amount per stack per tick; a fraction of max health if `is_percentage`.
    pub value_per_tick: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_percentage: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_category: DamageCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectDef {
    pub id: StatusId,
    pub name: String,
    pub category: StatusCategory,
    pub duration_ms: u64,
    /// Zero disables periodic ticking.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_interval_ms: u64,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_refresh"))]
    pub refresh_on_reapply: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: StatusFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Option<PeriodicEffect>,
    /// Installed once per stack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifierTemplate>,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_refresh() -> bool {
    true
}

impl StatusEffectDef {
    pub fn prevents_action(&self) -> bool {
        self.flags.contains(StatusFlags::PREVENTS_ACTION)
    }

    pub fn ignores_defense(&self) -> bool {
        self.flags.contains(StatusFlags::IGNORES_DEFENSE)
    }

    /// Stack cap, never below one.
    pub fn stack_cap(&self) -> u32 {
        if self.stackable {
            self.max_stacks.max(1)
        } else {
            1
        }
    }
}
