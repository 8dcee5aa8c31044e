//! Status effect engine.
//!
//! Instances live on their holder and advance in simulated milliseconds,
//! independent of the ATB timer. Each instance carries the stat modifiers it
//! installed so removal reverses exactly what was applied. Periodic ticks
//! are returned to the session, which routes them through the damage
//! pipeline (debuffs) or the heal path (buffs).

mod effects;

pub use effects::{PeriodicTick, StatusAdvance, StatusApplication, StatusEffects, StatusInstance};
pub use crate::env::{PeriodicEffect, StatusCategory, StatusEffectDef, StatusFlags};
