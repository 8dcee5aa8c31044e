//! Combat resolution.
//!
//! - [`CombatAttributeCache`]: per-tick view of a combatant's combat numbers
//! - [`DamageContext`] → [`resolve`] → [`DamageResult`]: the damage pipeline
//!
//! Everything here is side-effect free; the session applies results.

pub mod cache;
pub mod context;
pub mod damage;
pub mod hit;
pub mod result;
pub mod types;

pub use cache::{CombatAttributeCache, MAX_RESISTANCE, MIN_RESISTANCE, TemporaryBuff, WeaponProfile};
pub use context::{Attacker, DamageContext};
pub use damage::resolve;
pub use hit::{block_chance, crit_chance, defense_ratio, hit_chance};
pub use result::DamageResult;
pub use types::{CategoryTable, DamageCategory, Element, ElementTable, WeaponCategory};
