//! Derived stat formulas.
//!
//! Each derived stat's *base* value is a pure function of the effective base
//! attributes (after their own modifiers) and the combatant's level. The
//! derived stat's own ledger is applied on top by the store.
//!
//! | Stat              | Formula                                          |
//! |-------------------|--------------------------------------------------|
//! | MaxHealth         | 100 + CON × 15 + (level − 1) × 10                |
//! | MaxPhysicalSp     | 5 + STR / 5                                      |
//! | MaxMagicSp        | 5 + WIS / 5                                      |
//! | PhysicalAttack    | STR × 2                                          |
//! | MagicAttack       | WIS × 2                                          |
//! | PhysicalDefense   | CON × 0.5                                        |
//! | MagicDefense      | WIS × 0.8                                        |
//! | Speed             | 50 + REA × 2                                     |
//! | CriticalRate      | 0.05 + PER × 0.003 + LUK × 0.002                 |
//! | CriticalDamage    | 1.5 + PER × 0.01                                 |
//! | Accuracy          | 0.9 + PER × 0.005                                |
//! | Evasion           | REA × 0.003 + LUK × 0.001                        |
//! | PhysicalBlockRate | CON × 0.002                                      |
//! | MagicBlockRate    | WIS × 0.0015                                     |

use super::kind::StatKind;

/// Health gained per level above 1.
pub const HEALTH_PER_LEVEL: f64 = 10.0;

/// Level contribution to maximum health.
pub fn level_scaling(level: u32) -> f64 {
    f64::from(level.saturating_sub(1)) * HEALTH_PER_LEVEL
}

/// Base value of a derived stat before its own ledger.
///
/// `attr` returns the effective value of a base attribute. Base attributes
/// passed as `stat` return their default; the store never asks for them.
pub fn derived_base(stat: StatKind, level: u32, attr: impl Fn(StatKind) -> f64) -> f64 {
    use StatKind::*;

    match stat {
        MaxHealth => 100.0 + attr(Constitution) * 15.0 + level_scaling(level),
        MaxPhysicalSp => 5.0 + attr(Strength) / 5.0,
        MaxMagicSp => 5.0 + attr(Wisdom) / 5.0,
        PhysicalAttack => attr(Strength) * 2.0,
        MagicAttack => attr(Wisdom) * 2.0,
        PhysicalDefense => attr(Constitution) * 0.5,
        MagicDefense => attr(Wisdom) * 0.8,
        Speed => 50.0 + attr(Reaction) * 2.0,
        CriticalRate => 0.05 + attr(Perception) * 0.003 + attr(Luck) * 0.002,
        CriticalDamage => 1.5 + attr(Perception) * 0.01,
        Accuracy => 0.9 + attr(Perception) * 0.005,
        Evasion => attr(Reaction) * 0.003 + attr(Luck) * 0.001,
        PhysicalBlockRate => attr(Constitution) * 0.002,
        MagicBlockRate => attr(Wisdom) * 0.0015,
        Constitution | Strength | Perception | Reaction | Wisdom | Luck => stat.default_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_ten(_: StatKind) -> f64 {
        10.0
    }

    #[test]
    fn average_combatant_values() {
        assert_eq!(derived_base(StatKind::MaxHealth, 1, all_ten), 250.0);
        assert_eq!(derived_base(StatKind::MaxPhysicalSp, 1, all_ten), 7.0);
        assert_eq!(derived_base(StatKind::Speed, 1, all_ten), 70.0);
        assert!((derived_base(StatKind::CriticalRate, 1, all_ten) - 0.1).abs() < 1e-12);
        assert!((derived_base(StatKind::Accuracy, 1, all_ten) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn health_scales_with_level() {
        assert_eq!(derived_base(StatKind::MaxHealth, 5, all_ten), 290.0);
        assert_eq!(level_scaling(0), 0.0);
    }
}
