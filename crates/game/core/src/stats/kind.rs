//! Stat tags and their static dependency graph.

use bitflags::bitflags;

/// Every stat tracked by an [`AttributeStore`](super::AttributeStore).
///
/// The first six variants are base attributes; the rest are derived combat
/// stats whose base value is a formula over the (effective) base attributes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum StatKind {
    // ========================================================================
    // Base attributes
    // ========================================================================
    Constitution,
    Strength,
    Perception,
    Reaction,
    Wisdom,
    Luck,

    // ========================================================================
    // Derived combat stats
    // ========================================================================
    MaxHealth,
    MaxPhysicalSp,
    MaxMagicSp,
    PhysicalAttack,
    MagicAttack,
    PhysicalDefense,
    MagicDefense,
    Speed,
    CriticalRate,
    CriticalDamage,
    Accuracy,
    Evasion,
    PhysicalBlockRate,
    MagicBlockRate,
}

impl StatKind {
    /// The six base attributes, in storage order.
    pub const BASE: [StatKind; 6] = [
        StatKind::Constitution,
        StatKind::Strength,
        StatKind::Perception,
        StatKind::Reaction,
        StatKind::Wisdom,
        StatKind::Luck,
    ];

    /// Value a base attribute takes when nothing else is known.
    pub const DEFAULT_BASE_VALUE: f64 = 10.0;

    /// Dense index for per-stat tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the six base attributes.
    #[inline]
    pub const fn is_base(self) -> bool {
        (self as u8) < 6
    }

    /// Default value used when a stat has no data (10 for base, 0 for derived).
    pub const fn default_value(self) -> f64 {
        if self.is_base() {
            Self::DEFAULT_BASE_VALUE
        } else {
            0.0
        }
    }

    /// Stats that are floored at zero after modifiers.
    ///
    /// Pools, attacks, defenses, speed and the crit multiplier have no
    /// meaning below zero. Base attributes and rates keep negative totals;
    /// the combat formulas clamp rates where they are used.
    pub const fn is_non_negative(self) -> bool {
        use StatKind::*;
        matches!(
            self,
            MaxHealth
                | MaxPhysicalSp
                | MaxMagicSp
                | PhysicalAttack
                | MagicAttack
                | PhysicalDefense
                | MagicDefense
                | Speed
                | CriticalDamage
        )
    }

    /// Single-bit mask for this stat.
    #[inline]
    pub const fn mask(self) -> StatMask {
        StatMask::from_bits_retain(1 << (self as u32))
    }

    /// Derived stats whose formula reads this stat.
    pub const fn dependents(self) -> &'static [StatKind] {
        use StatKind::*;
        match self {
            Constitution => &[MaxHealth, PhysicalDefense, PhysicalBlockRate],
            Strength => &[MaxPhysicalSp, PhysicalAttack],
            Perception => &[CriticalRate, CriticalDamage, Accuracy],
            Reaction => &[Speed, Evasion],
            Wisdom => &[MaxMagicSp, MagicAttack, MagicDefense, MagicBlockRate],
            Luck => &[CriticalRate, Evasion],
            _ => &[],
        }
    }

    /// This stat plus everything that must be recomputed when it changes.
    pub fn invalidation_mask(self) -> StatMask {
        self.dependents()
            .iter()
            .fold(self.mask(), |mask, dep| mask | dep.mask())
    }
}

bitflags! {
    /// Set of stats, one bit per [`StatKind`].
    ///
    /// Used as the dirty set of the attribute store.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StatMask: u32 {
        const CONSTITUTION        = 1 << 0;
        const STRENGTH            = 1 << 1;
        const PERCEPTION          = 1 << 2;
        const REACTION            = 1 << 3;
        const WISDOM              = 1 << 4;
        const LUCK                = 1 << 5;
        const MAX_HEALTH          = 1 << 6;
        const MAX_PHYSICAL_SP     = 1 << 7;
        const MAX_MAGIC_SP        = 1 << 8;
        const PHYSICAL_ATTACK     = 1 << 9;
        const MAGIC_ATTACK        = 1 << 10;
        const PHYSICAL_DEFENSE    = 1 << 11;
        const MAGIC_DEFENSE       = 1 << 12;
        const SPEED               = 1 << 13;
        const CRITICAL_RATE       = 1 << 14;
        const CRITICAL_DAMAGE     = 1 << 15;
        const ACCURACY            = 1 << 16;
        const EVASION             = 1 << 17;
        const PHYSICAL_BLOCK_RATE = 1 << 18;
        const MAGIC_BLOCK_RATE    = 1 << 19;
    }
}
