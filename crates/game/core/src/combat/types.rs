//! Damage taxonomies shared by content definitions and the pipeline.

use strum::EnumCount;

/// Mitigation family of a hit.
///
/// Physical and Magic use their matching attack, defense and block stats.
/// True damage skips defense, block and category resistance.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageCategory {
    #[default]
    Physical,
    Magic,
    True,
}

impl DamageCategory {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Elemental affinity, independent of [`DamageCategory`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    None,
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
}

impl Element {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Weapon family, used for skill requirements and proficiency.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum WeaponCategory {
    /// Also the category of bare hands.
    #[default]
    Blunt,
    Sword,
    Axe,
    Spear,
    Dagger,
    Bow,
    Staff,
}

impl WeaponCategory {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Dense per-category table.
pub type CategoryTable = [f64; DamageCategory::COUNT];

/// Dense per-element table.
pub type ElementTable = [f64; Element::COUNT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_names_parse() {
        assert_eq!("true".parse::<DamageCategory>(), Ok(DamageCategory::True));
        assert_eq!("Lightning".parse::<Element>(), Ok(Element::Lightning));
        assert_eq!("dagger".parse::<WeaponCategory>(), Ok(WeaponCategory::Dagger));
    }

    #[test]
    fn indices_are_dense() {
        assert_eq!(DamageCategory::True.index(), DamageCategory::COUNT - 1);
        assert_eq!(Element::Dark.index(), Element::COUNT - 1);
    }
}
