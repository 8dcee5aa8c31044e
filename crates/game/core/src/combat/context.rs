//! Damage requests.

use super::cache::CombatAttributeCache;
use super::types::{DamageCategory, Element};

/// The attacking side of a damage request.
#[derive(Clone, Copy, Debug)]
pub struct Attacker<'a> {
    pub cache: &'a CombatAttributeCache,
    pub level: u32,
}

impl<'a> Attacker<'a> {
    pub fn new(cache: &'a CombatAttributeCache, level: u32) -> Self {
        Self { cache, level }
    }
}

/// Immutable input to [`resolve`](super::resolve).
///
/// Without an attacker (a status tick with no living source) the request
/// always hits, attacker level counts as 1 and every attacker-driven stage
/// contributes nothing.
#[derive(Clone, Copy, Debug)]
pub struct DamageContext<'a> {
    pub attacker: Option<Attacker<'a>>,
    pub defender: &'a CombatAttributeCache,
    pub category: DamageCategory,
    pub element: Element,
    pub skill_multiplier: f64,
    /// Fraction of the defender's defense ignored, `[0, 1]`.
    pub armor_penetration: f64,
    /// Replaces weapon damage and skips the attacker-driven stages.
    pub fixed_damage: Option<f64>,
    pub guaranteed_hit: bool,
    pub variance: bool,
    pub can_crit: bool,
    pub can_block: bool,
    pub ignore_defense: bool,
    pub bypass_elemental_resistance: bool,
}

impl<'a> DamageContext<'a> {
    /// A plain weapon swing: the attacker's weapon category and element,
    /// every roll enabled.
    pub fn weapon_attack(attacker: Attacker<'a>, defender: &'a CombatAttributeCache) -> Self {
        let weapon = attacker.cache.weapon();
        Self {
            attacker: Some(attacker),
            defender,
            category: weapon.damage_category,
            element: weapon.element,
            skill_multiplier: 1.0,
            armor_penetration: 0.0,
            fixed_damage: None,
            guaranteed_hit: false,
            variance: true,
            can_crit: true,
            can_block: true,
            ignore_defense: false,
            bypass_elemental_resistance: false,
        }
    }

    /// A periodic status tick: fixed amount, guaranteed hit, no variance,
    /// no crit, no block.
    pub fn periodic(
        defender: &'a CombatAttributeCache,
        category: DamageCategory,
        element: Element,
        amount: f64,
    ) -> Self {
        Self {
            attacker: None,
            defender,
            category,
            element,
            skill_multiplier: 1.0,
            armor_penetration: 0.0,
            fixed_damage: Some(amount),
            guaranteed_hit: true,
            variance: false,
            can_crit: false,
            can_block: false,
            ignore_defense: false,
            bypass_elemental_resistance: false,
        }
    }

    pub fn with_attacker(mut self, attacker: Option<Attacker<'a>>) -> Self {
        self.attacker = attacker;
        self
    }

    pub fn with_category(mut self, category: DamageCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_skill_multiplier(mut self, multiplier: f64) -> Self {
        self.skill_multiplier = multiplier;
        self
    }

    pub fn with_armor_penetration(mut self, penetration: f64) -> Self {
        self.armor_penetration = penetration;
        self
    }

    pub fn with_fixed_damage(mut self, amount: f64) -> Self {
        self.fixed_damage = Some(amount);
        self
    }

    pub fn with_guaranteed_hit(mut self, guaranteed: bool) -> Self {
        self.guaranteed_hit = guaranteed;
        self
    }

    pub fn with_variance(mut self, variance: bool) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_can_crit(mut self, can_crit: bool) -> Self {
        self.can_crit = can_crit;
        self
    }

    pub fn with_can_block(mut self, can_block: bool) -> Self {
        self.can_block = can_block;
        self
    }

    pub fn with_ignore_defense(mut self, ignore: bool) -> Self {
        self.ignore_defense = ignore;
        self
    }

    pub fn with_bypass_elemental_resistance(mut self, bypass: bool) -> Self {
        self.bypass_elemental_resistance = bypass;
        self
    }

    pub fn attacker_level(&self) -> u32 {
        self.attacker.map_or(1, |a| a.level.max(1))
    }
}
