//! Deterministic randomness for combat rolls.
//!
//! Every roll in a battle is derived from `(battle seed, nonce, actor, roll
//! kind)` through [`compute_seed`]; there is no hidden generator state, so a
//! seed reproduces a whole battle.

use crate::common::CombatantId;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same values given the same seed.
pub trait RngOracle {
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    fn index(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32(seed) as usize % len
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the roll coordinates into a single seed.
///
/// Distinct `context` values give independent rolls within one action.
pub fn compute_seed(battle_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// What a roll decides. Used as the `context` coordinate of the seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum RollKind {
    Hit = 0,
    Block = 1,
    Crit = 2,
    Variance = 3,
    StatusChance = 4,
    TargetSelect = 5,
    Escape = 6,
}

/// Supplies unit-interval rolls to the damage pipeline and the session.
pub trait RollSource {
    /// Uniform value in `[0, 1)` for one roll.
    fn roll(&mut self, kind: RollKind) -> f64;

    /// Uniform index in `[0, len)`.
    fn pick(&mut self, kind: RollKind, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.roll(kind) * len as f64) as usize;
        idx.min(len - 1)
    }
}

/// Production roll source bound to one action.
///
/// A draw counter is folded into the context so repeated rolls of the same
/// kind (one per target of an area skill) stay independent.
#[derive(Clone, Debug)]
pub struct SeededRolls<R: RngOracle = PcgRng> {
    rng: R,
    battle_seed: u64,
    nonce: u64,
    actor: u32,
    draws: u32,
}

impl SeededRolls<PcgRng> {
    pub fn new(battle_seed: u64, nonce: u64, actor: Option<CombatantId>) -> Self {
        Self::with_oracle(PcgRng, battle_seed, nonce, actor)
    }
}

impl<R: RngOracle> SeededRolls<R> {
    pub fn with_oracle(rng: R, battle_seed: u64, nonce: u64, actor: Option<CombatantId>) -> Self {
        Self {
            rng,
            battle_seed,
            nonce,
            actor: actor.map_or(u32::MAX, |id| id.0),
            draws: 0,
        }
    }

    /// Number of rolls taken so far.
    pub fn draws(&self) -> u32 {
        self.draws
    }
}

impl<R: RngOracle> RollSource for SeededRolls<R> {
    fn roll(&mut self, kind: RollKind) -> f64 {
        let context = (self.draws << 4) | kind as u32;
        self.draws = self.draws.wrapping_add(1);
        let seed = compute_seed(self.battle_seed, self.nonce, self.actor, context);
        self.rng.unit(seed)
    }
}

/// Roll source that always returns the same value.
///
/// `ConstantRolls(0.0)` makes every chance succeed; `ConstantRolls(0.999)`
/// makes every chance below 1 fail. Variance is `min + roll × (max − min)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantRolls(pub f64);

impl RollSource for ConstantRolls {
    fn roll(&mut self, _kind: RollKind) -> f64 {
        self.0
    }
}

/// Roll source that answers per kind, falling back to a default.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedRolls {
    default: f64,
    overrides: Vec<(RollKind, f64)>,
}

impl ScriptedRolls {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            overrides: Vec::new(),
        }
    }

    pub fn with(mut self, kind: RollKind, value: f64) -> Self {
        self.overrides.retain(|(k, _)| *k != kind);
        self.overrides.push((kind, value));
        self
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self, kind: RollKind) -> f64 {
        self.overrides
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(self.default, |(_, v)| *v)
    }
}
