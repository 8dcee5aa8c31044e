/// Battle configuration constants and tunable parameters.
///
/// Runtime-tunable values live in fields (loadable from `config.toml`);
/// capacities used as type parameters are associated constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Simulated milliseconds per scheduler tick.
    pub tick_ms: u64,

    /// Timer units gained per point of speed per simulated second.
    ///
    /// At the default 0.5 a speed-70 combatant fills its timer in ~2.9 s.
    pub atb_rate: f64,

    /// Timer value that grants a turn.
    pub timer_threshold: f64,

    /// Fraction of the threshold the timer resets to after Defend.
    pub defend_timer_fraction: f64,

    /// Percent bonus to both defenses while defending.
    pub defend_defense_bonus: f64,

    /// Fatigue added at the end of each completed turn.
    pub fatigue_per_turn: u32,

    pub stress_threshold: u32,
    pub stress_timer_penalty: f64,
    pub fatigue_threshold: u32,
    pub fatigue_timer_penalty: f64,

    /// Stress gained when taking a critical hit.
    pub stress_on_crit_taken: u32,
    /// Stress gained by each live ally when a combatant is downed.
    pub stress_on_ally_downed: u32,

    /// Simulated delay before an AI combatant commits its action.
    pub ai_reaction_delay_ms: u64,

    /// Skill cost reduction per proficiency level (0.05 = 5%).
    pub proficiency_discount_per_level: f64,
    pub max_proficiency_discount: f64,

    /// Number of slots (from the front) that count as the front line.
    pub front_line_depth: usize,

    pub escape: EscapeParams,
    pub pipeline: PipelineParams,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const FORMATION_SLOTS: usize = 5;
    pub const MAX_ACCESSORIES: usize = 3;
    pub const MAX_STATUS_EFFECTS: usize = 16;
    pub const MAX_STRESS: u32 = 100;
    pub const MAX_FATIGUE: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_MS: u64 = 50;
    pub const DEFAULT_ATB_RATE: f64 = 0.5;
    pub const DEFAULT_TIMER_THRESHOLD: f64 = 100.0;
    pub const DEFAULT_AI_REACTION_DELAY_MS: u64 = 500;

    pub fn new() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            atb_rate: Self::DEFAULT_ATB_RATE,
            timer_threshold: Self::DEFAULT_TIMER_THRESHOLD,
            defend_timer_fraction: 0.5,
            defend_defense_bonus: 0.5,
            fatigue_per_turn: 2,
            stress_threshold: 80,
            stress_timer_penalty: 0.8,
            fatigue_threshold: 80,
            fatigue_timer_penalty: 0.9,
            stress_on_crit_taken: 10,
            stress_on_ally_downed: 15,
            ai_reaction_delay_ms: Self::DEFAULT_AI_REACTION_DELAY_MS,
            proficiency_discount_per_level: 0.05,
            max_proficiency_discount: 0.5,
            front_line_depth: 2,
            escape: EscapeParams::default(),
            pipeline: PipelineParams::default(),
        }
    }

    /// Seconds simulated by one tick.
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }

    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn with_ai_reaction_delay_ms(mut self, delay: u64) -> Self {
        self.ai_reaction_delay_ms = delay;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape chance parameters.
///
/// `chance = clamp(base + (avg_speed_mine − avg_speed_theirs) × per_speed, min, max)`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscapeParams {
    pub base: f64,
    pub per_speed: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for EscapeParams {
    fn default() -> Self {
        Self {
            base: 0.3,
            per_speed: 0.01,
            min: 0.1,
            max: 0.9,
        }
    }
}

/// Balance constants of the damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineParams {
    /// Added to `accuracy − evasion` before clamping.
    pub hit_offset: f64,
    /// Floor applied to the defender's evasion.
    pub min_evasion: f64,
    pub min_hit_chance: f64,
    pub max_hit_chance: f64,
    pub max_block_chance: f64,
    pub max_crit_chance: f64,
    /// Constant term of the defense denominator.
    pub defense_constant: f64,
    /// Attacker-level term of the defense denominator.
    pub defense_per_level: f64,
    pub max_defense_reduction: f64,
    /// Damage removed by a successful block.
    pub block_reduction: f64,
    pub variance_min: f64,
    pub variance_max: f64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            hit_offset: 0.9,
            min_evasion: 0.01,
            min_hit_chance: 0.05,
            max_hit_chance: 0.99,
            max_block_chance: 0.75,
            max_crit_chance: 0.9,
            defense_constant: 100.0,
            defense_per_level: 5.0,
            max_defense_reduction: 0.8,
            block_reduction: 0.5,
            variance_min: 0.95,
            variance_max: 1.05,
        }
    }
}
