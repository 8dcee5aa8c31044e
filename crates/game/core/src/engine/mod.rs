//! The battle session: ATB scheduler and combat state machine.
//!
//! A [`BattleSession`] owns every combatant and the formation for one
//! fight. It borrows a read-only [`ContentRegistry`] and is driven entirely
//! by [`BattleSession::tick`]; nothing advances between calls. Player input
//! enters through [`BattleSession::submit_action`], AI input through the
//! reaction countdown, and everything observable leaves through
//! [`BattleSession::drain_events`].

mod actions;
mod ai;
mod effects;
mod events;
mod state;
mod turns;

pub use actions::{ActionRejected, BattleAction};
pub use events::{BattleEvent, DamageSource, SkipReason};
pub use state::BattleState;

use std::collections::BTreeMap;

use crate::combatant::Combatant;
use crate::common::{CombatantId, Controller, Side, Tick};
use crate::config::BattleConfig;
use crate::env::{BattleRoster, CombatantTemplate, ContentRegistry};
use crate::error::{BattleError, ErrorSeverity};
use crate::formation::{self, Formation, FormationError, RangePolicy, TargetType};

/// Errors raised while assembling a session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("session is {0:?}; combatants can only be added before it starts")]
    AlreadyStarted(BattleState),

    #[error("slot {slot} on the {side} side is taken")]
    SlotTaken { side: Side, slot: usize },

    #[error("the {0} side has no free slot")]
    SideFull(Side),

    #[error("the {0} side has no combatants")]
    EmptySide(Side),

    #[error(transparent)]
    Formation(#[from] FormationError),
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyStarted(_) => ErrorSeverity::Recoverable,
            Self::SlotTaken { .. } | Self::SideFull(_) | Self::EmptySide(_) => {
                ErrorSeverity::Validation
            }
            Self::Formation(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted(_) => "SETUP_ALREADY_STARTED",
            Self::SlotTaken { .. } => "SETUP_SLOT_TAKEN",
            Self::SideFull(_) => "SETUP_SIDE_FULL",
            Self::EmptySide(_) => "SETUP_EMPTY_SIDE",
            Self::Formation(e) => e.error_code(),
        }
    }
}

/// One battle, from setup to outcome.
pub struct BattleSession<'a> {
    registry: &'a ContentRegistry,
    config: BattleConfig,

    combatants: BTreeMap<CombatantId, Combatant>,
    formation: Formation,
    next_id: u32,

    state: BattleState,
    tick: Tick,
    clock_ms: u64,

    seed: u64,
    /// Incremented once per executed action; part of every roll seed.
    nonce: u64,

    pending: Option<BattleAction>,
    ai_countdown_ms: u64,

    events: Vec<BattleEvent>,
}

impl<'a> BattleSession<'a> {
    pub fn new(registry: &'a ContentRegistry, config: BattleConfig, seed: u64) -> Self {
        Self {
            registry,
            config,
            combatants: BTreeMap::new(),
            formation: Formation::new(),
            next_id: 1,
            state: BattleState::Idle,
            tick: Tick::ZERO,
            clock_ms: 0,
            seed,
            nonce: 0,
            pending: None,
            ai_countdown_ms: 0,
            events: Vec::new(),
        }
    }

    /// Builds a session with every roster entry placed.
    pub fn from_roster(
        registry: &'a ContentRegistry,
        config: BattleConfig,
        seed: u64,
        roster: &BattleRoster,
    ) -> Result<Self, SetupError> {
        let mut session = Self::new(registry, config, seed);
        for template in &roster.allies {
            session.add_combatant(Side::Ally, template)?;
        }
        for template in &roster.enemies {
            session.add_combatant(Side::Enemy, template)?;
        }
        Ok(session)
    }

    // ===== setup =====

    /// Creates a combatant from `template` and places it.
    ///
    /// The template's slot is used when given; otherwise the first free slot
    /// from the front.
    pub fn add_combatant(
        &mut self,
        side: Side,
        template: &CombatantTemplate,
    ) -> Result<CombatantId, SetupError> {
        match self.state {
            BattleState::Idle => self.set_state(BattleState::Preparing),
            BattleState::Preparing => {}
            other => return Err(SetupError::AlreadyStarted(other)),
        }

        let slot = match template.slot {
            Some(slot) => {
                if self.formation.get_at(side, slot).is_some() {
                    return Err(SetupError::SlotTaken { side, slot });
                }
                slot
            }
            None => (0..BattleConfig::FORMATION_SLOTS)
                .find(|&slot| self.formation.get_at(side, slot).is_none())
                .ok_or(SetupError::SideFull(side))?,
        };

        let id = CombatantId(self.next_id);
        self.formation.set_position(id, side, slot)?;
        self.next_id += 1;

        let combatant = Combatant::from_template(id, side, template, self.registry, &self.config);
        tracing::debug!(
            combatant = %id,
            name = combatant.name(),
            side = %side,
            slot,
            "combatant placed"
        );
        self.combatants.insert(id, combatant);
        Ok(id)
    }

    /// Leaves setup and starts the clock.
    pub fn start(&mut self) -> Result<(), SetupError> {
        if !matches!(self.state, BattleState::Idle | BattleState::Preparing) {
            return Err(SetupError::AlreadyStarted(self.state));
        }
        for side in Side::BOTH {
            if self.members(side).next().is_none() {
                return Err(SetupError::EmptySide(side));
            }
        }

        for combatant in self.combatants.values_mut() {
            combatant.refresh_cache(self.tick);
        }
        tracing::info!(
            seed = self.seed,
            combatants = self.combatants.len(),
            tick_ms = self.config.tick_ms,
            "battle started"
        );
        self.set_state(BattleState::Running);
        self.check_outcome();
        Ok(())
    }

    // ===== driving =====

    /// Advances the session by one tick and returns the resulting state.
    ///
    /// - `Running`: timers and statuses advance, then the next ready
    ///   combatant (if any) takes the turn.
    /// - `ActionSelect`: a queued action executes; otherwise only the AI
    ///   reaction countdown moves.
    /// - Any other state: nothing happens.
    pub fn tick(&mut self) -> BattleState {
        match self.state {
            BattleState::Running => self.run_tick(),
            BattleState::ActionSelect { actor } => self.select_tick(actor),
            _ => {}
        }
        self.state
    }

    /// Ticks until the battle ends, `max_ticks` pass, or a player-controlled
    /// combatant is waiting for input.
    pub fn run(&mut self, max_ticks: u64) -> BattleState {
        for _ in 0..max_ticks {
            if self.state.is_finished() || self.awaiting_player().is_some() {
                break;
            }
            self.tick();
        }
        self.state
    }

    /// The player-controlled combatant whose turn is waiting for input.
    pub fn awaiting_player(&self) -> Option<CombatantId> {
        let BattleState::ActionSelect { actor } = self.state else {
            return None;
        };
        let combatant = self.combatants.get(&actor)?;
        (combatant.controller() == Controller::Player && self.pending.is_none())
            .then_some(actor)
    }

    // ===== queries =====

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Simulated milliseconds elapsed while `Running`.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn registry(&self) -> &'a ContentRegistry {
        self.registry
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Direct access for scripted setups and persistence.
    ///
    /// Changes made here are not checked for victory until the next
    /// health-affecting event.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    /// Everyone on `side`, downed or not.
    pub fn members(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.values().filter(move |c| c.side() == side)
    }

    pub fn live_count(&self, side: Side) -> usize {
        self.members(side).filter(|c| c.is_alive()).count()
    }

    pub fn pending_action(&self) -> Option<&BattleAction> {
        self.pending.as_ref()
    }

    /// Live combatants by timer, fullest first. Ties follow turn order.
    pub fn atb_order(&self) -> Vec<CombatantId> {
        let mut live: Vec<&Combatant> = self.combatants.values().filter(|c| c.is_alive()).collect();
        live.sort_by(|a, b| {
            b.timer()
                .total_cmp(&a.timer())
                .then_with(|| self.turn_key(a.id()).cmp(&self.turn_key(b.id())))
        });
        live.into_iter().map(Combatant::id).collect()
    }

    /// Targets `actor` may pick for `target_type`, at any range.
    pub fn valid_targets(&self, actor: CombatantId, target_type: TargetType) -> Vec<CombatantId> {
        self.targets_in_range(actor, target_type, &RangePolicy::All)
    }

    /// Removes and returns every queued event.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    // ===== internals shared by the submodules =====

    fn targets_in_range(
        &self,
        actor: CombatantId,
        target_type: TargetType,
        range: &RangePolicy,
    ) -> Vec<CombatantId> {
        formation::valid_targets(
            &self.formation,
            actor,
            target_type,
            range,
            self.config.front_line_depth,
            |id| self.is_downed(id),
        )
    }

    /// Unknown ids count as downed.
    fn is_downed(&self, id: CombatantId) -> bool {
        self.combatants.get(&id).is_none_or(Combatant::is_downed)
    }

    /// Turn-order key: front slots first, allies before enemies, then id.
    fn turn_key(&self, id: CombatantId) -> (usize, usize, CombatantId) {
        let (slot, side) = self
            .formation
            .position_of(id)
            .map_or((usize::MAX, usize::MAX), |p| (p.slot, p.side.index()));
        (slot, side, id)
    }

    fn set_state(&mut self, to: BattleState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        if to.is_finished() {
            tracing::info!(from = ?from, to = ?to, tick = %self.tick, "battle ended");
        } else {
            tracing::debug!(from = ?from, to = ?to, "battle state changed");
        }
        self.events.push(BattleEvent::StateChanged { from, to });
    }

    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Ends the battle if a side is wiped. Returns true if it is over.
    fn check_outcome(&mut self) -> bool {
        if self.state.is_finished() {
            return true;
        }
        let allies_down = self.live_count(Side::Ally) == 0;
        let enemies_down = self.live_count(Side::Enemy) == 0;
        match BattleState::for_wiped(allies_down, enemies_down) {
            Some(end) => {
                self.pending = None;
                self.set_state(end);
                true
            }
            None => false,
        }
    }
}
