//! Notifications queued by the session for UI, AI and logging consumers.

use crate::common::{CombatantId, ItemId, ResourceKind, Side, SkillId, StatusId, Tick};
use crate::formation::SlotMove;

use super::state::BattleState;
use super::BattleAction;

/// Why a turn was skipped instead of granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// A status with `PREVENTS_ACTION` is active.
    ActionPrevented,
}

/// Where a damage event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    Attack,
    Skill(SkillId),
    Status(StatusId),
}

/// One thing that happened in a session, in order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    StateChanged {
        from: BattleState,
        to: BattleState,
    },
    TurnStarted {
        actor: CombatantId,
        tick: Tick,
    },
    TurnSkipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    ActionExecuted {
        actor: CombatantId,
        action: BattleAction,
    },
    TurnEnded {
        actor: CombatantId,
    },
    Missed {
        source: Option<CombatantId>,
        target: CombatantId,
    },
    DamageDealt {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: u32,
        is_crit: bool,
        is_blocked: bool,
        cause: DamageSource,
    },
    Healed {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: u32,
    },
    Revived {
        target: CombatantId,
        health: u32,
    },
    ResourceRestored {
        target: CombatantId,
        resource: ResourceKind,
        amount: u32,
    },
    StatusApplied {
        target: CombatantId,
        status: StatusId,
        stacks: u32,
    },
    StatusRemoved {
        target: CombatantId,
        status: StatusId,
    },
    StatusTicked {
        target: CombatantId,
        status: StatusId,
    },
    StressChanged {
        target: CombatantId,
        stress: u32,
    },
    ItemUsed {
        actor: CombatantId,
        item: ItemId,
    },
    Downed {
        target: CombatantId,
    },
    FormationShifted {
        side: Side,
        moves: Vec<SlotMove>,
    },
    EscapeAttempted {
        actor: CombatantId,
        chance: f64,
        success: bool,
    },
}
