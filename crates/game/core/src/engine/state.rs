use crate::common::{CombatantId, Side};

/// Phase of a battle session.
///
/// ```text
/// Idle → Preparing → Running ⇄ ActionSelect → Executing → Running
///                       └──────────────→ Victory | Defeat | Escaped
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleState {
    #[default]
    Idle,
    /// Combatants are being placed; nothing advances.
    Preparing,
    /// Timers and statuses advance.
    Running,
    /// `actor` holds the turn; time is frozen until an action is queued.
    ActionSelect { actor: CombatantId },
    /// `actor`'s action is being resolved.
    Executing { actor: CombatantId },
    Victory,
    Defeat,
    Escaped,
}

impl BattleState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Escaped)
    }

    /// The combatant holding the turn, if any.
    pub fn actor(self) -> Option<CombatantId> {
        match self {
            Self::ActionSelect { actor } | Self::Executing { actor } => Some(actor),
            _ => None,
        }
    }

    /// Terminal state for a wiped side.
    pub(crate) fn for_wiped(allies_down: bool, enemies_down: bool) -> Option<Self> {
        match (allies_down, enemies_down) {
            (_, true) => Some(Self::Victory),
            (true, false) => Some(Self::Defeat),
            (false, false) => None,
        }
    }

    /// Terminal state when `side` escapes.
    pub(crate) fn escaped_by(side: Side) -> Self {
        match side {
            Side::Ally => Self::Escaped,
            // An enemy fleeing ends the fight in the allies' favour.
            Side::Enemy => Self::Victory,
        }
    }
}
