//! Battlefield positions.
//!
//! Each side has five slots; slot 0 is the front line and slot 4 the back.
//! Range policies in [`targeting`] read these positions, and
//! [`Formation::shift_forward`] closes gaps when a front-liner is downed.

pub mod targeting;

pub use targeting::{RangePolicy, TargetType, valid_targets};

use crate::common::{CombatantId, Side};
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};

const SLOTS: usize = BattleConfig::FORMATION_SLOTS;

/// A slot on one side of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub side: Side,
    pub slot: usize,
}

impl Position {
    pub const fn new(side: Side, slot: usize) -> Self {
        Self { side, slot }
    }

    /// Same side: `|a − b|`. Opposite sides: `a + b + 1`.
    pub fn distance(self, other: Position) -> usize {
        if self.side == other.side {
            self.slot.abs_diff(other.slot)
        } else {
            self.slot + other.slot + 1
        }
    }
}

/// One combatant moved by [`Formation::shift_forward`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotMove {
    pub combatant: CombatantId,
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormationError {
    #[error("slot {slot} is outside the formation (0..{max})")]
    SlotOutOfRange { slot: usize, max: usize },
}

impl BattleError for FormationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "FORMATION_SLOT_OUT_OF_RANGE",
        }
    }
}

/// Two fixed five-slot arrays, one per side.
///
/// A combatant occupies at most one slot per side. The formation stores only
/// ids; liveness is supplied by the caller where it matters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formation {
    slots: [[Option<CombatantId>; SLOTS]; 2],
}

impl Formation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `id` at `slot` on `side`.
    ///
    /// If the slot is occupied and `id` already stands elsewhere on that
    /// side, the two swap. If `id` had no slot there, the occupant is
    /// displaced and returned.
    pub fn set_position(
        &mut self,
        id: CombatantId,
        side: Side,
        slot: usize,
    ) -> Result<Option<CombatantId>, FormationError> {
        if slot >= SLOTS {
            return Err(FormationError::SlotOutOfRange { slot, max: SLOTS });
        }

        let row = &mut self.slots[side.index()];
        let previous = row.iter().position(|s| *s == Some(id));
        let occupant = row[slot].filter(|o| *o != id);

        match previous {
            Some(from) => {
                row[from] = occupant;
                row[slot] = Some(id);
                Ok(None)
            }
            None => {
                row[slot] = Some(id);
                Ok(occupant)
            }
        }
    }

    /// Finds the combatant on either side.
    pub fn position_of(&self, id: CombatantId) -> Option<Position> {
        Side::BOTH.into_iter().find_map(|side| {
            self.slots[side.index()]
                .iter()
                .position(|s| *s == Some(id))
                .map(|slot| Position::new(side, slot))
        })
    }

    pub fn get_at(&self, side: Side, slot: usize) -> Option<CombatantId> {
        self.slots[side.index()].get(slot).copied().flatten()
    }

    /// Clears every slot holding `id`. Returns true if it was placed.
    pub fn remove_from_formation(&mut self, id: CombatantId) -> bool {
        let mut removed = false;
        for row in &mut self.slots {
            for slot in row.iter_mut().filter(|s| **s == Some(id)) {
                *slot = None;
                removed = true;
            }
        }
        removed
    }

    /// Occupants of one side, front to back, with their slot index.
    pub fn occupants(&self, side: Side) -> impl Iterator<Item = (usize, CombatantId)> + '_ {
        self.slots[side.index()]
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.map(|id| (slot, id)))
    }

    /// Distance between two placed combatants.
    pub fn distance(&self, a: CombatantId, b: CombatantId) -> Option<usize> {
        Some(self.position_of(a)?.distance(self.position_of(b)?))
    }

    /// Moves live combatants forward into empty or downed slots.
    ///
    /// Scans front to back; the first slot that is empty or holds a downed
    /// combatant swaps with the nearest later live occupant. Live combatants
    /// only move forward and keep their relative order; downed ones drift
    /// to the back.
    pub fn shift_forward(
        &mut self,
        side: Side,
        is_live: impl Fn(CombatantId) -> bool,
    ) -> Vec<SlotMove> {
        let row = &mut self.slots[side.index()];
        let mut moves = Vec::new();

        for front in 0..SLOTS {
            if row[front].is_some_and(&is_live) {
                continue;
            }
            let Some(back) = (front + 1..SLOTS).find(|&j| row[j].is_some_and(&is_live)) else {
                break;
            };
            row.swap(front, back);

            if let Some(id) = row[front] {
                moves.push(SlotMove {
                    combatant: id,
                    from: back,
                    to: front,
                });
            }
            if let Some(id) = row[back] {
                moves.push(SlotMove {
                    combatant: id,
                    from: front,
                    to: back,
                });
            }
        }

        if !moves.is_empty() {
            tracing::debug!(side = %side, moved = moves.len(), "formation shifted forward");
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> CombatantId {
        CombatantId(n)
    }

    #[test]
    fn distance_rules() {
        let a = Position::new(Side::Ally, 1);
        assert_eq!(a.distance(Position::new(Side::Ally, 4)), 3);
        assert_eq!(a.distance(Position::new(Side::Enemy, 0)), 2);
        assert_eq!(
            Position::new(Side::Ally, 0).distance(Position::new(Side::Enemy, 0)),
            1
        );
    }

    #[test]
    fn set_position_swaps_within_a_side() {
        let mut f = Formation::new();
        f.set_position(id(1), Side::Ally, 0).unwrap();
        f.set_position(id(2), Side::Ally, 3).unwrap();

        assert_eq!(f.set_position(id(2), Side::Ally, 0), Ok(None));
        assert_eq!(f.get_at(Side::Ally, 0), Some(id(2)));
        assert_eq!(f.get_at(Side::Ally, 3), Some(id(1)));
    }

    #[test]
    fn set_position_displaces_newcomers() {
        let mut f = Formation::new();
        f.set_position(id(1), Side::Enemy, 2).unwrap();
        assert_eq!(f.set_position(id(9), Side::Enemy, 2), Ok(Some(id(1))));
        assert_eq!(f.position_of(id(1)), None);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut f = Formation::new();
        let err = f.set_position(id(1), Side::Ally, 5).unwrap_err();
        assert_eq!(err.error_code(), "FORMATION_SLOT_OUT_OF_RANGE");
    }

    #[test]
    fn shift_moves_downed_front_liner_back() {
        let mut f = Formation::new();
        for (slot, n) in [(0, 1), (1, 2), (2, 3)] {
            f.set_position(id(n), Side::Enemy, slot).unwrap();
        }
        let moves = f.shift_forward(Side::Enemy, |c| c != id(1));

        assert_eq!(f.get_at(Side::Enemy, 0), Some(id(2)));
        assert_eq!(f.get_at(Side::Enemy, 1), Some(id(3)));
        assert_eq!(f.get_at(Side::Enemy, 2), Some(id(1)));
        assert!(moves.contains(&SlotMove {
            combatant: id(2),
            from: 1,
            to: 0
        }));
    }

    #[test]
    fn shift_fills_empty_slots() {
        let mut f = Formation::new();
        f.set_position(id(5), Side::Ally, 4).unwrap();
        f.shift_forward(Side::Ally, |_| true);
        assert_eq!(f.position_of(id(5)), Some(Position::new(Side::Ally, 0)));
    }

    #[test]
    fn remove_clears_slot() {
        let mut f = Formation::new();
        f.set_position(id(1), Side::Ally, 2).unwrap();
        assert!(f.remove_from_formation(id(1)));
        assert!(!f.remove_from_formation(id(1)));
        assert_eq!(f.get_at(Side::Ally, 2), None);
    }

    proptest! {
        #[test]
        fn shift_preserves_occupants_and_only_advances_the_living(
            layout in prop::collection::vec(prop::option::of(any::<bool>()), SLOTS),
        ) {
            let mut f = Formation::new();
            let mut live = Vec::new();
            for (slot, cell) in layout.iter().enumerate() {
                if let Some(alive) = cell {
                    let c = id(slot as u32 + 1);
                    f.set_position(c, Side::Ally, slot).unwrap();
                    if *alive {
                        live.push(c);
                    }
                }
            }
            let before: Vec<_> = f.occupants(Side::Ally).collect();

            f.shift_forward(Side::Ally, |c| live.contains(&c));
            let after: Vec<_> = f.occupants(Side::Ally).collect();

            // Same set of combatants, no duplicates.
            let mut ids_before: Vec<_> = before.iter().map(|(_, c)| *c).collect();
            let mut ids_after: Vec<_> = after.iter().map(|(_, c)| *c).collect();
            ids_before.sort();
            ids_after.sort();
            prop_assert_eq!(&ids_before, &ids_after);
            ids_after.dedup();
            prop_assert_eq!(ids_after.len(), ids_before.len());

            for (slot, c) in &after {
                let old = before.iter().find(|(_, b)| b == c).map(|(s, _)| *s).unwrap();
                if live.contains(c) {
                    prop_assert!(*slot <= old);
                }
            }

            // Live combatants are packed at the front.
            for (slot, c) in &after {
                if live.contains(c) {
                    prop_assert!(*slot < live.len());
                }
            }
        }
    }
}
