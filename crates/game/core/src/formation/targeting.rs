//! Target side selection and range policies.

use crate::common::{CombatantId, Side};

use super::{Formation, Position};

/// Which side a skill or item aims at, and how many it hits.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    #[default]
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    SelfOnly,
    /// A downed ally (revival).
    DownedAlly,
}

impl TargetType {
    /// Side the targets stand on, relative to the caster.
    pub const fn target_side(self, caster: Side) -> Side {
        match self {
            Self::SingleEnemy | Self::AllEnemies => caster.opposite(),
            Self::SingleAlly | Self::AllAllies | Self::SelfOnly | Self::DownedAlly => caster,
        }
    }

    /// True if every valid target is affected at once.
    pub const fn is_area(self) -> bool {
        matches!(self, Self::AllEnemies | Self::AllAllies)
    }

    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::AllEnemies)
    }
}

/// Which slots a skill can reach from the caster's slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangePolicy {
    /// Only the listed target slots.
    Fixed { slots: Vec<usize> },
    /// `target_slot − caster_slot` must be listed.
    Relative { offsets: Vec<i32> },
    /// Formation distance within `[min, max]`.
    Distance { min: usize, max: usize },
    /// Formation distance of exactly one.
    Adjacent,
    #[default]
    All,
    SelfOnly,
    /// The first `front_line_depth` slots of the target side.
    FrontLine,
}

impl RangePolicy {
    pub fn allows(&self, caster: Position, target: Position, front_line_depth: usize) -> bool {
        match self {
            Self::Fixed { slots } => slots.contains(&target.slot),
            Self::Relative { offsets } => {
                let offset = target.slot as i32 - caster.slot as i32;
                offsets.contains(&offset)
            }
            Self::Distance { min, max } => (*min..=*max).contains(&caster.distance(target)),
            Self::Adjacent => caster.distance(target) == 1,
            Self::All => true,
            Self::SelfOnly => caster == target,
            Self::FrontLine => target.slot < front_line_depth,
        }
    }
}

/// Combatants `caster` may target with `target_type` under `range`.
///
/// `is_downed` reports liveness; downed combatants are only valid for
/// [`TargetType::DownedAlly`], which in turn accepts nothing else. Results
/// are ordered front to back.
pub fn valid_targets(
    formation: &Formation,
    caster: CombatantId,
    target_type: TargetType,
    range: &RangePolicy,
    front_line_depth: usize,
    is_downed: impl Fn(CombatantId) -> bool,
) -> Vec<CombatantId> {
    let Some(origin) = formation.position_of(caster) else {
        tracing::warn!(caster = %caster, "targeting from a combatant with no slot");
        return Vec::new();
    };

    if target_type == TargetType::SelfOnly {
        return if is_downed(caster) {
            Vec::new()
        } else {
            vec![caster]
        };
    }

    let side = target_type.target_side(origin.side);
    let want_downed = target_type == TargetType::DownedAlly;

    formation
        .occupants(side)
        .filter(|(_, id)| is_downed(*id) == want_downed)
        .filter(|(slot, _)| range.allows(origin, Position::new(side, *slot), front_line_depth))
        .map(|(_, id)| id)
        .collect()
}
