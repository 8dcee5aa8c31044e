use crate::combat::WeaponCategory;
use crate::common::{ResourceKind, SkillId};
use crate::error::{BattleError, ErrorSeverity};

/// Why a skill cannot be used right now.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillBlock {
    #[error("requires one of {required:?}, wielding {equipped}")]
    WrongWeapon {
        required: Vec<WeaponCategory>,
        equipped: WeaponCategory,
    },

    #[error("requires proficiency {required}, have {have}")]
    InsufficientProficiency { required: u32, have: u32 },

    #[error("requires {required} {resource}, have {have}")]
    InsufficientResource {
        resource: ResourceKind,
        required: u32,
        have: u32,
    },

    #[error("requires {required} timer, have {have}")]
    InsufficientTimer { required: f64, have: f64 },

    #[error("on cooldown for {remaining} more turns")]
    OnCooldown { remaining: u32 },

    #[error("no valid target in range")]
    NoValidTarget,

    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    #[error("{0} has not been learned")]
    NotLearned(SkillId),

    #[error("caster is downed")]
    Downed,
}

impl BattleError for SkillBlock {
    fn severity(&self) -> ErrorSeverity {
        use SkillBlock::*;
        match self {
            InsufficientResource { .. } | InsufficientTimer { .. } | OnCooldown { .. } => {
                ErrorSeverity::Recoverable
            }
            NoValidTarget | Downed => ErrorSeverity::Recoverable,
            WrongWeapon { .. } | InsufficientProficiency { .. } => ErrorSeverity::Validation,
            UnknownSkill(_) | NotLearned(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use SkillBlock::*;
        match self {
            WrongWeapon { .. } => "SKILL_WRONG_WEAPON",
            InsufficientProficiency { .. } => "SKILL_INSUFFICIENT_PROFICIENCY",
            InsufficientResource { .. } => "SKILL_INSUFFICIENT_RESOURCE",
            InsufficientTimer { .. } => "SKILL_INSUFFICIENT_TIMER",
            OnCooldown { .. } => "SKILL_ON_COOLDOWN",
            NoValidTarget => "SKILL_NO_VALID_TARGET",
            UnknownSkill(_) => "SKILL_UNKNOWN",
            NotLearned(_) => "SKILL_NOT_LEARNED",
            Downed => "SKILL_CASTER_DOWNED",
        }
    }
}
