//! Common error infrastructure for atb-core.
//!
//! Domain-specific errors (`SkillBlock`, `ActionRejected`, `FormationError`)
//! live next to the operations they validate; this module provides the
//! shared severity classification and context they report through.
//!
//! Validation failures are values, never panics. Data-integrity problems
//! (an id with no definition) are logged and degrade to a no-op.

use crate::common::{CombatantId, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (timer not full yet)
/// - **Validation**: the request itself is invalid and should be changed
/// - **Internal**: the session state disagrees with itself
/// - **Fatal**: the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry later or pick another action.
    ///
    /// Examples: skill on cooldown, not enough SP
    Recoverable,

    /// Invalid input, do not retry unchanged.
    ///
    /// Examples: unknown skill, target outside range
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: formation references a combatant the roster lacks
    Internal,

    /// Session state corrupted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Combatant that triggered the error (if applicable).
    pub actor: Option<CombatantId>,

    /// Scheduler tick at the time of the error.
    pub tick: Tick,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            actor: None,
            tick,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: CombatantId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all atb-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
