//! Error infrastructure for combat-core.
//!
//! Every fallible core operation returns [`CombatError`]. Callers use
//! [`CombatError::severity`] to decide between rejecting a request, ending an
//! auto-combat session quietly, or escalating.

use thiserror::Error;

use crate::state::{CharacterId, MapId, MonsterId, SkillId, TemplateId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: invalid input or invalid operation for the current combat state
/// - **NotFound**: a referenced character, template or monster no longer exists
/// - **Internal**: content or state inconsistencies that indicate a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    NotFound,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Errors raised by round resolution, encounter rolling and rewards.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("skill {skill} does not exist")]
    UnknownSkill { skill: SkillId },

    #[error("character {character} has not learned skill {skill}")]
    SkillNotLearned {
        character: CharacterId,
        skill: SkillId,
    },

    #[error("character {character} has no HP left")]
    CharacterDefeated { character: CharacterId },

    #[error("difficulty tier {tier} is out of range 0..={max}")]
    InvalidDifficulty { tier: u8, max: u8 },

    #[error("map {map} does not exist")]
    UnknownMap { map: MapId },

    #[error("map {map} has no active monster templates")]
    EmptyEncounterTable { map: MapId },

    #[error("monster template {template} does not exist")]
    UnknownTemplate { template: TemplateId },

    #[error("monster {monster} is not part of the current encounter")]
    StaleMonster { monster: MonsterId },
}

impl CombatError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownSkill { .. }
            | Self::SkillNotLearned { .. }
            | Self::CharacterDefeated { .. }
            | Self::InvalidDifficulty { .. } => ErrorSeverity::Validation,
            Self::UnknownMap { .. } | Self::UnknownTemplate { .. } | Self::StaleMonster { .. } => {
                ErrorSeverity::NotFound
            }
            Self::EmptyEncounterTable { .. } => ErrorSeverity::Internal,
        }
    }
}
