use std::fmt;

use crate::error::CombatError;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Persistent identifier of a player character.
    CharacterId(u64),
    "character"
);
id_type!(
    /// Identifier of a live monster instance, unique within one character's encounters.
    MonsterId(u64),
    "monster"
);
id_type!(
    /// Identifier of a skill definition.
    SkillId(u32),
    "skill"
);
id_type!(
    /// Identifier of a monster template in the catalog.
    TemplateId(u32),
    "template"
);
id_type!(
    /// Identifier of a map and its encounter table.
    MapId(u32),
    "map"
);

/// Player-selected difficulty tier.
///
/// Bounded to `0..=Difficulty::MAX`; every constructor enforces the bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MAX: u8 = 9;
    pub const NORMAL: Self = Self(0);

    pub fn new(tier: u8) -> Result<Self, CombatError> {
        if tier > Self::MAX {
            return Err(CombatError::InvalidDifficulty {
                tier,
                max: Self::MAX,
            });
        }
        Ok(Self(tier))
    }

    /// Builds a tier, saturating at [`Difficulty::MAX`].
    pub fn saturating(tier: u8) -> Self {
        Self(tier.min(Self::MAX))
    }

    pub const fn tier(self) -> u8 {
        self.0
    }

    /// Levels added to every rolled monster.
    pub const fn level_bonus(self) -> u32 {
        self.0 as u32
    }

    /// Extra monsters added to every rolled pack.
    pub const fn pack_bonus(self) -> u32 {
        (self.0 / 3) as u32
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = CombatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.0)
    }
}
