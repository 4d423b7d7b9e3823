//! Items received as loot.

use strum::{Display, EnumIter, EnumString};

use super::monster::ItemType;

/// Equipment quality tier, ordered from worst to best.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Quality {
    Common,
    Magic,
    Rare,
    Legendary,
    Mythic,
}

impl Quality {
    /// Minimum weighted roll for each tier above common, best first.
    pub const THRESHOLDS: [(f64, Quality); 4] = [
        (99.0, Quality::Mythic),
        (95.0, Quality::Legendary),
        (85.0, Quality::Rare),
        (60.0, Quality::Magic),
    ];

    /// Maps a weighted roll (`uniform(1,100) × type multiplier`) to a tier.
    pub fn from_roll(weighted_roll: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| weighted_roll >= *threshold)
            .map(|(_, quality)| *quality)
            .unwrap_or(Quality::Common)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PotionKind {
    Health,
    Mana,
}

/// An item stored in the character's bag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootItem {
    Potion {
        kind: PotionKind,
        level: u32,
    },
    Equipment {
        item_type: ItemType,
        quality: Quality,
        level: u32,
    },
}

impl LootItem {
    pub const fn level(&self) -> u32 {
        match self {
            Self::Potion { level, .. } | Self::Equipment { level, .. } => *level,
        }
    }
}
