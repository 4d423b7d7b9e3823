//! Base attributes and class profiles.
//!
//! Attributes are the only persisted stats. Everything a round needs is
//! derived from them, the class profile, the level and equipment
//! (see [`super::CombatStats`]).

use strum::{Display, EnumIter, EnumString};

/// The four base attributes of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub strength: u32,
    pub dexterity: u32,
    pub vitality: u32,
    pub energy: u32,
}

impl Attributes {
    pub const fn new(strength: u32, dexterity: u32, vitality: u32, energy: u32) -> Self {
        Self {
            strength,
            dexterity,
            vitality,
            energy,
        }
    }

    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Vitality => self.vitality,
            Attribute::Energy => self.energy,
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(10, 10, 10, 10)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    Strength,
    Dexterity,
    Vitality,
    Energy,
}

/// Playable classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CharacterClass {
    #[default]
    Warrior,
    Mage,
    Ranger,
}

impl CharacterClass {
    pub const fn profile(self) -> ClassProfile {
        match self {
            Self::Warrior => ClassProfile::WARRIOR,
            Self::Mage => ClassProfile::MAGE,
            Self::Ranger => ClassProfile::RANGER,
        }
    }
}

/// Class-base coefficients for the derived stat formulas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassProfile {
    /// Attribute that drives attack power.
    pub primary: Attribute,
    pub base_hp: u32,
    pub hp_per_vitality: u32,
    pub hp_per_level: u32,
    pub base_mana: u32,
    pub mana_per_energy: u32,
    pub mana_per_level: u32,
    pub base_defense: u32,
    pub base_crit_rate: f64,
}

impl ClassProfile {
    pub const WARRIOR: Self = Self {
        primary: Attribute::Strength,
        base_hp: 60,
        hp_per_vitality: 5,
        hp_per_level: 8,
        base_mana: 10,
        mana_per_energy: 1,
        mana_per_level: 1,
        base_defense: 5,
        base_crit_rate: 0.05,
    };

    pub const MAGE: Self = Self {
        primary: Attribute::Energy,
        base_hp: 40,
        hp_per_vitality: 3,
        hp_per_level: 4,
        base_mana: 30,
        mana_per_energy: 3,
        mana_per_level: 3,
        base_defense: 2,
        base_crit_rate: 0.05,
    };

    pub const RANGER: Self = Self {
        primary: Attribute::Dexterity,
        base_hp: 50,
        hp_per_vitality: 4,
        hp_per_level: 6,
        base_mana: 20,
        mana_per_energy: 2,
        mana_per_level: 2,
        base_defense: 3,
        base_crit_rate: 0.08,
    };
}
