//! Equipment contribution to combat stats.
//!
//! An equipped item carries base stats, rolled affixes and socketed gems.
//! All three are flattened into one [`EquipmentBonus`] keyed by [`StatKey`].

use std::collections::BTreeMap;

use strum::{Display, EnumString};

use crate::state::ItemType;

/// Stat keys an item modifier can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKey {
    Attack,
    Defense,
    /// Fractional crit chance (0.05 = +5%).
    CritRate,
    /// Added to the crit damage factor (0.25 = +25%).
    CritDamage,
    MaxHp,
    MaxMana,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub key: StatKey,
    pub value: f64,
}

impl StatModifier {
    pub const fn new(key: StatKey, value: f64) -> Self {
        Self { key, value }
    }
}

/// An item in an equipment slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub item_type: Option<ItemType>,
    pub base: Vec<StatModifier>,
    pub affixes: Vec<StatModifier>,
    pub gems: Vec<StatModifier>,
}

impl EquippedItem {
    pub fn modifiers(&self) -> impl Iterator<Item = &StatModifier> {
        self.base.iter().chain(&self.affixes).chain(&self.gems)
    }
}

/// Equipment stats summed per key across every equipped slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquipmentBonus {
    totals: BTreeMap<StatKey, f64>,
}

impl EquipmentBonus {
    pub fn aggregate<'a>(items: impl IntoIterator<Item = &'a EquippedItem>) -> Self {
        let mut totals = BTreeMap::new();
        for modifier in items.into_iter().flat_map(EquippedItem::modifiers) {
            *totals.entry(modifier.key).or_insert(0.0) += modifier.value;
        }
        Self { totals }
    }

    pub fn get(&self, key: StatKey) -> f64 {
        self.totals.get(&key).copied().unwrap_or(0.0)
    }

    /// Integer view of a flat stat; negative totals contribute nothing.
    pub fn flat(&self, key: StatKey) -> u32 {
        self.get(key).max(0.0).round() as u32
    }
}
