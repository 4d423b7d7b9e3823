//! Derived combat stats.
//!
//! Formulas (class coefficients from [`ClassProfile`]):
//! - attack      = primary × 2 + level + equip.attack
//! - defense     = base_defense + vitality / 2 + equip.defense
//! - max_hp      = base_hp + vitality × hp_per_vitality + level × hp_per_level + equip.max_hp
//! - max_mana    = base_mana + energy × mana_per_energy + level × mana_per_level + equip.max_mana
//! - crit_rate   = clamp(base_crit + dexterity × 0.002 + equip.crit_rate, 0, cap)
//! - crit_damage = max(1, crit_damage_base + equip.crit_damage)

use super::attributes::{Attributes, CharacterClass, ClassProfile};
use super::equipment::{EquipmentBonus, StatKey};
use crate::config::CombatConfig;

/// Effective stats used for one round. Never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub max_hp: u32,
    pub max_mana: u32,
}

impl CombatStats {
    pub fn compute(
        class: CharacterClass,
        level: u32,
        attributes: &Attributes,
        equipment: &EquipmentBonus,
        config: &CombatConfig,
    ) -> Self {
        let profile: ClassProfile = class.profile();

        let attack = attributes.get(profile.primary) * 2 + level + equipment.flat(StatKey::Attack);
        let defense =
            profile.base_defense + attributes.vitality / 2 + equipment.flat(StatKey::Defense);
        let max_hp = profile.base_hp
            + attributes.vitality * profile.hp_per_vitality
            + level * profile.hp_per_level
            + equipment.flat(StatKey::MaxHp);
        let max_mana = profile.base_mana
            + attributes.energy * profile.mana_per_energy
            + level * profile.mana_per_level
            + equipment.flat(StatKey::MaxMana);

        let crit_rate = (profile.base_crit_rate
            + attributes.dexterity as f64 * CombatConfig::CRIT_PER_DEXTERITY
            + equipment.get(StatKey::CritRate))
        .clamp(0.0, config.crit_rate_cap);
        let crit_damage = (config.crit_damage_base + equipment.get(StatKey::CritDamage)).max(1.0);

        Self {
            attack,
            defense,
            crit_rate,
            crit_damage,
            max_hp: max_hp.max(1),
            max_mana,
        }
    }
}
