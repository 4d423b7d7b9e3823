//! Skill definitions and oracle interface.
use crate::state::SkillId;

/// Static definition of an active combat skill.
///
/// Skill attack value is `round(attack × damage_multiplier) + flat_damage`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub mana_cost: u32,
    pub damage_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat_damage: u32,
    /// Rounds before the skill can be used again; 0 allows reuse in the same round.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Maximum uses per engagement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_uses: Option<u32>,
}

impl SkillDefinition {
    pub fn attack_value(&self, attack: u32) -> u32 {
        (attack as f64 * self.damage_multiplier).round() as u32 + self.flat_damage
    }
}

/// Oracle providing skill definitions by id.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition>;
}
