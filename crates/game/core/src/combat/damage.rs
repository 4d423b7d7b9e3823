//! Damage calculation and application.

use crate::config::CombatConfig;

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// damage = max(MIN_DAMAGE, attack_value - defense)
/// ```
///
/// The floor guarantees every landed hit moves the fight forward, no matter
/// how far defense outscales attack.
pub fn calculate_damage(attack_value: u32, defense: u32) -> u32 {
    attack_value
        .saturating_sub(defense)
        .max(CombatConfig::MIN_DAMAGE)
}

/// Scale damage by the crit factor. Never lowers the damage.
pub fn apply_critical(damage: u32, crit_damage: f64) -> u32 {
    ((damage as f64 * crit_damage).round() as u32).max(damage)
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}
