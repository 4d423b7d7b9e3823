//! Experience and level progression.

use crate::config::CombatConfig;
use crate::state::Character;

const fn build_thresholds() -> [u64; CombatConfig::MAX_LEVEL as usize] {
    let mut thresholds = [0; CombatConfig::MAX_LEVEL as usize];
    let mut index = 0;
    while index < thresholds.len() {
        let level = (index + 1) as u64;
        thresholds[index] = 100 * level * level;
        index += 1;
    }
    thresholds
}

/// Experience required to advance from each level: `100 × level²`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExperienceTable;

impl ExperienceTable {
    const THRESHOLDS: [u64; CombatConfig::MAX_LEVEL as usize] = build_thresholds();

    /// Experience needed to leave `level`, or `None` at the level cap.
    pub fn to_next(level: u32) -> Option<u64> {
        if level == 0 || level >= CombatConfig::MAX_LEVEL {
            return None;
        }
        Self::THRESHOLDS.get(level as usize - 1).copied()
    }
}

/// One level gained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub level: u32,
    pub stat_points: u32,
    pub skill_points: u32,
}

/// Adds `amount` experience and applies every level-up it crosses.
///
/// Each level grants fixed stat and skill points and refills HP/mana, unless
/// the character is already defeated. At the level cap experience keeps
/// accruing without further level-ups.
pub fn add_experience(character: &mut Character, amount: u64) -> Vec<LevelUp> {
    character.experience = character.experience.saturating_add(amount);

    let mut level_ups = Vec::new();
    while let Some(required) = ExperienceTable::to_next(character.level) {
        if character.experience < required {
            break;
        }
        character.experience -= required;
        character.level += 1;
        character.stat_points += CombatConfig::STAT_POINTS_PER_LEVEL;
        character.skill_points += CombatConfig::SKILL_POINTS_PER_LEVEL;
        level_ups.push(LevelUp {
            level: character.level,
            stat_points: CombatConfig::STAT_POINTS_PER_LEVEL,
            skill_points: CombatConfig::SKILL_POINTS_PER_LEVEL,
        });
    }

    if !level_ups.is_empty() && !character.is_defeated() {
        character.refill();
    }
    level_ups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::warrior;

    #[test]
    fn table_grows_quadratically() {
        assert_eq!(ExperienceTable::to_next(1), Some(100));
        assert_eq!(ExperienceTable::to_next(2), Some(400));
        assert_eq!(ExperienceTable::to_next(31), Some(96_100));
        assert_eq!(ExperienceTable::to_next(CombatConfig::MAX_LEVEL), None);
    }

    #[test]
    fn below_threshold_only_accumulates() {
        let mut character = warrior();
        assert!(add_experience(&mut character, 99).is_empty());
        assert_eq!(character.level, 1);
        assert_eq!(character.experience, 99);
    }

    #[test]
    fn large_grant_applies_every_level_up_at_once() {
        let mut character = warrior();
        let level_ups = add_experience(&mut character, 999_999);

        assert_eq!(level_ups.len(), 30);
        assert_eq!(character.level, 31);
        assert_eq!(character.experience, 54_499);
        assert_eq!(character.stat_points, 150);
        assert_eq!(character.skill_points, 30);
        assert_eq!(level_ups.last().map(|up| up.level), Some(31));
    }

    #[test]
    fn level_up_refills_resources() {
        let mut character = warrior();
        character.set_hp(3, 118);
        character.set_mana(0, 21);

        add_experience(&mut character, 100);

        let stats = character.stats(&CombatConfig::default());
        assert_eq!(character.hp(stats.max_hp), stats.max_hp);
        assert_eq!(character.mana(stats.max_mana), stats.max_mana);
    }

    #[test]
    fn level_up_does_not_revive_a_defeated_character() {
        let mut character = warrior();
        character.set_hp(0, 118);

        assert_eq!(add_experience(&mut character, 100).len(), 1);
        let stats = character.stats(&CombatConfig::default());
        assert_eq!(character.hp_snapshot(stats.max_hp), 0);
        assert!(character.is_defeated());
    }

    #[test]
    fn level_cap_keeps_accruing_experience() {
        let mut character = warrior();
        character.level = CombatConfig::MAX_LEVEL;
        assert!(add_experience(&mut character, 5_000_000).is_empty());
        assert_eq!(character.level, CombatConfig::MAX_LEVEL);
        assert_eq!(character.experience, 5_000_000);
    }
}
