//! Turning round results into persisted rewards.
//!
//! The round processor only tallies what each kill is worth. This module
//! credits it: experience (with every level-up crossed), copper, and the
//! potion/equipment drops appended to the inventory. Nothing here fails;
//! persisting the character is the caller's job.

mod loot;
mod progression;

pub use loot::{LootDrop, drop_level, process_death_loot, roll_quality};
pub use progression::{ExperienceTable, LevelUp, add_experience};

use crate::combat::RoundOutcome;
use crate::env::{CombatEnv, RngOracle};
use crate::state::Character;

/// Everything a round paid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience_gained: u64,
    pub copper_gained: u64,
    pub loot: Vec<LootDrop>,
    pub level_ups: Vec<LevelUp>,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.experience_gained == 0
            && self.copper_gained == 0
            && self.loot.iter().all(|drop| drop.items.is_empty())
    }
}

/// Credits experience and copper from `outcome` and rolls death loot.
///
/// Loot levels use the character level after this round's level-ups.
pub fn distribute_rewards(
    character: &mut Character,
    outcome: &RoundOutcome,
    env: &CombatEnv<'_>,
    rng: &mut dyn RngOracle,
) -> Rewards {
    let level_ups = add_experience(character, outcome.experience_gained);
    character.copper = character.copper.saturating_add(outcome.copper_gained);
    let loot = process_death_loot(character, outcome, env, rng);

    Rewards {
        experience_gained: outcome.experience_gained,
        copper_gained: outcome.copper_gained,
        loot,
        level_ups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{RoundContext, resolve_round};
    use crate::config::CombatConfig;
    use crate::testing::{Catalog, ScriptedRng, goblin, warrior};

    #[test]
    fn copper_is_credited_once() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        let id = character.combat.allocate_monster_id();
        let mut monster = goblin().spawn(id, 5, 0);
        monster.hp = 1;
        character.monsters.push(monster);

        // gold roll of 14 (base 10 + range 5)
        let mut rng = ScriptedRng::quiet().with_ranges([14]);
        let outcome = resolve_round(&mut character, &RoundContext::default(), &env, &mut rng)
            .unwrap();
        assert_eq!(outcome.copper_gained, 14);

        let rewards = distribute_rewards(&mut character, &outcome, &env, &mut rng);
        assert_eq!(rewards.copper_gained, 14);
        assert_eq!(rewards.loot[0].copper, 14);
        assert_eq!(character.copper, 14);
        assert_eq!(character.experience, 50);
        assert!(rewards.level_ups.is_empty());
    }

    #[test]
    fn level_up_in_a_lost_round_keeps_hp_at_zero() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.experience = 99;
        character.set_hp(1, 118);
        for position in 0..2 {
            let id = character.combat.allocate_monster_id();
            character.monsters.push(goblin().spawn(id, 5, position));
        }
        character.monsters[0].hp = 1;

        let mut rng = ScriptedRng::quiet();
        let outcome = resolve_round(&mut character, &RoundContext::default(), &env, &mut rng)
            .unwrap();
        assert!(outcome.defeat);
        assert_eq!(outcome.character_hp, 0);

        let rewards = distribute_rewards(&mut character, &outcome, &env, &mut rng);
        assert_eq!(rewards.level_ups.len(), 1);
        assert_eq!(character.level, 2);
        let stats = character.stats(&config);
        assert_eq!(character.hp_snapshot(stats.max_hp), 0);
    }

    #[test]
    fn empty_outcome_pays_nothing() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();

        let rewards = distribute_rewards(
            &mut character,
            &RoundOutcome::default(),
            &env,
            &mut ScriptedRng::quiet(),
        );
        assert!(rewards.is_empty());
        assert_eq!(character.copper, 0);
        assert_eq!(character.experience, 0);
    }

    #[test]
    fn experience_crossing_threshold_reports_level_up() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        let outcome = RoundOutcome {
            experience_gained: 150,
            ..RoundOutcome::default()
        };

        let rewards = distribute_rewards(&mut character, &outcome, &env, &mut ScriptedRng::quiet());
        assert_eq!(rewards.level_ups.len(), 1);
        assert_eq!(character.level, 2);
        assert_eq!(character.experience, 50);
    }
}
