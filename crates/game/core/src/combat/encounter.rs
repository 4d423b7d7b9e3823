//! Encounter rolling.

use crate::env::{CombatEnv, RngOracle};
use crate::error::CombatError;
use crate::state::{Character, MonsterTemplate};

/// Replace the character's monster list with a fresh pack for its map.
///
/// Pack size is `uniform(min_pack, max_pack) + difficulty.pack_bonus()`,
/// clamped to `1..=max_pack_size`. Each monster picks an active template
/// uniformly from the map's pool and a level of
/// `uniform(min_level, max_level) + difficulty.level_bonus()`.
///
/// Only the monster list changes; skill cooldowns and the round counter carry
/// over so an auto-combat session keeps its pacing across packs.
pub fn roll_encounter<'c>(
    character: &'c mut Character,
    env: &CombatEnv<'_>,
    rng: &mut dyn RngOracle,
) -> Result<&'c [crate::state::MonsterInstance], CombatError> {
    let map = env
        .maps
        .map(character.map_id)
        .ok_or(CombatError::UnknownMap {
            map: character.map_id,
        })?;

    let mut pool: Vec<&MonsterTemplate> = Vec::with_capacity(map.monster_pool.len());
    for &template_id in &map.monster_pool {
        let template = env
            .monsters
            .template(template_id)
            .ok_or(CombatError::UnknownTemplate {
                template: template_id,
            })?;
        if template.active {
            pool.push(template);
        }
    }
    if pool.is_empty() {
        return Err(CombatError::EmptyEncounterTable { map: map.id });
    }

    let difficulty = character.difficulty;
    let base_pack = rng.range(map.min_pack as u64, map.max_pack as u64) as u32;
    let pack_size = (base_pack + difficulty.pack_bonus()).clamp(1, env.config.max_pack_size.max(1));

    let mut monsters = Vec::with_capacity(pack_size as usize);
    for position in 0..pack_size {
        let template = pool[rng.pick_index(pool.len())];
        let level = rng.range(map.min_level as u64, map.max_level as u64) as u32
            + difficulty.level_bonus();
        let id = character.combat.allocate_monster_id();
        monsters.push(template.spawn(id, level, position));
    }

    character.monsters = monsters;
    Ok(&character.monsters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::state::{Difficulty, MapId};
    use crate::testing::{Catalog, warrior};
    use crate::env::LiveRng;

    #[test]
    fn rolls_pack_within_map_bounds() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        let mut rng = LiveRng::seeded(11);

        for _ in 0..50 {
            let monsters = roll_encounter(&mut character, &env, &mut rng).unwrap();
            assert!((1..=3).contains(&monsters.len()));
            for (position, monster) in monsters.iter().enumerate() {
                assert_eq!(monster.position, position as u32);
                assert!((1..=3).contains(&monster.level));
                assert_eq!(monster.hp, monster.max_hp);
            }
        }
    }

    #[test]
    fn difficulty_adds_levels_and_monsters() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.difficulty = Difficulty::new(9).unwrap();
        let mut rng = LiveRng::seeded(5);

        let monsters = roll_encounter(&mut character, &env, &mut rng).unwrap();
        // 1..=3 base + 3 bonus, capped at 5
        assert!((4..=5).contains(&monsters.len()));
        assert!(monsters.iter().all(|m| (10..=12).contains(&m.level)));
    }

    #[test]
    fn monster_ids_are_unique_across_encounters() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        let mut rng = LiveRng::seeded(3);

        let first: Vec<_> = roll_encounter(&mut character, &env, &mut rng)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        let second: Vec<_> = roll_encounter(&mut character, &env, &mut rng)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[test]
    fn unknown_map_is_rejected() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.map_id = MapId(404);

        let err = roll_encounter(&mut character, &env, &mut LiveRng::seeded(1)).unwrap_err();
        assert_eq!(err, CombatError::UnknownMap { map: MapId(404) });
    }

    #[test]
    fn inactive_templates_are_never_rolled() {
        let mut catalog = Catalog::standard();
        for template in catalog.templates.values_mut() {
            template.active = false;
        }
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();

        let err = roll_encounter(&mut character, &env, &mut LiveRng::seeded(1)).unwrap_err();
        assert!(matches!(err, CombatError::EmptyEncounterTable { .. }));
    }
}
