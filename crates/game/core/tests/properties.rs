// Property tests for round resolution, loot quality and progression.
use std::collections::BTreeMap;

use combat_core::{
    Attributes, Character, CharacterClass, CharacterId, CombatConfig, CombatEnv, DropTable,
    ExperienceTable, ItemType, LiveRng, MapDefinition, MapId, MapOracle, MonsterOracle,
    MonsterTemplate, MonsterType, Quality, RoundContext, SkillDefinition, SkillId, SkillOracle,
    TemplateId, add_experience, resolve_round,
};
use proptest::prelude::*;

struct Tables {
    templates: BTreeMap<TemplateId, MonsterTemplate>,
    skills: BTreeMap<SkillId, SkillDefinition>,
    maps: BTreeMap<MapId, MapDefinition>,
}

impl MonsterOracle for Tables {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.templates.get(&id)
    }
}

impl SkillOracle for Tables {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}

impl MapOracle for Tables {
    fn map(&self, id: MapId) -> Option<&MapDefinition> {
        self.maps.get(&id)
    }
}

fn template(monster_type: MonsterType) -> MonsterTemplate {
    MonsterTemplate {
        id: TemplateId(1),
        name: "Skeleton".into(),
        monster_type,
        level: 5,
        base_hp: 80,
        hp_per_level: 9,
        base_attack: 18,
        attack_per_level: 2,
        base_defense: 8,
        defense_per_level: 1,
        base_experience: 40,
        experience_per_level: 4,
        drops: DropTable {
            gold_base: 3,
            gold_range: 7,
            potion_chance: 0.25,
            item_chance: 0.1,
            item_types: vec![ItemType::Helmet],
        },
        active: true,
    }
}

fn tables(monster_type: MonsterType) -> Tables {
    let skill = SkillDefinition {
        id: SkillId(1),
        name: "Cleave".into(),
        mana_cost: 6,
        damage_multiplier: 1.2,
        flat_damage: 4,
        cooldown: 1,
        max_uses: None,
    };
    let template = template(monster_type);
    Tables {
        templates: [(template.id, template)].into_iter().collect(),
        skills: [(skill.id, skill)].into_iter().collect(),
        maps: BTreeMap::new(),
    }
}

fn monster_type() -> impl Strategy<Value = MonsterType> {
    prop_oneof![
        Just(MonsterType::Normal),
        Just(MonsterType::Elite),
        Just(MonsterType::Boss),
    ]
}

fn engaged_character(
    attributes: (u32, u32, u32, u32),
    level: u32,
    monster_levels: &[u32],
    template: &MonsterTemplate,
) -> Character {
    let mut character = Character::new(CharacterId(9), "Prop", CharacterClass::Ranger);
    character.level = level;
    character.attributes = Attributes::new(attributes.0, attributes.1, attributes.2, attributes.3);
    character.learned_skills = vec![SkillId(1)];
    for (position, monster_level) in monster_levels.iter().enumerate() {
        let id = character.combat.allocate_monster_id();
        character
            .monsters
            .push(template.spawn(id, *monster_level, position as u32));
    }
    character
}

proptest! {
    #[test]
    fn hp_stays_within_bounds(
        attributes in (1u32..60, 1u32..60, 1u32..60, 1u32..60),
        level in 1u32..40,
        monster_levels in prop::collection::vec(1u32..30, 1..5),
        kind in monster_type(),
        use_skill in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let tables = tables(kind);
        let config = CombatConfig::default();
        let env = CombatEnv::new(&tables, &tables, &tables, &config);
        let template = template(kind);
        let mut character = engaged_character(attributes, level, &monster_levels, &template);
        let skills = if use_skill { vec![SkillId(1)] } else { Vec::new() };
        let mut rng = LiveRng::seeded(seed);

        for _ in 0..5 {
            let Ok(outcome) = resolve_round(
                &mut character,
                &RoundContext::with_skills(&skills),
                &env,
                &mut rng,
            ) else {
                break;
            };
            prop_assert!(outcome.character_hp <= outcome.character_max_hp);
            prop_assert!(outcome.character_mana <= outcome.character_max_mana);
            for monster in &outcome.monsters {
                prop_assert!(monster.hp <= monster.max_hp);
                prop_assert!(monster.hp > 0);
            }
            if outcome.defeat {
                prop_assert_eq!(outcome.character_hp, 0);
                break;
            }
        }
    }

    #[test]
    fn every_landed_hit_deals_damage(
        attributes in (1u32..60, 1u32..60, 1u32..60, 1u32..60),
        level in 1u32..40,
        monster_levels in prop::collection::vec(1u32..30, 1..5),
        seed in any::<u64>(),
    ) {
        let tables = tables(MonsterType::Normal);
        let config = CombatConfig::default();
        let env = CombatEnv::new(&tables, &tables, &tables, &config);
        let template = template(MonsterType::Normal);
        let mut character = engaged_character(attributes, level, &monster_levels, &template);

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut LiveRng::seeded(seed),
        )
        .unwrap();

        prop_assert!(outcome.damage_dealt >= 1);
        prop_assert!(outcome.log.character_actions.iter().all(|a| a.damage >= 1));
        prop_assert!(outcome.log.monster_actions.iter().all(|a| a.damage >= 1));
        if outcome.has_alive_monster {
            prop_assert!(outcome.damage_taken >= 1);
        }
    }

    #[test]
    fn kills_account_for_every_removed_monster(
        attributes in (1u32..80, 1u32..60, 1u32..60, 1u32..80),
        level in 1u32..60,
        monster_levels in prop::collection::vec(1u32..12, 1..5),
        kind in monster_type(),
        seed in any::<u64>(),
    ) {
        let tables = tables(kind);
        let config = CombatConfig::default();
        let env = CombatEnv::new(&tables, &tables, &tables, &config);
        let template = template(kind);
        let mut character = engaged_character(attributes, level, &monster_levels, &template);
        let before = character.monsters.len();

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut LiveRng::seeded(seed),
        )
        .unwrap();

        prop_assert_eq!(before - character.monsters.len(), outcome.kills.len());
        prop_assert_eq!(outcome.log.kill_count as usize, outcome.kills.len());
        prop_assert_eq!(
            outcome.experience_gained,
            outcome.kills.iter().map(|k| k.experience).sum::<u64>()
        );
        prop_assert_eq!(
            outcome.copper_gained,
            outcome.kills.iter().map(|k| k.copper).sum::<u64>()
        );
        for kill in &outcome.kills {
            prop_assert!((3..=10).contains(&kill.copper));
        }
        prop_assert_eq!(outcome.has_alive_monster, !character.monsters.is_empty());
    }

    #[test]
    fn quality_is_monotonic_in_roll(
        low in 1u32..=100,
        high in 1u32..=100,
        kind in monster_type(),
    ) {
        let (low, high) = (low.min(high), low.max(high));
        let multiplier = kind.multiplier();
        prop_assert!(
            Quality::from_roll(low as f64 * multiplier) <= Quality::from_roll(high as f64 * multiplier)
        );
    }

    #[test]
    fn experience_never_rests_above_threshold(amount in 0u64..50_000_000) {
        let mut character = Character::new(CharacterId(1), "Prop", CharacterClass::Mage);
        let level_ups = add_experience(&mut character, amount);

        prop_assert_eq!(character.level, 1 + level_ups.len() as u32);
        if let Some(required) = ExperienceTable::to_next(character.level) {
            prop_assert!(character.experience < required);
        }
        prop_assert_eq!(
            character.stat_points,
            level_ups.iter().map(|up| up.stat_points).sum::<u32>()
        );
    }
}
