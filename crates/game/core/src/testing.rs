//! Fixtures shared by unit tests.

use std::collections::{BTreeMap, VecDeque};

use crate::config::CombatConfig;
use crate::env::{
    CombatEnv, MapDefinition, MapOracle, MonsterOracle, RngOracle, SkillDefinition, SkillOracle,
};
use crate::state::{
    Character, CharacterId, DropTable, ItemType, MapId, MonsterTemplate, MonsterType, SkillId,
    TemplateId,
};
use crate::stats::CharacterClass;

pub const POWER_STRIKE: SkillId = SkillId(1);
pub const WHIRLWIND: SkillId = SkillId(2);
pub const EXECUTE: SkillId = SkillId(3);
pub const FIREBALL: SkillId = SkillId(4);

/// Level 5 goblin: 100 HP, 20 attack, 10 defense, 50 experience.
pub fn goblin() -> MonsterTemplate {
    MonsterTemplate {
        id: TemplateId(1),
        name: "Goblin".into(),
        monster_type: MonsterType::Normal,
        level: 5,
        base_hp: 100,
        hp_per_level: 10,
        base_attack: 20,
        attack_per_level: 2,
        base_defense: 10,
        defense_per_level: 1,
        base_experience: 50,
        experience_per_level: 5,
        drops: DropTable {
            gold_base: 10,
            gold_range: 5,
            potion_chance: 0.3,
            item_chance: 0.1,
            item_types: vec![ItemType::Weapon, ItemType::Armor],
        },
        active: true,
    }
}

fn wolf() -> MonsterTemplate {
    MonsterTemplate {
        id: TemplateId(2),
        name: "Dire Wolf".into(),
        monster_type: MonsterType::Elite,
        level: 3,
        base_hp: 70,
        hp_per_level: 8,
        base_attack: 16,
        attack_per_level: 2,
        base_defense: 4,
        defense_per_level: 1,
        base_experience: 40,
        experience_per_level: 4,
        drops: DropTable {
            gold_base: 5,
            gold_range: 10,
            potion_chance: 0.2,
            item_chance: 0.05,
            item_types: vec![ItemType::Boots],
        },
        active: true,
    }
}

/// Level 1 warrior with default attributes who knows the first three skills.
///
/// Stats: attack 21, defense 10, max HP 118, max mana 21.
pub fn warrior() -> Character {
    let mut character = Character::new(CharacterId(1), "Aria", CharacterClass::Warrior);
    character.learned_skills = vec![POWER_STRIKE, WHIRLWIND, EXECUTE];
    character
}

/// In-memory content tables implementing every oracle.
pub struct Catalog {
    pub templates: BTreeMap<TemplateId, MonsterTemplate>,
    pub skills: BTreeMap<SkillId, SkillDefinition>,
    pub maps: BTreeMap<MapId, MapDefinition>,
}

impl Catalog {
    /// Goblins and wolves on map 0 (levels 1-3, packs of 1-3) plus four skills.
    pub fn standard() -> Self {
        let skills = [
            SkillDefinition {
                id: POWER_STRIKE,
                name: "Power Strike".into(),
                mana_cost: 5,
                damage_multiplier: 1.5,
                flat_damage: 0,
                cooldown: 0,
                max_uses: None,
            },
            SkillDefinition {
                id: WHIRLWIND,
                name: "Whirlwind".into(),
                mana_cost: 8,
                damage_multiplier: 1.0,
                flat_damage: 10,
                cooldown: 2,
                max_uses: None,
            },
            SkillDefinition {
                id: EXECUTE,
                name: "Execute".into(),
                mana_cost: 0,
                damage_multiplier: 3.0,
                flat_damage: 0,
                cooldown: 0,
                max_uses: Some(1),
            },
            SkillDefinition {
                id: FIREBALL,
                name: "Fireball".into(),
                mana_cost: 10,
                damage_multiplier: 2.0,
                flat_damage: 5,
                cooldown: 1,
                max_uses: None,
            },
        ];
        let map = MapDefinition {
            id: MapId(0),
            name: "Training Grounds".into(),
            min_level: 1,
            max_level: 3,
            monster_pool: vec![TemplateId(1), TemplateId(2)],
            min_pack: 1,
            max_pack: 3,
        };

        Self {
            templates: [goblin(), wolf()].into_iter().map(|t| (t.id, t)).collect(),
            skills: skills.into_iter().map(|s| (s.id, s)).collect(),
            maps: [(map.id, map)].into_iter().collect(),
        }
    }

    pub fn env<'a>(&'a self, config: &'a CombatConfig) -> CombatEnv<'a> {
        CombatEnv::new(self, self, self, config)
    }
}

impl MonsterOracle for Catalog {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.templates.get(&id)
    }
}

impl SkillOracle for Catalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}

impl MapOracle for Catalog {
    fn map(&self, id: MapId) -> Option<&MapDefinition> {
        self.maps.get(&id)
    }
}

/// RNG that replays scripted values, then falls back to quiet defaults.
///
/// Once the script runs out, `next_f64` returns 0.99 (so ordinary crit and
/// drop chances fail) and `range` returns its lower bound.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    floats: VecDeque<f64>,
    ranges: VecDeque<u64>,
}

impl ScriptedRng {
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn with_floats(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.floats.extend(values);
        self
    }

    pub fn with_ranges(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.ranges.extend(values);
        self
    }
}

impl RngOracle for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.99)
    }

    fn range(&mut self, min: u64, max: u64) -> u64 {
        match self.ranges.pop_front() {
            Some(value) if min <= max => value.clamp(min, max),
            _ => min,
        }
    }
}
