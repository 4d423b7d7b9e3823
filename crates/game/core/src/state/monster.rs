//! Monster templates and the live instances rolled from them.
//!
//! Templates are immutable catalog data. Instances are ephemeral: they are
//! created when an encounter is rolled for a target level and live only inside
//! the owning character's monster list.

use strum::{Display, EnumIter, EnumString};

use super::common::{MonsterId, TemplateId};

/// Monster rank. The multiplier scales every derived stat and drop chance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MonsterType {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl MonsterType {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Elite => 1.5,
            Self::Boss => 3.0,
        }
    }
}

/// Equipment categories a template may drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Helmet,
    Armor,
    Gloves,
    Boots,
    Ring,
    Amulet,
}

/// Loot parameters attached to a monster template.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTable {
    pub gold_base: u64,
    pub gold_range: u64,
    /// Base potion drop probability (0.0–1.0) before the type multiplier.
    pub potion_chance: f64,
    /// Base equipment drop probability (0.0–1.0) before the type multiplier.
    pub item_chance: f64,
    pub item_types: Vec<ItemType>,
}

/// Immutable monster definition.
///
/// Stats are given at `level`; instances at other levels move by the
/// `*_per_level` deltas before the type multiplier is applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub id: TemplateId,
    pub name: String,
    pub monster_type: MonsterType,
    pub level: u32,
    pub base_hp: u32,
    pub hp_per_level: u32,
    pub base_attack: u32,
    pub attack_per_level: u32,
    pub base_defense: u32,
    pub defense_per_level: u32,
    pub base_experience: u64,
    pub experience_per_level: u64,
    pub drops: DropTable,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub active: bool,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

impl MonsterTemplate {
    /// Instantiates this template at `level`, occupying targeting slot `position`.
    pub fn spawn(&self, id: MonsterId, level: u32, position: u32) -> MonsterInstance {
        let level = level.max(1);
        let multiplier = self.monster_type.multiplier();
        let offset = level as i64 - self.level as i64;

        let max_hp = scale(self.base_hp as i64, self.hp_per_level as i64, offset, multiplier, 1);
        let attack = scale(
            self.base_attack as i64,
            self.attack_per_level as i64,
            offset,
            multiplier,
            1,
        );
        let defense = scale(
            self.base_defense as i64,
            self.defense_per_level as i64,
            offset,
            multiplier,
            0,
        );
        let experience = scale(
            self.base_experience as i64,
            self.experience_per_level as i64,
            offset,
            multiplier,
            1,
        );

        MonsterInstance {
            id,
            template_id: self.id,
            name: self.name.clone(),
            level,
            monster_type: self.monster_type,
            hp: saturate(max_hp),
            max_hp: saturate(max_hp),
            attack: saturate(attack),
            defense: saturate(defense),
            experience,
            position,
        }
    }
}

/// `max(floor, round((base + delta × offset) × multiplier))`
fn scale(base: i64, delta: i64, offset: i64, multiplier: f64, floor: u64) -> u64 {
    let raw = base.saturating_add(delta.saturating_mul(offset)).max(0) as f64 * multiplier;
    (raw.round() as u64).max(floor)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// A monster engaged with a character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterInstance {
    pub id: MonsterId,
    pub template_id: TemplateId,
    pub name: String,
    pub level: u32,
    pub monster_type: MonsterType,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience: u64,
    /// Targeting slot; lower positions act and are attacked first.
    pub position: u32,
}

impl MonsterInstance {
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage (clamped to 0) and returns the damage actually absorbed.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let absorbed = damage.min(self.hp);
        self.hp -= absorbed;
        absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::goblin;

    #[test]
    fn oversized_boss_stats_saturate() {
        let mut template = goblin();
        template.monster_type = MonsterType::Boss;
        template.base_hp = u32::MAX;
        template.base_attack = u32::MAX / 2;

        let monster = template.spawn(MonsterId(1), 5, 0);
        assert_eq!(monster.max_hp, u32::MAX);
        assert_eq!(monster.hp, u32::MAX);
        assert_eq!(monster.attack, u32::MAX);
        assert_eq!(monster.defense, 30);
    }

    #[test]
    fn spawn_at_template_level_keeps_base_stats() {
        let monster = goblin().spawn(MonsterId(7), 5, 0);
        assert_eq!(monster.max_hp, 100);
        assert_eq!(monster.hp, 100);
        assert_eq!(monster.attack, 20);
        assert_eq!(monster.defense, 10);
        assert_eq!(monster.experience, 50);
        assert_eq!(monster.id, MonsterId(7));
    }

    #[test]
    fn spawn_applies_level_deltas_and_type_multiplier() {
        let mut template = goblin();
        template.monster_type = MonsterType::Elite;

        let monster = template.spawn(MonsterId(1), 7, 2);
        // (100 + 10 * 2) * 1.5
        assert_eq!(monster.max_hp, 180);
        // (20 + 2 * 2) * 1.5
        assert_eq!(monster.attack, 36);
        // (10 + 1 * 2) * 1.5
        assert_eq!(monster.defense, 18);
        assert_eq!(monster.position, 2);
    }

    #[test]
    fn spawn_below_template_level_never_drops_under_floor() {
        let monster = goblin().spawn(MonsterId(1), 1, 0);
        assert_eq!(monster.max_hp, 60);
        assert_eq!(monster.defense, 6);

        let mut fragile = goblin();
        fragile.base_defense = 1;
        fragile.defense_per_level = 5;
        assert_eq!(fragile.spawn(MonsterId(2), 1, 0).defense, 0);
    }

    #[test]
    fn take_damage_clamps_to_zero() {
        let mut monster = goblin().spawn(MonsterId(1), 5, 0);
        assert_eq!(monster.take_damage(30), 30);
        assert_eq!(monster.take_damage(500), 70);
        assert_eq!(monster.hp, 0);
        assert!(!monster.is_alive());
    }
}
