//! The character aggregate.
//!
//! A [`Character`] owns everything a combat round touches: attributes,
//! resources, equipment contribution, the engaged monster list and the
//! per-engagement skill bookkeeping. It is loaded and saved as one record; the
//! monster list never leaves it.

use std::collections::BTreeMap;

use super::common::{CharacterId, Difficulty, MapId, MonsterId, SkillId};
use super::item::LootItem;
use super::monster::MonsterInstance;
use crate::config::CombatConfig;
use crate::stats::{Attributes, CharacterClass, CombatStats, EquipmentBonus, EquippedItem};

/// Round at which each skill becomes usable again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCooldowns {
    ready_at: BTreeMap<SkillId, u32>,
}

impl SkillCooldowns {
    pub fn is_ready(&self, skill: SkillId, round: u32) -> bool {
        self.ready_at.get(&skill).is_none_or(|ready| round >= *ready)
    }

    /// Blocks `skill` until `round + cooldown`. A zero cooldown leaves it ready.
    pub fn trigger(&mut self, skill: SkillId, round: u32, cooldown: u32) {
        if cooldown > 0 {
            self.ready_at.insert(skill, round + cooldown);
        }
    }

    pub fn clear(&mut self) {
        self.ready_at.clear();
    }
}

/// Bookkeeping for the current engagement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatProgress {
    /// Index of the next round to resolve.
    pub round: u32,
    /// Skills used since the engagement started, in use order.
    pub used_skills: Vec<SkillId>,
    pub cooldowns: SkillCooldowns,
    /// Source of monster ids; survives engagement resets.
    pub next_monster_id: u64,
}

impl CombatProgress {
    pub fn allocate_monster_id(&mut self) -> MonsterId {
        let id = MonsterId(self.next_monster_id);
        self.next_monster_id += 1;
        id
    }

    pub fn times_used(&self, skill: SkillId) -> u32 {
        self.used_skills.iter().filter(|used| **used == skill).count() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    /// Progress toward the next level.
    pub experience: u64,
    pub copper: u64,
    pub attributes: Attributes,
    pub stat_points: u32,
    pub skill_points: u32,
    /// `None` until first read; then lazily set to the current maximum.
    hp: Option<u32>,
    mana: Option<u32>,
    pub is_fighting: bool,
    pub difficulty: Difficulty,
    pub map_id: MapId,
    pub learned_skills: Vec<SkillId>,
    pub equipment: Vec<EquippedItem>,
    pub inventory: Vec<LootItem>,
    pub monsters: Vec<MonsterInstance>,
    pub combat: CombatProgress,
}

impl Character {
    pub fn new(id: CharacterId, name: impl Into<String>, class: CharacterClass) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            copper: 0,
            attributes: Attributes::default(),
            stat_points: 0,
            skill_points: 0,
            hp: None,
            mana: None,
            is_fighting: false,
            difficulty: Difficulty::NORMAL,
            map_id: MapId::default(),
            learned_skills: Vec::new(),
            equipment: Vec::new(),
            inventory: Vec::new(),
            monsters: Vec::new(),
            combat: CombatProgress::default(),
        }
    }

    /// Effective combat stats from class, level, attributes and equipment.
    pub fn stats(&self, config: &CombatConfig) -> CombatStats {
        CombatStats::compute(
            self.class,
            self.level,
            &self.attributes,
            &EquipmentBonus::aggregate(&self.equipment),
            config,
        )
    }

    /// Current HP, initializing it to `max_hp` on first read.
    pub fn hp(&mut self, max_hp: u32) -> u32 {
        let hp = self.hp.get_or_insert(max_hp);
        *hp = (*hp).min(max_hp);
        *hp
    }

    /// Current mana, initializing it to `max_mana` on first read.
    pub fn mana(&mut self, max_mana: u32) -> u32 {
        let mana = self.mana.get_or_insert(max_mana);
        *mana = (*mana).min(max_mana);
        *mana
    }

    /// Read-only view of HP; an uninitialized value reads as `max_hp`.
    pub fn hp_snapshot(&self, max_hp: u32) -> u32 {
        self.hp.unwrap_or(max_hp).min(max_hp)
    }

    pub fn mana_snapshot(&self, max_mana: u32) -> u32 {
        self.mana.unwrap_or(max_mana).min(max_mana)
    }

    pub fn set_hp(&mut self, value: u32, max_hp: u32) {
        self.hp = Some(value.min(max_hp));
    }

    pub fn set_mana(&mut self, value: u32, max_mana: u32) {
        self.mana = Some(value.min(max_mana));
    }

    /// Subtracts `damage` (floored at 0) and returns the remaining HP.
    pub fn take_damage(&mut self, damage: u32, max_hp: u32) -> u32 {
        let remaining = self.hp(max_hp).saturating_sub(damage);
        self.set_hp(remaining, max_hp);
        remaining
    }

    /// Spends `cost` mana if affordable.
    pub fn try_spend_mana(&mut self, cost: u32, max_mana: u32) -> bool {
        let mana = self.mana(max_mana);
        if cost > mana {
            return false;
        }
        self.set_mana(mana - cost, max_mana);
        true
    }

    /// Resets HP and mana so the next read returns the maximums.
    pub fn refill(&mut self) {
        self.hp = None;
        self.mana = None;
    }

    /// True once HP has been driven to zero; only resting brings it back.
    pub fn is_defeated(&self) -> bool {
        self.hp == Some(0)
    }

    pub fn knows_skill(&self, skill: SkillId) -> bool {
        self.learned_skills.contains(&skill)
    }

    pub fn has_alive_monsters(&self) -> bool {
        self.monsters.iter().any(MonsterInstance::is_alive)
    }

    /// Ends the current engagement: monsters and per-engagement skill state
    /// are dropped; the monster id counter is kept.
    pub fn reset_engagement(&mut self) {
        self.monsters.clear();
        self.combat.round = 0;
        self.combat.used_skills.clear();
        self.combat.cooldowns.clear();
    }

    /// Re-establishes `is_fighting ⇔ (monsters engaged ∨ auto session exists)`.
    pub fn sync_fighting(&mut self, auto_session_active: bool) {
        self.is_fighting = !self.monsters.is_empty() || auto_session_active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{goblin, warrior};

    #[test]
    fn resources_are_lazily_initialized_to_max() {
        let mut character = warrior();
        assert_eq!(character.hp_snapshot(120), 120);
        assert_eq!(character.hp(120), 120);
        assert_eq!(character.mana(30), 30);
    }

    #[test]
    fn resources_are_clamped_on_mutation_and_read() {
        let mut character = warrior();
        character.set_hp(500, 100);
        assert_eq!(character.hp(100), 100);

        // Max dropped (e.g. an item was unequipped)
        assert_eq!(character.hp(80), 80);

        assert_eq!(character.take_damage(1_000, 80), 0);
        assert_eq!(character.hp_snapshot(80), 0);
    }

    #[test]
    fn mana_is_only_spent_when_affordable() {
        let mut character = warrior();
        character.set_mana(10, 30);
        assert!(!character.try_spend_mana(11, 30));
        assert_eq!(character.mana(30), 10);
        assert!(character.try_spend_mana(10, 30));
        assert_eq!(character.mana(30), 0);
    }

    #[test]
    fn sync_fighting_tracks_monsters_and_session() {
        let mut character = warrior();
        character.sync_fighting(false);
        assert!(!character.is_fighting);

        character.sync_fighting(true);
        assert!(character.is_fighting);

        let id = character.combat.allocate_monster_id();
        character.monsters.push(goblin().spawn(id, 5, 0));
        character.sync_fighting(false);
        assert!(character.is_fighting);

        character.reset_engagement();
        character.sync_fighting(false);
        assert!(!character.is_fighting);
        assert_eq!(character.combat.next_monster_id, 1);
    }

    #[test]
    fn cooldowns_block_until_ready_round() {
        let mut cooldowns = SkillCooldowns::default();
        cooldowns.trigger(SkillId(3), 4, 2);
        assert!(!cooldowns.is_ready(SkillId(3), 5));
        assert!(cooldowns.is_ready(SkillId(3), 6));

        cooldowns.trigger(SkillId(4), 4, 0);
        assert!(cooldowns.is_ready(SkillId(4), 4));
    }
}
