//! Event payloads pushed to clients.

use combat_core::{
    CharacterId, LevelUp, LootDrop, MonsterInstance, Rewards, RoundLog, RoundOutcome, SkillId,
};
use serde::{Deserialize, Serialize};

/// Events delivered to a character's subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// A round resolved, or auto-combat stopped (`auto_stopped`).
    CombatUpdate(CombatUpdate),
    LevelUp(LevelUpNotice),
    LootDropped(LootDropped),
    EncounterAppeared(EncounterAppeared),
}

impl CombatEvent {
    pub fn character_id(&self) -> CharacterId {
        match self {
            Self::CombatUpdate(update) => update.character_id,
            Self::LevelUp(notice) => notice.character_id,
            Self::LootDropped(loot) => loot.character_id,
            Self::EncounterAppeared(encounter) => encounter.character_id,
        }
    }

    /// Events announcing one resolved round, in delivery order: the round
    /// update, then a level-up notice and the loot drops when there are any.
    pub fn for_round(update: CombatUpdate, rewards: &Rewards) -> Vec<Self> {
        let character_id = update.character_id;
        let mut events = vec![Self::CombatUpdate(update)];
        if let Some(notice) = LevelUpNotice::collect(character_id, &rewards.level_ups) {
            events.push(Self::LevelUp(notice));
        }
        if !rewards.loot.is_empty() {
            events.push(Self::LootDropped(LootDropped {
                character_id,
                copper_gained: rewards.copper_gained,
                drops: rewards.loot.clone(),
            }));
        }
        events
    }

    pub fn encounter(character_id: CharacterId, monsters: &[MonsterInstance]) -> Self {
        Self::EncounterAppeared(EncounterAppeared {
            character_id,
            monsters: monsters.to_vec(),
        })
    }
}

/// HP/mana snapshot plus the round breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatUpdate {
    pub character_id: CharacterId,
    pub round: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub experience_gained: u64,
    pub copper_gained: u64,
    pub skills_used: Vec<SkillId>,
    pub monsters: Vec<MonsterInstance>,
    pub log: RoundLog,
    pub defeat: bool,
    pub has_alive_monster: bool,
    pub auto: bool,
    pub auto_stopped: bool,
    /// Why auto-combat stopped, when it did.
    pub reason: Option<String>,
}

impl CombatUpdate {
    pub fn from_outcome(character_id: CharacterId, outcome: &RoundOutcome, auto: bool) -> Self {
        Self {
            character_id,
            round: outcome.round,
            hp: outcome.character_hp,
            max_hp: outcome.character_max_hp,
            mana: outcome.character_mana,
            max_mana: outcome.character_max_mana,
            damage_dealt: outcome.damage_dealt,
            damage_taken: outcome.damage_taken,
            experience_gained: outcome.experience_gained,
            copper_gained: outcome.copper_gained,
            skills_used: outcome.skills_used.clone(),
            monsters: outcome.monsters.clone(),
            log: outcome.log.clone(),
            defeat: outcome.defeat,
            has_alive_monster: outcome.has_alive_monster,
            auto,
            auto_stopped: false,
            reason: None,
        }
    }

    /// Zeroed update announcing that auto-combat ended on an error or timeout.
    pub fn auto_stopped(
        character_id: CharacterId,
        resources: Option<(u32, u32, u32, u32)>,
        reason: impl Into<String>,
    ) -> Self {
        let (hp, max_hp, mana, max_mana) = resources.unwrap_or_default();
        Self {
            character_id,
            hp,
            max_hp,
            mana,
            max_mana,
            auto: true,
            auto_stopped: true,
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Marks a round update as the last one of its auto-combat session.
    pub fn stopping(mut self, reason: impl Into<String>) -> Self {
        self.auto_stopped = true;
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpNotice {
    pub character_id: CharacterId,
    pub level: u32,
    pub levels_gained: u32,
    pub stat_points: u32,
    pub skill_points: u32,
}

impl LevelUpNotice {
    /// Folds every level crossed in one reward into one notice.
    pub fn collect(character_id: CharacterId, level_ups: &[LevelUp]) -> Option<Self> {
        let last = level_ups.last()?;
        Some(Self {
            character_id,
            level: last.level,
            levels_gained: level_ups.len() as u32,
            stat_points: level_ups.iter().map(|up| up.stat_points).sum(),
            skill_points: level_ups.iter().map(|up| up.skill_points).sum(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDropped {
    pub character_id: CharacterId,
    pub copper_gained: u64,
    pub drops: Vec<LootDrop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterAppeared {
    pub character_id: CharacterId,
    pub monsters: Vec<MonsterInstance>,
}
