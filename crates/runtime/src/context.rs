//! Shared dependencies of the service, the tick worker and the janitor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use combat_core::{Character, CharacterId, CombatEnv};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::api::{Result, RuntimeError};
use crate::events::{Broadcaster, CombatEvent};
use crate::oracle::OracleManager;
use crate::repository::CharacterRepository;
use crate::store::AutoCombatSessions;

#[derive(Clone)]
pub(crate) struct CombatContext {
    pub characters: Arc<dyn CharacterRepository>,
    pub sessions: AutoCombatSessions,
    pub oracles: OracleManager,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub locks: CharacterLocks,
}

impl CombatContext {
    pub fn env(&self) -> CombatEnv<'_> {
        self.oracles.as_env()
    }

    pub fn load_character(&self, id: CharacterId) -> Result<Character> {
        self.characters
            .load(id)?
            .ok_or(RuntimeError::CharacterNotFound { character: id })
    }

    pub fn emit_all(&self, character: CharacterId, events: impl IntoIterator<Item = CombatEvent>) {
        for event in events {
            self.broadcaster.emit(character, event);
        }
    }

    /// `(hp, max_hp, mana, max_mana)` without initializing lazy resources.
    pub fn resources(&self, character: &Character) -> (u32, u32, u32, u32) {
        let stats = character.stats(self.oracles.config());
        (
            character.hp_snapshot(stats.max_hp),
            stats.max_hp,
            character.mana_snapshot(stats.max_mana),
            stats.max_mana,
        )
    }
}

/// Serializes load-modify-save cycles on one character row.
///
/// The tick holds the guard from reload to save, so a concurrent stop or
/// disconnect writes either before the tick reads or after it persisted.
#[derive(Clone, Default)]
pub(crate) struct CharacterLocks {
    slots: Arc<Mutex<HashMap<CharacterId, Arc<AsyncMutex<()>>>>>,
}

impl CharacterLocks {
    pub async fn lock(&self, character: CharacterId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            slots.entry(character).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Drops the slot of `character` when nobody holds or waits on it.
    pub fn forget(&self, character: CharacterId) {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slots
            .get(&character)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&character);
        }
    }
}
