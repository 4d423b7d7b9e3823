//! Auto-combat session records.
//!
//! A session lives under `auto_combat:{character_id}` as JSON. Its presence
//! means auto-combat owns the character; deleting it is how every stop path
//! (explicit stop, defeat, error, disconnect) ends the loop.

use std::collections::BTreeSet;
use std::sync::Arc;

use combat_core::{CharacterId, SkillId};
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, StoreResult};

/// Session record shared between the client-facing service and ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCombatSession {
    /// Skill loadout used by every tick, in priority order.
    pub skill_ids: Vec<SkillId>,
    /// Skills to drop from the loadout before the next round runs.
    #[serde(default)]
    pub cancelled_skill_ids: BTreeSet<SkillId>,
    /// Identifies the tick loop that owns this session. Ticks carrying a
    /// different generation belong to an earlier, stopped loop.
    #[serde(default)]
    pub generation: u64,
}

impl AutoCombatSession {
    pub fn new(skill_ids: Vec<SkillId>) -> Self {
        Self {
            skill_ids,
            cancelled_skill_ids: BTreeSet::new(),
            generation: 0,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Drops cancelled skills from the loadout and clears the cancellations.
    /// Returns whether anything changed.
    pub fn apply_cancellations(&mut self) -> bool {
        if self.cancelled_skill_ids.is_empty() {
            return false;
        }
        let cancelled = std::mem::take(&mut self.cancelled_skill_ids);
        self.skill_ids.retain(|skill| !cancelled.contains(skill));
        true
    }
}

/// Typed access to auto-combat sessions in a [`KeyValueStore`].
#[derive(Clone)]
pub struct AutoCombatSessions {
    store: Arc<dyn KeyValueStore>,
}

impl AutoCombatSessions {
    const KEY_PREFIX: &'static str = "auto_combat:";
    const MAX_CAS_ATTEMPTS: u32 = 8;

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(character: CharacterId) -> String {
        format!("{}{}", Self::KEY_PREFIX, character.0)
    }

    pub async fn load(&self, character: CharacterId) -> StoreResult<Option<AutoCombatSession>> {
        let key = Self::key(character);
        match self.store.get(&key).await? {
            Some(raw) => decode(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, character: CharacterId) -> StoreResult<bool> {
        self.store.exists(&Self::key(character)).await
    }

    /// Creates the session unless one already exists. Returns whether it was
    /// created.
    pub async fn create(
        &self,
        character: CharacterId,
        session: &AutoCombatSession,
    ) -> StoreResult<bool> {
        let key = Self::key(character);
        let raw = encode(&key, session)?;
        self.store.set_if_absent(&key, raw).await
    }

    /// Removes the session. Returns whether one existed.
    pub async fn delete(&self, character: CharacterId) -> StoreResult<bool> {
        self.store.delete(&Self::key(character)).await
    }

    /// Read-modify-write with compare-and-swap, retried on conflict.
    ///
    /// Returns `None` when no session exists (nothing is written), otherwise
    /// the session as stored after `apply`. When `apply` returns `false` the
    /// record is left untouched.
    pub async fn update<F>(
        &self,
        character: CharacterId,
        mut apply: F,
    ) -> StoreResult<Option<AutoCombatSession>>
    where
        F: FnMut(&mut AutoCombatSession) -> bool + Send,
    {
        let key = Self::key(character);

        for _ in 0..Self::MAX_CAS_ATTEMPTS {
            let Some(current) = self.store.get(&key).await? else {
                return Ok(None);
            };
            let mut session = decode(&key, &current)?;
            if !apply(&mut session) {
                return Ok(Some(session));
            }

            let next = encode(&key, &session)?;
            if self.store.compare_and_swap(&key, &current, next).await? {
                return Ok(Some(session));
            }
            tracing::debug!(
                target: "combat::auto",
                character_id = character.0,
                "session changed concurrently, retrying"
            );
        }

        Err(StoreError::Contention {
            key,
            attempts: Self::MAX_CAS_ATTEMPTS,
        })
    }
}

fn decode(key: &str, raw: &str) -> StoreResult<AutoCombatSession> {
    serde_json::from_str(raw).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })
}

fn encode(key: &str, session: &AutoCombatSession) -> StoreResult<String> {
    serde_json::to_string(session).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryKeyValueStore;

    fn sessions() -> AutoCombatSessions {
        AutoCombatSessions::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    #[test]
    fn cancellations_are_consumed() {
        let mut session = AutoCombatSession::new(vec![SkillId(1), SkillId(3), SkillId(5)]);
        session.cancelled_skill_ids.insert(SkillId(3));

        assert!(session.apply_cancellations());
        assert_eq!(session.skill_ids, vec![SkillId(1), SkillId(5)]);
        assert!(session.cancelled_skill_ids.is_empty());
        assert!(!session.apply_cancellations());
    }

    #[test]
    fn record_uses_the_documented_shape() {
        let session = AutoCombatSession::new(vec![SkillId(3)]).with_generation(2);
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(
            json,
            r#"{"skill_ids":[3],"cancelled_skill_ids":[],"generation":2}"#
        );

        let parsed: AutoCombatSession = serde_json::from_str(r#"{"skill_ids":[2]}"#).unwrap();
        assert_eq!(parsed.skill_ids, vec![SkillId(2)]);
        assert_eq!(parsed.generation, 0);
    }

    #[tokio::test]
    async fn second_create_is_rejected() {
        let sessions = sessions();
        let character = CharacterId(4);
        assert!(sessions.create(character, &AutoCombatSession::default()).await.unwrap());
        assert!(!sessions.create(character, &AutoCombatSession::default()).await.unwrap());
        assert_eq!(AutoCombatSessions::key(character), "auto_combat:4");
    }

    #[tokio::test]
    async fn update_on_missing_session_writes_nothing() {
        let sessions = sessions();
        let result = sessions
            .update(CharacterId(1), |session| {
                session.skill_ids.push(SkillId(1));
                true
            })
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(!sessions.exists(CharacterId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn update_persists_changes() {
        let sessions = sessions();
        let character = CharacterId(2);
        sessions
            .create(character, &AutoCombatSession::new(vec![SkillId(1)]))
            .await
            .unwrap();

        sessions
            .update(character, |session| session.cancelled_skill_ids.insert(SkillId(1)))
            .await
            .unwrap();

        let stored = sessions.load(character).await.unwrap().unwrap();
        assert!(stored.cancelled_skill_ids.contains(&SkillId(1)));
    }

    #[tokio::test]
    async fn corrupt_record_surfaces_json_error() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store.set("auto_combat:9", "not json".into()).await.unwrap();
        let sessions = AutoCombatSessions::new(store);

        let err = sessions.load(CharacterId(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }
}
