//! In-memory CharacterRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{Character, CharacterId};

use crate::repository::{CharacterRepository, RepositoryError, Result};

/// In-memory implementation of CharacterRepository.
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
        }
    }

    /// Create pre-populated with `characters`.
    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        Self {
            characters: RwLock::new(characters.into_iter().map(|c| (c.id, c)).collect()),
        }
    }
}

impl Default for InMemoryCharacterRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterRepository for InMemoryCharacterRepo {
    fn load(&self, id: CharacterId) -> Result<Option<Character>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(&id).cloned())
    }

    fn save(&self, character: &Character) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(character.id, character.clone());
        Ok(())
    }

    fn delete(&self, id: CharacterId) -> Result<bool> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.remove(&id).is_some())
    }

    fn exists(&self, id: CharacterId) -> bool {
        self.characters
            .read()
            .map(|characters| characters.contains_key(&id))
            .unwrap_or(false)
    }
}
