//! Repository contracts for saving and loading characters.

use combat_core::{Character, CharacterId};

use super::Result;

/// Repository for character persistence.
pub trait CharacterRepository: Send + Sync {
    /// Load a character by id.
    fn load(&self, id: CharacterId) -> Result<Option<Character>>;

    /// Insert or replace a character.
    fn save(&self, character: &Character) -> Result<()>;

    /// Delete a character. Returns whether it existed.
    fn delete(&self, id: CharacterId) -> Result<bool>;

    fn exists(&self, id: CharacterId) -> bool {
        matches!(self.load(id), Ok(Some(_)))
    }
}
