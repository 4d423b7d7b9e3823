//! Persistence for the character aggregate.
//!
//! The aggregate (monster list and engagement progress included) is loaded and
//! saved as one record. Only one round owns a character at a time: manual
//! rounds are rejected while an auto-combat session exists, and a session has
//! at most one tick in flight.
mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryCharacterRepo;
pub use traits::CharacterRepository;
