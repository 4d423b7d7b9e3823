//! In-memory repository implementations.
mod character;

pub use character::InMemoryCharacterRepo;
