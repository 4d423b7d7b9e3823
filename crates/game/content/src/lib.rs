//! Data-driven combat content and loaders.
//!
//! This crate houses the static combat content and provides loaders for
//! RON/TOML data files:
//! - Monster templates (data-driven via RON)
//! - Skill definitions (data-driven via RON)
//! - Map encounter tables (data-driven via RON)
//! - Combat balance configuration (data-driven via TOML)
//!
//! Content is consumed by runtime oracles and never appears in character
//! state. The default content ships in this crate's `data/` directory.
//!
//! All loaders use combat-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, LoadResult, MapLoader, MonsterLoader,
    SkillLoader,
};
