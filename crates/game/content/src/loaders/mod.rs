//! Content loaders for reading combat data from files.
//!
//! Each loader converts one RON/TOML file into the `combat-core` types the
//! runtime oracles are built from. [`ContentFactory`] loads a whole data
//! directory and cross-checks it.

pub mod config;
pub mod factory;
pub mod maps;
pub mod monsters;
pub mod skills;

pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use maps::MapLoader;
pub use monsters::MonsterLoader;
pub use skills::SkillLoader;

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Rejects catalogs that define the same id twice.
pub(crate) fn ensure_unique_ids<T, K>(
    kind: &str,
    entries: &[T],
    id: impl Fn(&T) -> K,
) -> LoadResult<()>
where
    K: Eq + Hash + Display,
{
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        let key = id(entry);
        if !seen.insert(key) {
            anyhow::bail!("Duplicate {} id {}", kind, id(entry));
        }
    }
    Ok(())
}
