//! Server bootstrap configuration.
use std::env;
use std::path::PathBuf;

use combat_runtime::RuntimeConfig;

/// Configuration required to bootstrap the combat server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub runtime: RuntimeConfig,
    /// Content directory; the bundled catalog when unset.
    pub content_dir: Option<PathBuf>,
    /// Also write logs to `combat.log` in this directory.
    pub log_dir: Option<PathBuf>,
    /// Rounds the headless demo watches before stopping auto-combat.
    pub demo_rounds: u32,
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Directory with monsters/skills/maps/combat files
    /// - `COMBAT_LOG_DIR` - Enables file logging into this directory
    /// - `COMBAT_DEMO_ROUNDS` - Rounds the demo session runs (default: 10)
    ///
    /// Runtime tuning is read by [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            runtime: RuntimeConfig::from_env(),
            content_dir: env::var_os("COMBAT_CONTENT_DIR").map(PathBuf::from),
            log_dir: env::var_os("COMBAT_LOG_DIR").map(PathBuf::from),
            demo_rounds: env::var("COMBAT_DEMO_ROUNDS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(10),
        }
    }
}
