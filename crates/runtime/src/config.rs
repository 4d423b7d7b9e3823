//! Runtime configuration and environment loading.
use std::env;
use std::time::Duration;

use combat_core::CombatConfig;

/// Runtime configuration shared across the scheduler, workers and services.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Delay between auto-combat ticks.
    pub tick_delay: Duration,
    /// Hard execution limit for one tick.
    pub tick_timeout: Duration,
    /// Minimum spacing of manual rounds per (user, character).
    pub manual_window: Duration,
    pub event_buffer_size: usize,
    /// Roll a new encounter after a victory instead of ending the session.
    pub continue_after_victory: bool,
    pub scheduler_queue_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_DELAY: Duration = Duration::from_millis(1_500);
    pub const DEFAULT_TICK_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_MANUAL_WINDOW: Duration = Duration::from_secs(3);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AUTO_COMBAT_TICK_MS` - Delay between auto-combat ticks (default: 1500)
    /// - `AUTO_COMBAT_TIMEOUT_MS` - Hard timeout per tick (default: 10000)
    /// - `MANUAL_COMBAT_WINDOW_MS` - Manual round rate-limit window (default: 3000)
    /// - `EVENT_BUFFER_SIZE` - Broadcast buffer per character (default: 64)
    /// - `AUTO_COMBAT_CONTINUE` - Keep fighting after a victory (default: true)
    /// - `SCHEDULER_QUEUE_SIZE` - Dispatcher queue size (default: 256)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("AUTO_COMBAT_TICK_MS") {
            config.tick_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("AUTO_COMBAT_TIMEOUT_MS") {
            config.tick_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("MANUAL_COMBAT_WINDOW_MS") {
            config.manual_window = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER_SIZE") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(enable) = read_env::<bool>("AUTO_COMBAT_CONTINUE") {
            config.continue_after_victory = enable;
        }
        if let Some(capacity) = read_env::<usize>("SCHEDULER_QUEUE_SIZE") {
            config.scheduler_queue_size = capacity.max(1);
        }

        config
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            tick_delay: Self::DEFAULT_TICK_DELAY,
            tick_timeout: Self::DEFAULT_TICK_TIMEOUT,
            manual_window: Self::DEFAULT_MANUAL_WINDOW,
            event_buffer_size: 64,
            continue_after_victory: true,
            scheduler_queue_size: 256,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
