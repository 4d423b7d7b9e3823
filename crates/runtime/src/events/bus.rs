//! Per-character event bus implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use combat_core::CharacterId;
use tokio::sync::broadcast;

use super::CombatEvent;

/// Fire-and-forget delivery of combat events.
///
/// Implementations must not block and must swallow delivery failures.
pub trait Broadcaster: Send + Sync {
    fn emit(&self, character: CharacterId, event: CombatEvent);
}

/// Character-keyed event bus
///
/// Each character gets its own broadcast channel, created on first
/// subscription. Events for characters nobody listens to are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<RwLock<HashMap<CharacterId, broadcast::Sender<CombatEvent>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new event bus with default capacity per character
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Creates a new event bus with specified capacity per character
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to one character's events
    pub fn subscribe(&self, character: CharacterId) -> broadcast::Receiver<CombatEvent> {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(character)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drops the channel of a character once every subscriber is gone.
    pub fn prune(&self, character: CharacterId) {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if channels
            .get(&character)
            .is_some_and(|tx| tx.receiver_count() == 0)
        {
            channels.remove(&character);
        }
    }

    pub fn subscriber_count(&self, character: CharacterId) -> usize {
        self.channels
            .read()
            .map(|channels| channels.get(&character).map_or(0, |tx| tx.receiver_count()))
            .unwrap_or(0)
    }
}

impl Broadcaster for EventBus {
    fn emit(&self, character: CharacterId, event: CombatEvent) {
        // Best-effort: a poisoned lock or missing subscriber drops the event
        match self.channels.read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&character)
                    && tx.send(event).is_err()
                {
                    tracing::trace!(character_id = character.0, "no subscribers for character");
                }
            }
            Err(_) => {
                tracing::debug!(
                    character_id = character.0,
                    "event bus lock poisoned, dropping event"
                );
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
