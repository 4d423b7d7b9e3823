//! Session cleanup for disconnects, timeouts and failed ticks.

use async_trait::async_trait;
use combat_core::CharacterId;
use tracing::{debug, info, warn};

use crate::api::Result;
use crate::context::CombatContext;
use crate::events::{CombatEvent, CombatUpdate};
use crate::scheduler::{AutoCombatJob, TimeoutWatchdog};

/// Ends auto-combat sessions that cannot end through a tick.
#[derive(Clone)]
pub struct SessionJanitor {
    ctx: CombatContext,
}

impl SessionJanitor {
    pub(crate) fn new(ctx: CombatContext) -> Self {
        Self { ctx }
    }

    /// The client for `character` went away: drop its session and release
    /// the fighting flag unless monsters are still engaged.
    pub async fn on_disconnect(&self, character: CharacterId) -> Result<()> {
        let removed = self.ctx.sessions.delete(character).await?;
        self.release(character).await?;
        self.ctx.locks.forget(character);
        info!(
            target: "combat::janitor",
            character_id = character.0,
            session_removed = removed,
            "cleaned up after disconnect"
        );
        Ok(())
    }

    /// Deletes the session and releases the fighting flag. With a `reason`,
    /// subscribers receive an auto-stopped update carrying it.
    pub async fn end_session(&self, character: CharacterId, reason: Option<&str>) -> Result<()> {
        self.ctx.sessions.delete(character).await?;
        let resources = self.release(character).await?;

        if let Some(reason) = reason {
            self.ctx.broadcaster.emit(
                character,
                CombatEvent::CombatUpdate(CombatUpdate::auto_stopped(character, resources, reason)),
            );
        }
        Ok(())
    }

    /// Clears the fighting flag of a character without a session. Returns its
    /// resources, or `None` when the character no longer exists.
    async fn release(&self, character: CharacterId) -> Result<Option<(u32, u32, u32, u32)>> {
        let _row = self.ctx.locks.lock(character).await;
        let Some(mut loaded) = self.ctx.characters.load(character)? else {
            return Ok(None);
        };
        let was_fighting = loaded.is_fighting;
        loaded.sync_fighting(false);
        if loaded.is_fighting != was_fighting {
            self.ctx.characters.save(&loaded)?;
        }
        Ok(Some(self.ctx.resources(&loaded)))
    }
}

#[async_trait]
impl TimeoutWatchdog for SessionJanitor {
    async fn on_timeout(&self, job: &AutoCombatJob) {
        let character = job.character_id;

        // A restarted session is not ours to end.
        match self.ctx.sessions.load(character).await {
            Ok(Some(session)) if session.generation != job.generation => {
                debug!(
                    target: "combat::janitor",
                    character_id = character.0,
                    "timed-out tick belongs to a replaced session"
                );
                return;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(target: "combat::janitor", character_id = character.0, "session lookup failed: {err}");
            }
        }

        match self.end_session(character, Some("timeout")).await {
            Ok(()) => info!(
                target: "combat::janitor",
                character_id = character.0,
                "auto-combat ended after tick timeout"
            ),
            Err(err) => warn!(
                target: "combat::janitor",
                character_id = character.0,
                "timeout cleanup failed: {err}"
            ),
        }
    }
}
