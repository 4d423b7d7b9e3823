//! Auto-combat tick worker.
//!
//! One [`AutoCombatWorker::run`] call is one tick:
//!
//! 1. Consume pending skill cancellations (compare-and-swap on the session).
//!    A missing or replaced session ends the loop silently.
//! 2. Take the character row lock and reload; a missing character ends the
//!    session.
//! 3. Roll a new encounter when nothing is alive and announce it.
//! 4. Resolve the round, credit rewards, persist, broadcast.
//! 5. Stop on defeat (or on victory when continuation is disabled), otherwise
//!    continue if the session still exists.
//!
//! Failures go to the [`SessionJanitor`]: not-found errors end the session
//! quietly, anything else ends it with an auto-stopped update.

use std::collections::BTreeSet;

use async_trait::async_trait;
use combat_core::{
    LiveRng, RoundContext, SkillId, distribute_rewards, resolve_round, roll_encounter,
};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::context::CombatContext;
use crate::events::{CombatEvent, CombatUpdate};
use crate::handlers::SessionJanitor;
use crate::scheduler::{AutoCombatJob, JobHandler, StopReason, TickOutcome};

/// Executes auto-combat ticks.
pub struct AutoCombatWorker {
    ctx: CombatContext,
    janitor: SessionJanitor,
    continue_after_victory: bool,
}

impl AutoCombatWorker {
    pub(crate) fn new(
        ctx: CombatContext,
        janitor: SessionJanitor,
        continue_after_victory: bool,
    ) -> Self {
        Self {
            ctx,
            janitor,
            continue_after_victory,
        }
    }

    async fn tick(&self, job: &AutoCombatJob) -> Result<TickOutcome> {
        let id = job.character_id;

        let mut cancelled = BTreeSet::new();
        let session = self
            .ctx
            .sessions
            .update(id, |session| {
                cancelled = session.cancelled_skill_ids.clone();
                session.apply_cancellations()
            })
            .await?;
        let Some(session) = session else {
            debug!(target: "combat::auto", character_id = id.0, "session gone, tick skipped");
            return Ok(TickOutcome::Cancelled);
        };
        if session.generation != job.generation {
            debug!(target: "combat::auto", character_id = id.0, "session replaced, tick skipped");
            return Ok(TickOutcome::Cancelled);
        }

        let _row = self.ctx.locks.lock(id).await;
        let Some(mut character) = self.ctx.characters.load(id)? else {
            self.ctx.sessions.delete(id).await?;
            info!(target: "combat::auto", character_id = id.0, "character missing, session ended");
            return Ok(TickOutcome::Stopped(StopReason::CharacterMissing));
        };

        let env = self.ctx.env();
        let mut rng = LiveRng::from_entropy();

        let mut events = Vec::new();
        if !character.has_alive_monsters() {
            let monsters = roll_encounter(&mut character, &env, &mut rng)?;
            events.push(CombatEvent::encounter(id, monsters));
        }

        let skills = tick_skills(&job.skill_ids, &session.skill_ids, &cancelled);
        let outcome = resolve_round(
            &mut character,
            &RoundContext::with_skills(&skills),
            &env,
            &mut rng,
        )?;
        let rewards = distribute_rewards(&mut character, &outcome, &env, &mut rng);

        let stop = if outcome.defeat {
            Some(StopReason::Defeat)
        } else if !outcome.has_alive_monster && !self.continue_after_victory {
            Some(StopReason::Victory)
        } else {
            None
        };

        let mut update = CombatUpdate::from_outcome(id, &outcome, true);
        let next = match stop {
            Some(reason) => {
                if outcome.defeat {
                    character.reset_engagement();
                }
                self.ctx.sessions.delete(id).await?;
                character.sync_fighting(false);
                update = update.stopping(stop_label(&reason));
                TickOutcome::Stopped(reason)
            }
            None => {
                let still_running = self
                    .ctx
                    .sessions
                    .load(id)
                    .await?
                    .is_some_and(|current| current.generation == job.generation);
                character.sync_fighting(still_running);
                if still_running {
                    TickOutcome::Continue
                } else {
                    TickOutcome::Cancelled
                }
            }
        };

        self.ctx.characters.save(&character)?;

        debug!(
            target: "combat::auto",
            character_id = id.0,
            round = outcome.round,
            damage_dealt = outcome.damage_dealt,
            damage_taken = outcome.damage_taken,
            kills = outcome.kill_count(),
            ?next,
            "tick resolved"
        );

        events.extend(CombatEvent::for_round(update, &rewards));
        self.ctx.emit_all(id, events);

        Ok(next)
    }

    async fn fail(&self, job: &AutoCombatJob, err: RuntimeError) -> TickOutcome {
        let id = job.character_id;
        let reason = if err.is_not_found() {
            debug!(target: "combat::auto", character_id = id.0, "tick target vanished: {err}");
            None
        } else {
            warn!(target: "combat::auto", character_id = id.0, "auto-combat stopped: {err}");
            Some(err.to_string())
        };

        if let Err(cleanup) = self.janitor.end_session(id, reason.as_deref()).await {
            warn!(target: "combat::auto", character_id = id.0, "session cleanup failed: {cleanup}");
        }
        TickOutcome::Stopped(StopReason::Error(err.to_string()))
    }
}

#[async_trait]
impl JobHandler for AutoCombatWorker {
    async fn run(&self, job: AutoCombatJob) -> TickOutcome {
        match self.tick(&job).await {
            Ok(outcome) => outcome,
            Err(err) => self.fail(&job, err).await,
        }
    }
}

/// Immediate skills win over the session loadout; cancelled ids are dropped
/// from whichever list is used.
fn tick_skills(
    immediate: &[SkillId],
    loadout: &[SkillId],
    cancelled: &BTreeSet<SkillId>,
) -> Vec<SkillId> {
    let source = if immediate.is_empty() {
        loadout
    } else {
        immediate
    };
    source
        .iter()
        .copied()
        .filter(|skill| !cancelled.contains(skill))
        .collect()
}

fn stop_label(reason: &StopReason) -> &str {
    match reason {
        StopReason::Victory => "victory",
        StopReason::Defeat => "defeat",
        StopReason::CharacterMissing => "character_missing",
        StopReason::Error(message) => message,
    }
}
