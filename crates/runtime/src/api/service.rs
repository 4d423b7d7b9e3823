//! Request-facing combat operations.
//!
//! [`CombatService`] backs the manual combat endpoints and the auto-combat
//! session controls. Every operation loads the character aggregate, applies
//! the change, persists it and only then broadcasts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use combat_core::{
    Character, CharacterId, CombatError, LiveRng, MonsterInstance, Rewards, RoundContext,
    RoundOutcome, SkillId, distribute_rewards, resolve_round, roll_encounter,
};
use tracing::{debug, info};

use super::{Result, RuntimeError, UserId};
use crate::context::CombatContext;
use crate::events::{CombatEvent, CombatUpdate};
use crate::scheduler::{AutoCombatJob, JobScheduler};
use crate::store::{AutoCombatSession, CombatRateLimiter, RateDecision};

/// Result of one manual round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub rewards: Rewards,
    /// Monsters rolled for this request when no encounter was active.
    pub encounter: Option<Vec<MonsterInstance>>,
}

/// Manual combat and auto-combat session control.
pub struct CombatService {
    ctx: CombatContext,
    limiter: CombatRateLimiter,
    scheduler: Arc<dyn JobScheduler>,
    generations: AtomicU64,
}

impl CombatService {
    pub(crate) fn new(
        ctx: CombatContext,
        limiter: CombatRateLimiter,
        scheduler: Arc<dyn JobScheduler>,
    ) -> Self {
        // Seeded from the clock so generations stay distinct across restarts
        // that share a store.
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(1);
        Self {
            ctx,
            limiter,
            scheduler,
            generations: AtomicU64::new(seed),
        }
    }

    /// Returns the engaged monsters, rolling a pack when none are alive.
    pub async fn engage(&self, id: CharacterId) -> Result<Vec<MonsterInstance>> {
        let _row = self.ctx.locks.lock(id).await;
        let mut character = self.ctx.load_character(id)?;
        ensure_alive(&character, &self.ctx)?;
        if character.has_alive_monsters() {
            return Ok(character.monsters.clone());
        }

        let env = self.ctx.env();
        let monsters = roll_encounter(&mut character, &env, &mut LiveRng::from_entropy())?.to_vec();
        let auto_active = self.ctx.sessions.exists(id).await?;
        character.sync_fighting(auto_active);
        self.ctx.characters.save(&character)?;

        debug!(target: "combat::manual", character_id = id.0, count = monsters.len(), "encounter rolled");
        self.ctx
            .broadcaster
            .emit(id, CombatEvent::encounter(id, &monsters));
        Ok(monsters)
    }

    /// Resolves one manual round for `id` with `skills` in priority order.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::AutoCombatActive`] while a session exists
    /// - [`RuntimeError::RateLimited`] inside the manual window; nothing is
    ///   recorded or changed
    /// - combat validation errors (unknown or unlearned skill, defeated
    ///   character); the character is left unchanged
    pub async fn fight_round(
        &self,
        user: UserId,
        id: CharacterId,
        skills: &[SkillId],
    ) -> Result<RoundReport> {
        if self.ctx.sessions.exists(id).await? {
            return Err(RuntimeError::AutoCombatActive { character: id });
        }
        if let RateDecision::Limited { retry_after } = self.limiter.check(user, id).await? {
            debug!(
                target: "combat::manual",
                character_id = id.0,
                user_id = user.0,
                retry_after_ms = retry_after.as_millis() as u64,
                "manual round rate limited"
            );
            return Err(RuntimeError::RateLimited {
                character: id,
                retry_after,
            });
        }

        let _row = self.ctx.locks.lock(id).await;
        let mut character = self.ctx.load_character(id)?;
        let env = self.ctx.env();
        let mut rng = LiveRng::from_entropy();

        let encounter = if character.has_alive_monsters() {
            None
        } else {
            ensure_alive(&character, &self.ctx)?;
            Some(roll_encounter(&mut character, &env, &mut rng)?.to_vec())
        };

        let outcome = resolve_round(
            &mut character,
            &RoundContext::with_skills(skills),
            &env,
            &mut rng,
        )?;
        let rewards = distribute_rewards(&mut character, &outcome, &env, &mut rng);
        if outcome.defeat {
            character.reset_engagement();
        }
        character.sync_fighting(false);
        self.ctx.characters.save(&character)?;

        info!(
            target: "combat::manual",
            character_id = id.0,
            round = outcome.round,
            damage_dealt = outcome.damage_dealt,
            damage_taken = outcome.damage_taken,
            kills = outcome.kill_count(),
            defeat = outcome.defeat,
            "manual round resolved"
        );

        let mut events = Vec::new();
        if let Some(monsters) = &encounter {
            events.push(CombatEvent::encounter(id, monsters));
        }
        events.extend(CombatEvent::for_round(
            CombatUpdate::from_outcome(id, &outcome, false),
            &rewards,
        ));
        self.ctx.emit_all(id, events);

        Ok(RoundReport {
            outcome,
            rewards,
            encounter,
        })
    }

    /// Leaves the current encounter. The fighting flag stays set only while
    /// an auto-combat session exists.
    pub async fn retreat(&self, id: CharacterId) -> Result<()> {
        let _row = self.ctx.locks.lock(id).await;
        let mut character = self.ctx.load_character(id)?;
        character.reset_engagement();
        character.sync_fighting(self.ctx.sessions.exists(id).await?);
        self.ctx.characters.save(&character)?;
        debug!(target: "combat::manual", character_id = id.0, "retreated");
        Ok(())
    }

    /// Refills HP and mana outside of combat.
    pub async fn rest(&self, id: CharacterId) -> Result<()> {
        let _row = self.ctx.locks.lock(id).await;
        let mut character = self.ctx.load_character(id)?;
        if character.is_fighting {
            return Err(RuntimeError::StillFighting { character: id });
        }
        character.refill();
        self.ctx.characters.save(&character)?;
        Ok(())
    }

    /// Starts auto-combat with `skills` as the session loadout and queues the
    /// first tick immediately, carrying `skills` as its immediate list.
    pub async fn start_auto(&self, id: CharacterId, skills: Vec<SkillId>) -> Result<()> {
        let row = self.ctx.locks.lock(id).await;
        let mut character = self.ctx.load_character(id)?;
        self.validate_loadout(&character, &skills)?;
        ensure_alive(&character, &self.ctx)?;

        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let session = AutoCombatSession::new(skills.clone()).with_generation(generation);
        if !self.ctx.sessions.create(id, &session).await? {
            return Err(RuntimeError::AutoCombatAlreadyRunning { character: id });
        }

        character.reset_engagement();
        character.sync_fighting(true);
        self.ctx.characters.save(&character)?;
        // The first tick waits on the row lock; release it before queueing.
        drop(row);

        if let Err(err) = self
            .scheduler
            .dispatch(AutoCombatJob::new(id, generation, skills))
            .await
        {
            let _row = self.ctx.locks.lock(id).await;
            self.ctx.sessions.delete(id).await?;
            if let Some(mut character) = self.ctx.characters.load(id)? {
                character.sync_fighting(false);
                self.ctx.characters.save(&character)?;
            }
            return Err(err.into());
        }

        info!(target: "combat::auto", character_id = id.0, generation, "auto-combat started");
        Ok(())
    }

    /// Ends the session; an in-flight tick still completes and broadcasts
    /// before the fighting flag is released.
    pub async fn stop_auto(&self, id: CharacterId) -> Result<()> {
        let _row = self.ctx.locks.lock(id).await;
        if !self.ctx.sessions.delete(id).await? {
            return Err(RuntimeError::AutoCombatNotRunning { character: id });
        }
        if let Some(mut character) = self.ctx.characters.load(id)? {
            character.sync_fighting(false);
            self.ctx.characters.save(&character)?;
        }
        info!(target: "combat::auto", character_id = id.0, "auto-combat stopped by request");
        Ok(())
    }

    /// Replaces the loadout used from the next tick on.
    pub async fn change_skills(&self, id: CharacterId, skills: Vec<SkillId>) -> Result<()> {
        let character = self.ctx.load_character(id)?;
        self.validate_loadout(&character, &skills)?;

        self.ctx
            .sessions
            .update(id, |session| {
                session.skill_ids = skills.clone();
                true
            })
            .await?
            .ok_or(RuntimeError::AutoCombatNotRunning { character: id })?;
        debug!(target: "combat::auto", character_id = id.0, ?skills, "loadout changed");
        Ok(())
    }

    /// Drops `skills` from the loadout before the next round.
    pub async fn cancel_skills(&self, id: CharacterId, skills: &[SkillId]) -> Result<()> {
        self.ctx
            .sessions
            .update(id, |session| {
                let before = session.cancelled_skill_ids.len();
                session.cancelled_skill_ids.extend(skills.iter().copied());
                session.cancelled_skill_ids.len() != before
            })
            .await?
            .ok_or(RuntimeError::AutoCombatNotRunning { character: id })?;
        debug!(target: "combat::auto", character_id = id.0, ?skills, "skills cancelled");
        Ok(())
    }

    /// Current session record, if auto-combat is running.
    pub async fn auto_session(&self, id: CharacterId) -> Result<Option<AutoCombatSession>> {
        Ok(self.ctx.sessions.load(id).await?)
    }

    fn validate_loadout(&self, character: &Character, skills: &[SkillId]) -> Result<()> {
        let env = self.ctx.env();
        for &skill in skills {
            if env.skills.skill(skill).is_none() {
                return Err(CombatError::UnknownSkill { skill }.into());
            }
            if !character.knows_skill(skill) {
                return Err(CombatError::SkillNotLearned {
                    character: character.id,
                    skill,
                }
                .into());
            }
        }
        Ok(())
    }
}

fn ensure_alive(character: &Character, ctx: &CombatContext) -> Result<()> {
    let (hp, ..) = ctx.resources(character);
    if hp == 0 {
        return Err(CombatError::CharacterDefeated {
            character: character.id,
        }
        .into());
    }
    Ok(())
}
