//! Round resolution.
//!
//! [`resolve_round`] resolves exactly one round between a character and its
//! engaged monsters. It mutates only the in-memory aggregate it is handed and
//! draws randomness from the injected [`RngOracle`]; loading, saving,
//! scheduling and broadcasting belong to the caller.
//!
//! # Round order
//!
//! 1. Effective stats are computed from class, attributes and equipment.
//! 2. The character acts once against every alive monster in position order
//!    (a focused monster goes first): the first requested skill that is off
//!    cooldown, under its use limit and affordable is used, otherwise a basic
//!    attack. A crit roll may multiply the damage.
//! 3. Dead monsters leave the list and each contributes experience and a gold
//!    roll to the round totals.
//! 4. Every survivor counter-attacks once; processing stops when the
//!    character's HP reaches 0.

use crate::combat::damage::{apply_critical, calculate_damage};
use crate::env::{CombatEnv, RngOracle, SkillDefinition};
use crate::error::CombatError;
use crate::state::{Character, MonsterId, MonsterInstance, MonsterType, SkillId, TemplateId};

/// Per-round request.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundContext<'a> {
    /// Skills in priority order. Each must be learned by the character.
    pub requested_skills: &'a [SkillId],
    /// Monster to strike first; must be part of the current encounter.
    pub focus: Option<MonsterId>,
}

impl<'a> RoundContext<'a> {
    pub fn with_skills(requested_skills: &'a [SkillId]) -> Self {
        Self {
            requested_skills,
            focus: None,
        }
    }
}

/// One character strike.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterAction {
    pub target: MonsterId,
    /// `None` for a basic attack.
    pub skill: Option<SkillId>,
    pub damage: u32,
    pub critical: bool,
    pub target_hp: u32,
    pub killed: bool,
}

/// One monster counter-attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterAction {
    pub monster: MonsterId,
    pub damage: u32,
    pub character_hp: u32,
}

/// Structured breakdown for client animation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundLog {
    pub round: u32,
    pub character_actions: Vec<CharacterAction>,
    pub monster_actions: Vec<MonsterAction>,
    pub kill_count: u32,
}

/// A monster removed from the encounter this round, with its contribution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KillRecord {
    pub monster_id: MonsterId,
    pub template_id: TemplateId,
    pub name: String,
    pub level: u32,
    pub monster_type: MonsterType,
    pub experience: u64,
    /// Gold rolled from the template's drop table at kill time.
    pub copper: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundOutcome {
    pub round: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    /// Surviving monsters after the round.
    pub monsters: Vec<MonsterInstance>,
    pub defeat: bool,
    pub has_alive_monster: bool,
    pub experience_gained: u64,
    pub copper_gained: u64,
    pub skills_used: Vec<SkillId>,
    pub kills: Vec<KillRecord>,
    pub log: RoundLog,
    pub character_hp: u32,
    pub character_max_hp: u32,
    pub character_mana: u32,
    pub character_max_mana: u32,
}

impl RoundOutcome {
    pub fn kill_count(&self) -> u32 {
        self.kills.len() as u32
    }
}

/// Resolve one round for `character` against its engaged monsters.
///
/// # Errors
///
/// - [`CombatError::UnknownSkill`] / [`CombatError::SkillNotLearned`] for an
///   invalid skill request
/// - [`CombatError::StaleMonster`] when `focus` is not engaged
/// - [`CombatError::UnknownTemplate`] when an engaged monster's template is gone
/// - [`CombatError::CharacterDefeated`] when the character starts at 0 HP
///
/// All validation happens before any state is touched, so an error leaves the
/// character unchanged.
pub fn resolve_round(
    character: &mut Character,
    ctx: &RoundContext<'_>,
    env: &CombatEnv<'_>,
    rng: &mut dyn RngOracle,
) -> Result<RoundOutcome, CombatError> {
    let stats = character.stats(env.config);
    let round = character.combat.round;

    if character.monsters.is_empty() {
        return Ok(RoundOutcome {
            round,
            has_alive_monster: false,
            monsters: Vec::new(),
            character_hp: character.hp_snapshot(stats.max_hp),
            character_max_hp: stats.max_hp,
            character_mana: character.mana_snapshot(stats.max_mana),
            character_max_mana: stats.max_mana,
            log: RoundLog {
                round,
                ..RoundLog::default()
            },
            ..RoundOutcome::default()
        });
    }

    let skills = validate_skills(character, ctx.requested_skills, env)?;
    if let Some(focus) = ctx.focus {
        if !character.monsters.iter().any(|m| m.id == focus && m.is_alive()) {
            return Err(CombatError::StaleMonster { monster: focus });
        }
    }
    for monster in &character.monsters {
        if env.monsters.template(monster.template_id).is_none() {
            return Err(CombatError::UnknownTemplate {
                template: monster.template_id,
            });
        }
    }
    if character.hp(stats.max_hp) == 0 {
        return Err(CombatError::CharacterDefeated {
            character: character.id,
        });
    }

    let mut outcome = RoundOutcome {
        round,
        character_max_hp: stats.max_hp,
        character_max_mana: stats.max_mana,
        ..RoundOutcome::default()
    };
    outcome.log.round = round;

    character.monsters.sort_by_key(|m| m.position);
    let mut order: Vec<usize> = (0..character.monsters.len()).collect();
    if let Some(focus) = ctx.focus {
        order.sort_by_key(|&i| character.monsters[i].id != focus);
    }

    // Character phase
    for index in order {
        if !character.monsters[index].is_alive() {
            continue;
        }

        let skill = choose_skill(character, &skills, round, stats.max_mana);
        let attack_value = match skill {
            Some(definition) => {
                character
                    .combat
                    .cooldowns
                    .trigger(definition.id, round, definition.cooldown);
                character.combat.used_skills.push(definition.id);
                outcome.skills_used.push(definition.id);
                definition.attack_value(stats.attack)
            }
            None => stats.attack,
        };

        let monster = &mut character.monsters[index];
        let mut damage = calculate_damage(attack_value, monster.defense);
        let critical = rng.chance(stats.crit_rate);
        if critical {
            damage = apply_critical(damage, stats.crit_damage);
        }
        monster.take_damage(damage);
        outcome.damage_dealt += damage as u64;

        outcome.log.character_actions.push(CharacterAction {
            target: monster.id,
            skill: skill.map(|definition| definition.id),
            damage,
            critical,
            target_hp: monster.hp,
            killed: !monster.is_alive(),
        });
    }

    // Remove the dead and tally their rewards
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut character.monsters)
        .into_iter()
        .partition(|monster| !monster.is_alive());
    character.monsters = alive;

    for monster in dead {
        let copper = env
            .monsters
            .template(monster.template_id)
            .map(|template| {
                let drops = &template.drops;
                rng.range(drops.gold_base, drops.gold_base + drops.gold_range)
            })
            .unwrap_or(0);

        outcome.experience_gained += monster.experience;
        outcome.copper_gained += copper;
        outcome.kills.push(KillRecord {
            monster_id: monster.id,
            template_id: monster.template_id,
            name: monster.name,
            level: monster.level,
            monster_type: monster.monster_type,
            experience: monster.experience,
            copper,
        });
    }
    outcome.log.kill_count = outcome.kills.len() as u32;

    // Monster phase
    let counters: Vec<(MonsterId, u32)> = character
        .monsters
        .iter()
        .map(|monster| (monster.id, calculate_damage(monster.attack, stats.defense)))
        .collect();
    for (monster, damage) in counters {
        let remaining = character.take_damage(damage, stats.max_hp);
        outcome.damage_taken += damage as u64;
        outcome.log.monster_actions.push(MonsterAction {
            monster,
            damage,
            character_hp: remaining,
        });
        if remaining == 0 {
            outcome.defeat = true;
            break;
        }
    }

    character.combat.round += 1;
    outcome.has_alive_monster = !character.monsters.is_empty();
    outcome.monsters = character.monsters.clone();
    outcome.character_hp = character.hp(stats.max_hp);
    outcome.character_mana = character.mana(stats.max_mana);

    Ok(outcome)
}

fn validate_skills<'e>(
    character: &Character,
    requested: &[SkillId],
    env: &CombatEnv<'e>,
) -> Result<Vec<&'e SkillDefinition>, CombatError> {
    requested
        .iter()
        .map(|&skill| {
            let definition = env
                .skills
                .skill(skill)
                .ok_or(CombatError::UnknownSkill { skill })?;
            if !character.knows_skill(skill) {
                return Err(CombatError::SkillNotLearned {
                    character: character.id,
                    skill,
                });
            }
            Ok(definition)
        })
        .collect()
}

/// Picks the first usable skill and pays its mana cost.
///
/// A skill that is on cooldown, over its use limit, or costs more mana than
/// the character has is skipped; when nothing is usable the character falls
/// back to a basic attack. This is the only place that policy lives.
fn choose_skill<'e>(
    character: &mut Character,
    skills: &[&'e SkillDefinition],
    round: u32,
    max_mana: u32,
) -> Option<&'e SkillDefinition> {
    for &definition in skills {
        if !character.combat.cooldowns.is_ready(definition.id, round) {
            continue;
        }
        if definition
            .max_uses
            .is_some_and(|limit| character.combat.times_used(definition.id) >= limit)
        {
            continue;
        }
        if character.try_spend_mana(definition.mana_cost, max_mana) {
            return Some(definition);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::testing::{
        Catalog, EXECUTE, FIREBALL, POWER_STRIKE, ScriptedRng, WHIRLWIND, goblin, warrior,
    };

    fn engage(character: &mut Character, count: u32) {
        for position in 0..count {
            let id = character.combat.allocate_monster_id();
            character.monsters.push(goblin().spawn(id, 5, position));
        }
    }

    /// Attack 50, defense 10, max HP 190.
    fn veteran() -> Character {
        let mut character = warrior();
        character.level = 10;
        character.attributes.strength = 20;
        character
    }

    #[test]
    fn lethal_hit_clears_the_encounter() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = veteran();
        engage(&mut character, 1);
        character.monsters[0].hp = 35;
        character.monsters[0].max_hp = 35;

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        assert_eq!(outcome.damage_dealt, 40);
        assert_eq!(outcome.kill_count(), 1);
        assert!(!outcome.has_alive_monster);
        assert!(!outcome.defeat);
        assert_eq!(outcome.damage_taken, 0);
        assert_eq!(outcome.experience_gained, 50);
        assert_eq!(outcome.copper_gained, 10);
        assert!(outcome.log.character_actions[0].killed);
        assert!(outcome.log.monster_actions.is_empty());
        assert!(character.monsters.is_empty());
        assert_eq!(character.combat.round, 1);
    }

    #[test]
    fn character_at_one_hp_is_defeated() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.set_hp(1, 118);
        engage(&mut character, 2);

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        assert!(outcome.defeat);
        assert!(outcome.has_alive_monster);
        assert_eq!(outcome.character_hp, 0);
        // Processing stops at the first lethal counter-attack
        assert_eq!(outcome.log.monster_actions.len(), 1);
        assert_eq!(outcome.damage_taken, 10);
    }

    #[test]
    fn empty_encounter_returns_zero_totals() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        assert_eq!(outcome.damage_dealt, 0);
        assert_eq!(outcome.damage_taken, 0);
        assert!(!outcome.has_alive_monster);
        assert!(!outcome.defeat);
        assert_eq!(outcome.character_hp, 118);
        assert_eq!(character.combat.round, 0);
    }

    #[test]
    fn unaffordable_skill_falls_back_to_basic_attack() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.set_mana(2, 21);
        engage(&mut character, 1);

        let outcome = resolve_round(
            &mut character,
            &RoundContext::with_skills(&[POWER_STRIKE]),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        assert_eq!(outcome.log.character_actions[0].skill, None);
        assert_eq!(outcome.log.character_actions[0].damage, 11);
        assert!(outcome.skills_used.is_empty());
        assert_eq!(outcome.character_mana, 2);
    }

    #[test]
    fn affordable_skill_pays_mana_and_scales_damage() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        engage(&mut character, 1);

        let outcome = resolve_round(
            &mut character,
            &RoundContext::with_skills(&[POWER_STRIKE]),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        // round(21 * 1.5) - 10
        assert_eq!(outcome.log.character_actions[0].damage, 22);
        assert_eq!(outcome.skills_used, vec![POWER_STRIKE]);
        assert_eq!(outcome.character_mana, 16);
    }

    #[test]
    fn cooldown_moves_to_next_requested_skill() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        engage(&mut character, 2);
        let ctx = RoundContext::with_skills(&[WHIRLWIND, POWER_STRIKE]);
        let mut rng = ScriptedRng::quiet();

        let first = resolve_round(&mut character, &ctx, &env, &mut rng).unwrap();
        assert_eq!(first.skills_used, vec![WHIRLWIND, POWER_STRIKE]);

        // Whirlwind is ready again at round 2; mana runs out on the second strike
        let second = resolve_round(&mut character, &ctx, &env, &mut rng).unwrap();
        let used: Vec<_> = second.log.character_actions.iter().map(|a| a.skill).collect();
        assert_eq!(used, vec![Some(POWER_STRIKE), None]);
        assert_eq!(second.character_mana, 3);
    }

    #[test]
    fn use_limit_applies_per_engagement() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        engage(&mut character, 2);

        let outcome = resolve_round(
            &mut character,
            &RoundContext::with_skills(&[EXECUTE]),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();
        let used: Vec<_> = outcome.log.character_actions.iter().map(|a| a.skill).collect();
        assert_eq!(used, vec![Some(EXECUTE), None]);

        character.reset_engagement();
        assert_eq!(character.combat.times_used(EXECUTE), 0);
    }

    #[test]
    fn invalid_skill_request_leaves_character_untouched() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        engage(&mut character, 1);
        let before = character.clone();

        let err = resolve_round(
            &mut character,
            &RoundContext::with_skills(&[FIREBALL]),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CombatError::SkillNotLearned {
                character: character.id,
                skill: FIREBALL,
            }
        );

        let err = resolve_round(
            &mut character,
            &RoundContext::with_skills(&[SkillId(99)]),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap_err();
        assert_eq!(err, CombatError::UnknownSkill { skill: SkillId(99) });
        assert_eq!(character, before);
    }

    #[test]
    fn defeated_character_cannot_fight() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        character.set_hp(0, 118);
        engage(&mut character, 1);

        let err = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap_err();
        assert!(matches!(err, CombatError::CharacterDefeated { .. }));
    }

    #[test]
    fn focus_target_is_struck_first() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = warrior();
        engage(&mut character, 2);
        let focus = character.monsters[1].id;

        let ctx = RoundContext {
            focus: Some(focus),
            ..RoundContext::default()
        };
        let outcome =
            resolve_round(&mut character, &ctx, &env, &mut ScriptedRng::quiet()).unwrap();
        assert_eq!(outcome.log.character_actions[0].target, focus);

        let stale = RoundContext {
            focus: Some(MonsterId(77)),
            ..RoundContext::default()
        };
        let err =
            resolve_round(&mut character, &stale, &env, &mut ScriptedRng::quiet()).unwrap_err();
        assert_eq!(err, CombatError::StaleMonster { monster: MonsterId(77) });
    }

    #[test]
    fn critical_hit_multiplies_damage() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = veteran();
        engage(&mut character, 1);

        let mut rng = ScriptedRng::quiet().with_floats([0.0]);
        let outcome =
            resolve_round(&mut character, &RoundContext::default(), &env, &mut rng).unwrap();

        assert!(outcome.log.character_actions[0].critical);
        assert_eq!(outcome.damage_dealt, 60);
    }

    #[test]
    fn kills_match_removed_monsters_and_totals() {
        let catalog = Catalog::standard();
        let config = CombatConfig::default();
        let env = catalog.env(&config);
        let mut character = veteran();
        engage(&mut character, 3);
        character.monsters[0].hp = 5;
        character.monsters[2].hp = 5;

        let outcome = resolve_round(
            &mut character,
            &RoundContext::default(),
            &env,
            &mut ScriptedRng::quiet(),
        )
        .unwrap();

        assert_eq!(outcome.kill_count(), 2);
        assert_eq!(outcome.log.kill_count, 2);
        assert_eq!(character.monsters.len(), 1);
        assert_eq!(
            outcome.experience_gained,
            outcome.kills.iter().map(|k| k.experience).sum::<u64>()
        );
        assert_eq!(
            outcome.copper_gained,
            outcome.kills.iter().map(|k| k.copper).sum::<u64>()
        );
        assert_eq!(outcome.log.monster_actions.len(), 1);
    }
}
